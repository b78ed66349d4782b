#[cfg(test)]
mod profile_regression_tests {
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use rspecgen::builder::generate_profile;
    use rspecgen::param_loader::load_overrides;
    use rspecgen::params::ParamValue;
    use rspecgen::preset::Preset;

    /// End-to-end: overrides file -> bound parameters -> validated graph ->
    /// serialized document.
    #[test]
    fn test_overrides_file_to_rspec_document() {
        let yaml = r#"
controller_count: 1
compute_count: 2
storage_count: 1
storage_size_gb: 100
os_username: "alice"
os_password: "s3cret"
"#;
        let mut params_file = NamedTempFile::new().unwrap();
        write!(params_file, "{}", yaml).unwrap();

        let overrides = load_overrides(params_file.path()).unwrap();
        let profile = generate_profile(Preset::Openstack, &overrides).unwrap();

        let rspec = serde_yaml::to_string(&profile.graph).unwrap();
        assert!(rspec.contains("controller-1"));
        assert!(rspec.contains("compute-2"));
        assert!(rspec.contains("storage-1"));
        assert!(rspec.contains("management"));
        assert!(rspec.contains("/var/lib/nova"));

        let bindings = serde_json::to_string_pretty(&profile.bindings).unwrap();
        assert!(bindings.contains("\"os_username\": \"alice\""));
    }

    /// The documented scenario: 1 controller, 2 computes, 1 storage node,
    /// 100GB base storage.
    #[test]
    fn test_reference_scenario() {
        let mut overrides = BTreeMap::new();
        overrides.insert("controller_count".to_string(), ParamValue::Integer(1));
        overrides.insert("compute_count".to_string(), ParamValue::Integer(2));
        overrides.insert("storage_count".to_string(), ParamValue::Integer(1));
        overrides.insert("storage_size_gb".to_string(), ParamValue::Integer(100));

        let graph = generate_profile(Preset::Openstack, &overrides).unwrap().graph;

        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.node("controller-1").unwrap().blockstores[0].size_gb, 100);
        assert_eq!(graph.node("compute-1").unwrap().blockstores[0].size_gb, 200);
        assert_eq!(graph.node("compute-2").unwrap().blockstores[0].size_gb, 200);
        assert_eq!(graph.node("storage-1").unwrap().blockstores.len(), 3);
        for lan in &graph.lans {
            assert_eq!(lan.interfaces.len(), 4, "LAN '{}' membership", lan.name);
        }
    }

    /// Two runs with identical bound parameters produce byte-identical
    /// documents.
    #[test]
    fn test_structural_idempotence() {
        let mut overrides = BTreeMap::new();
        overrides.insert("compute_count".to_string(), ParamValue::Integer(5));

        for preset in [Preset::Openstack, Preset::Magnum] {
            let first = generate_profile(preset, &overrides).unwrap();
            let second = generate_profile(preset, &overrides).unwrap();
            assert_eq!(
                serde_yaml::to_string(&first.graph).unwrap(),
                serde_yaml::to_string(&second.graph).unwrap(),
                "preset '{}' is not idempotent",
                preset.name()
            );
        }
    }

    /// Every generated graph satisfies the structural invariants it is
    /// validated against.
    #[test]
    fn test_generated_graphs_validate() {
        for preset in [Preset::Openstack, Preset::Magnum] {
            let graph = generate_profile(preset, &BTreeMap::new()).unwrap().graph;
            assert!(graph.validate().is_ok());
            assert!(graph.tour.is_some());
        }
    }

    /// String-typed overrides coerce on the way in, matching what a portal
    /// form submission looks like.
    #[test]
    fn test_stringly_typed_overrides() {
        let yaml = r#"
compute_count: "3"
enable_manila: "no"
"#;
        let mut params_file = NamedTempFile::new().unwrap();
        write!(params_file, "{}", yaml).unwrap();

        let overrides = load_overrides(params_file.path()).unwrap();
        let profile = generate_profile(Preset::Openstack, &overrides).unwrap();

        assert_eq!(profile.graph.nodes_with_role("compute").count(), 3);
        assert_eq!(
            profile.bindings.get("enable_manila"),
            Some(&ParamValue::Boolean(false))
        );
    }

    /// A misspelled parameter name is rejected, and the message names it.
    #[test]
    fn test_unknown_parameter_in_file() {
        let yaml = "compute_cont: 3\n";
        let mut params_file = NamedTempFile::new().unwrap();
        write!(params_file, "{}", yaml).unwrap();

        let overrides = load_overrides(params_file.path()).unwrap();
        let err = generate_profile(Preset::Openstack, &overrides).unwrap_err();
        assert!(err.to_string().contains("compute_cont"));
    }
}
