//! Parameter override file loading.

use crate::params::ParamValue;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

/// Load parameter overrides from a YAML file.
///
/// The file is a flat map of parameter name to scalar value; an empty file
/// yields an empty override set. Names are checked against the declared
/// parameters later, at bind time.
pub fn load_overrides(path: &Path) -> Result<BTreeMap<String, ParamValue>> {
    info!("Loading parameter overrides from: {:?}", path);

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read parameter file '{}'", path.display()))?;

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let overrides: BTreeMap<String, ParamValue> = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse parameter file '{}'", path.display()))?;

    info!("Loaded {} parameter override(s)", overrides.len());
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_overrides() {
        let yaml = r#"
compute_count: 4
os_password: "s3cret"
enable_manila: false
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let overrides = load_overrides(temp_file.path()).unwrap();
        assert_eq!(
            overrides.get("compute_count"),
            Some(&ParamValue::Integer(4))
        );
        assert_eq!(
            overrides.get("os_password"),
            Some(&ParamValue::String("s3cret".to_string()))
        );
        assert_eq!(
            overrides.get("enable_manila"),
            Some(&ParamValue::Boolean(false))
        );
    }

    #[test]
    fn test_empty_file_yields_empty_map() {
        let temp_file = NamedTempFile::new().unwrap();
        let overrides = load_overrides(temp_file.path()).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_overrides(Path::new("/nonexistent/params.yaml"));
        assert!(result.is_err());
    }
}
