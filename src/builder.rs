//! Topology builder.
//!
//! This module coordinates the overall profile generation process: declare
//! the preset's parameters, bind user overrides against them, and construct
//! the resource graph in a single pass. Construction either fully succeeds
//! or every validation problem is reported through the [`Reporter`] channel;
//! no partial graph is ever handed to the serializer.
//!
//! The pass is strictly ordered: LANs are created before any node, because
//! nodes attach interfaces to LANs at creation time. Node names are
//! deterministic (`"<role>-<index>"`), and interface and blockstore names
//! embed the node name so they stay unique graph-wide.

use crate::params::{BoundParameters, ParamValue, ParameterRegistry, ValidationError};
use crate::preset::{Preset, OPENSTACK_IMAGE};
use crate::report::Reporter;
use crate::rspec::{Blockstore, Interface, Lan, Node, ResourceGraph};
use color_eyre::eyre::bail;
use color_eyre::Result;
use log::info;
use std::collections::BTreeMap;

/// A finished build: the validated graph plus the parameter bindings it was
/// built from.
#[derive(Debug)]
pub struct GeneratedProfile {
    pub graph: ResourceGraph,
    pub bindings: BTreeMap<String, ParamValue>,
}

/// Single-pass builder with process-scoped lifetime: one instance per
/// invocation, one graph out.
#[derive(Debug)]
pub struct TopologyBuilder {
    preset: Preset,
    registry: ParameterRegistry,
    reporter: Reporter,
}

impl TopologyBuilder {
    /// Create a builder with the preset's parameters declared.
    pub fn new(preset: Preset) -> Result<Self, ValidationError> {
        let mut registry = ParameterRegistry::new();
        preset.declare_parameters(&mut registry)?;
        Ok(Self {
            preset,
            registry,
            reporter: Reporter::new(),
        })
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Bind overrides against the declared parameters.
    ///
    /// Every violation is reported through the error channel; `None` is
    /// returned when any were, and construction must not proceed.
    pub fn bind_parameters(
        &mut self,
        overrides: &BTreeMap<String, ParamValue>,
    ) -> Option<BoundParameters> {
        let (params, errors) = self.registry.bind(overrides);
        for error in &errors {
            self.reporter.report_error(error);
        }
        if self.reporter.is_failed() {
            None
        } else {
            Some(params)
        }
    }

    /// Construct the complete resource graph from bound parameters.
    ///
    /// The returned graph has passed [`ResourceGraph::validate`].
    pub fn construct(&self, params: &BoundParameters) -> Result<ResourceGraph, ValidationError> {
        let mut graph = match self.preset {
            Preset::Openstack => self.construct_openstack(params)?,
            Preset::Magnum => self.construct_magnum(params)?,
        };
        graph.tour = Some(self.preset.tour());
        graph.validate()?;

        info!(
            "Constructed '{}' topology: {} nodes, {} LANs",
            self.preset.name(),
            graph.nodes.len(),
            graph.lans.len()
        );
        Ok(graph)
    }

    /// Multi-LAN OpenStack cloud: controller, compute, and storage node
    /// groups on shared management and data LANs, with per-role block
    /// storage and a config.env artifact on the first controller.
    fn construct_openstack(
        &self,
        params: &BoundParameters,
    ) -> Result<ResourceGraph, ValidationError> {
        let controller_count = params.integer("controller_count")?;
        let compute_count = params.integer("compute_count")?;
        let storage_count = params.integer("storage_count")?;
        let storage_size_gb = params.integer("storage_size_gb")? as u64;
        let hardware_type = hardware_constraint(params.string("node_type")?);

        // LANs first: nodes attach at creation time.
        let mut mgmt_lan = Lan::new("management", true);
        let mut data_lan = Lan::new("data", true);
        let mut nodes = Vec::new();

        for i in 1..=controller_count {
            let mut node = Node::new(
                &format!("controller-{}", i),
                OPENSTACK_IMAGE,
                hardware_type.clone(),
            );
            attach(&mut node, &mut mgmt_lan, "mgmt");
            attach(&mut node, &mut data_lan, "data");
            node.blockstores.push(Blockstore {
                name: format!("{}-storage", node.name),
                mount_point: "/opt/openstack".to_string(),
                size_gb: storage_size_gb,
            });
            node.add_service(
                "bash",
                "sudo bash /local/repository/install-openstack.sh controller",
            );
            nodes.push(node);
        }

        for i in 1..=compute_count {
            let mut node = Node::new(
                &format!("compute-{}", i),
                OPENSTACK_IMAGE,
                hardware_type.clone(),
            );
            attach(&mut node, &mut mgmt_lan, "mgmt");
            attach(&mut node, &mut data_lan, "data");
            // Compute nodes host VM-local storage, so the volume is doubled
            node.blockstores.push(Blockstore {
                name: format!("{}-storage", node.name),
                mount_point: "/var/lib/nova".to_string(),
                size_gb: storage_size_gb * 2,
            });
            node.add_service(
                "bash",
                "sudo bash /local/repository/install-openstack.sh compute",
            );
            nodes.push(node);
        }

        // storage_count may be zero; that simply yields no storage nodes
        for i in 1..=storage_count {
            let mut node = Node::new(
                &format!("storage-{}", i),
                OPENSTACK_IMAGE,
                hardware_type.clone(),
            );
            attach(&mut node, &mut mgmt_lan, "mgmt");
            attach(&mut node, &mut data_lan, "data");
            // Three raw devices per node for Cinder and Manila
            for j in 1..=3 {
                node.blockstores.push(Blockstore {
                    name: format!("{}-disk-{}", node.name, j),
                    mount_point: format!("/dev/disk{}", j),
                    size_gb: storage_size_gb,
                });
            }
            node.add_service(
                "bash",
                "sudo bash /local/repository/install-openstack.sh storage",
            );
            nodes.push(node);
        }

        // Materialize the bound configuration for the install scripts; the
        // first controller runs it as an extra boot service.
        let config_command = config_env_command(params)?;
        if let Some(first_controller) = nodes.first_mut() {
            first_controller.add_service("bash", config_command);
        }

        Ok(ResourceGraph {
            lans: vec![mgmt_lan, data_lan],
            nodes,
            tour: None,
        })
    }

    /// Single-LAN OpenStack + Magnum deployment: one controller running the
    /// ordered install scripts, plus compute nodes.
    fn construct_magnum(&self, params: &BoundParameters) -> Result<ResourceGraph, ValidationError> {
        let compute_count = params.integer("compute_count")?;
        let os_image = params.string("os_image")?.to_string();
        let os_password = params.string("os_password")?.to_string();
        let hardware_type = hardware_constraint(params.string("hw_type")?);

        let mut lan = Lan::new("lan", false);
        let mut nodes = Vec::new();

        let mut controller = Node::new("controller-1", &os_image, hardware_type.clone());
        attach(&mut controller, &mut lan, "if");
        // Executed sequentially after boot; later commands depend on the
        // earlier ones having succeeded.
        controller.add_service(
            "sh",
            "sudo chmod +x /local/repository/scripts/01-install-openstack.sh",
        );
        controller.add_service(
            "sh",
            format!(
                "sudo -H /local/repository/scripts/01-install-openstack.sh {}",
                os_password
            ),
        );
        controller.add_service(
            "sh",
            "sudo chmod +x /local/repository/scripts/02-configure-magnum.sh",
        );
        controller.add_service("sh", "sudo -H /local/repository/scripts/02-configure-magnum.sh");
        nodes.push(controller);

        for i in 1..=compute_count {
            let mut node = Node::new(&format!("compute-{}", i), &os_image, hardware_type.clone());
            attach(&mut node, &mut lan, "if");
            nodes.push(node);
        }

        Ok(ResourceGraph {
            lans: vec![lan],
            nodes,
            tour: None,
        })
    }
}

/// One-shot entry point: declare, bind, validate, construct.
///
/// Validation failures carry every collected error message, not just the
/// first.
pub fn generate_profile(
    preset: Preset,
    overrides: &BTreeMap<String, ParamValue>,
) -> Result<GeneratedProfile> {
    let mut builder = TopologyBuilder::new(preset)?;
    let params = match builder.bind_parameters(overrides) {
        Some(params) => params,
        None => bail!(
            "parameter validation failed:\n  - {}",
            builder.reporter().errors().join("\n  - ")
        ),
    };
    let graph = builder.construct(&params)?;
    Ok(GeneratedProfile {
        graph,
        bindings: params.values().clone(),
    })
}

/// An empty hardware type means "any available type" and the constraint is
/// omitted entirely.
fn hardware_constraint(hw_type: &str) -> Option<String> {
    if hw_type.is_empty() {
        None
    } else {
        Some(hw_type.to_string())
    }
}

/// Create an interface named `"<short>-<node>"` on the node and enroll it in
/// the LAN.
fn attach(node: &mut Node, lan: &mut Lan, short: &str) {
    let name = format!("{}-{}", short, node.name);
    node.interfaces.push(Interface {
        name: name.clone(),
        lan: lan.name.clone(),
    });
    lan.interfaces.push(name);
}

/// Render the bound parameters into a config.env heredoc so the install
/// scripts can read the configuration without re-deriving it. Pure string
/// templating; the result is never parsed here.
fn config_env_command(params: &BoundParameters) -> Result<String, ValidationError> {
    Ok(format!(
        "cat > /local/repository/config.env << 'EOF'\n\
         export OS_USERNAME='{}'\n\
         export OS_PASSWORD='{}'\n\
         export TENANT_NETWORK_TYPE='{}'\n\
         export STORAGE_SIZE_GB='{}'\n\
         export ENABLE_MANILA='{}'\n\
         export CONTROLLER_COUNT='{}'\n\
         export COMPUTE_COUNT='{}'\n\
         export STORAGE_COUNT='{}'\n\
         EOF\n",
        params.string("os_username")?,
        params.string("os_password")?,
        params.string("tenant_network_type")?,
        params.integer("storage_size_gb")?,
        params.boolean("enable_manila")?,
        params.integer("controller_count")?,
        params.integer("compute_count")?,
        params.integer("storage_count")?,
    ))
}
