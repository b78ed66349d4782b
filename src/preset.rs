//! Configuration presets.
//!
//! The portal ships two profile shapes that share one builder: a multi-LAN
//! OpenStack cloud with dedicated storage nodes, and a single-LAN
//! OpenStack + Kubernetes (Magnum) deployment. A preset bundles the
//! parameter declarations, hard-coded defaults, and descriptive text for one
//! shape; the topology policy itself lives in the builder.

use crate::params::{ParamValue, ParameterRegistry, ParameterSpec, ParameterType, ValidationError};
use crate::rspec::Tour;

/// Default disk image for the multi-LAN OpenStack preset.
pub const OPENSTACK_IMAGE: &str =
    "urn:publicid:IDN+emulab.net+image+emulab-ops//UBUNTU24-64-STD";

/// Default disk image for the Magnum preset.
pub const MAGNUM_IMAGE: &str =
    "urn:publicid:IDN+emulab.net+image+emulab-ops:UBUNTU24-64-STD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Multi-LAN OpenStack cloud: controllers, computes, dedicated storage
    /// nodes, per-role block storage, management and data LANs.
    Openstack,
    /// Single-LAN OpenStack + Kubernetes via Magnum: one controller plus
    /// compute nodes, ordered install scripts on the controller.
    Magnum,
}

impl Preset {
    /// Resolve a preset from its CLI name.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        match name {
            "openstack" => Ok(Preset::Openstack),
            "magnum" => Ok(Preset::Magnum),
            other => Err(ValidationError::InvalidParameter(format!(
                "unknown preset '{}', expected 'openstack' or 'magnum'",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Openstack => "openstack",
            Preset::Magnum => "magnum",
        }
    }

    /// Declare this preset's parameters into the registry.
    ///
    /// Declaration order is the order shown on the instantiation page.
    pub fn declare_parameters(
        &self,
        registry: &mut ParameterRegistry,
    ) -> Result<(), ValidationError> {
        match self {
            Preset::Openstack => self.declare_openstack(registry),
            Preset::Magnum => self.declare_magnum(registry),
        }
    }

    fn declare_openstack(
        &self,
        registry: &mut ParameterRegistry,
    ) -> Result<(), ValidationError> {
        registry.declare(
            ParameterSpec::new(
                "controller_count",
                "Number of Controller Nodes",
                ParameterType::Integer,
                ParamValue::Integer(1),
            )
            .with_bounds(1, 3)
            .with_description("Number of OpenStack controller nodes (1-3)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "compute_count",
                "Number of Compute Nodes",
                ParameterType::Integer,
                ParamValue::Integer(1),
            )
            .with_bounds(1, 10)
            .with_description("Number of OpenStack compute nodes (1-10)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "storage_count",
                "Number of Storage Nodes",
                ParameterType::Integer,
                ParamValue::Integer(1),
            )
            .with_bounds(0, 5)
            .with_description("Number of dedicated storage nodes (0-5)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "node_type",
                "Hardware Type",
                ParameterType::NodeType,
                ParamValue::String("d430".to_string()),
            )
            .with_description(
                "Hardware type for all nodes. Empty means any available type.",
            ),
        )?;
        registry.declare(
            ParameterSpec::new(
                "os_username",
                "OpenStack Username",
                ParameterType::String,
                ParamValue::String("user".to_string()),
            )
            .required()
            .with_description("Custom username for OpenStack authentication (required)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "os_password",
                "OpenStack Password",
                ParameterType::String,
                ParamValue::String("password".to_string()),
            )
            .required()
            .with_description("Custom password for OpenStack authentication (required)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "tenant_network_type",
                "Tenant Network Type",
                ParameterType::String,
                ParamValue::String("vxlan".to_string()),
            )
            .with_allowed(&["vxlan", "vlan", "flat"])
            .with_description("Default tenant network type (VXLAN recommended)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "storage_size_gb",
                "Storage Size per Node (GB)",
                ParameterType::Integer,
                ParamValue::Integer(100),
            )
            .with_bounds(50, 10_000)
            .with_description("Storage size in GB per node (minimum 50GB)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "enable_manila",
                "Enable Shared File Storage (Manila)",
                ParameterType::Boolean,
                ParamValue::Boolean(true),
            )
            .with_description("Enable Manila for shared file storage between users"),
        )?;
        Ok(())
    }

    fn declare_magnum(
        &self,
        registry: &mut ParameterRegistry,
    ) -> Result<(), ValidationError> {
        registry.declare(
            ParameterSpec::new(
                "os_image",
                "Operating System Image",
                ParameterType::Image,
                ParamValue::String(MAGNUM_IMAGE.to_string()),
            )
            .required()
            .with_description("OS image for all nodes. Ubuntu 24.04 is used here."),
        )?;
        registry.declare(
            ParameterSpec::new(
                "hw_type",
                "Hardware Type",
                ParameterType::NodeType,
                ParamValue::String("d430".to_string()),
            )
            .with_description(
                "Specify a hardware type for all nodes. Clear selection for any available type.",
            ),
        )?;
        registry.declare(
            ParameterSpec::new(
                "compute_count",
                "Number of Compute Nodes",
                ParameterType::Integer,
                ParamValue::Integer(2),
            )
            .with_bounds(1, 10)
            .with_description(
                "The number of OpenStack compute nodes to provision. Total number of \
                 nodes will be n+1 (including controller node). Recommended: 2 or more.",
            ),
        )?;
        registry.declare(
            ParameterSpec::new(
                "os_username",
                "OpenStack Username",
                ParameterType::String,
                ParamValue::String("nevilleLongbottom".to_string()),
            )
            .required()
            .with_description("Custom username for OpenStack authentication (required)"),
        )?;
        registry.declare(
            ParameterSpec::new(
                "os_password",
                "OpenStack Password",
                ParameterType::String,
                ParamValue::String("anythingOffTheTrolley?".to_string()),
            )
            .required()
            .with_description("Custom password for OpenStack authentication (required)"),
        )?;
        Ok(())
    }

    /// Descriptive text attached to the finished graph.
    pub fn tour(&self) -> Tour {
        match self {
            Preset::Openstack => Tour {
                description: OPENSTACK_DESCRIPTION.trim().to_string(),
                instructions: Some(OPENSTACK_INSTRUCTIONS.trim().to_string()),
            },
            Preset::Magnum => Tour {
                description: MAGNUM_DESCRIPTION.trim().to_string(),
                instructions: Some(MAGNUM_INSTRUCTIONS.trim().to_string()),
            },
        }
    }
}

const OPENSTACK_DESCRIPTION: &str = "
Modern OpenStack cloud on Ubuntu 24.04 LTS with custom user authentication,
dynamic resource allocation with Nova, personal storage with Cinder, shared
storage with Manila, the Horizon web dashboard, VXLAN tenant networking, and
configurable storage sizing.
";

const OPENSTACK_INSTRUCTIONS: &str = "
### Instructions

After your experiment starts, wait for all nodes to complete their startup
scripts. Then access the Horizon dashboard using the URL provided on the
experiment status page. Use your configured username and password to log in.
";

const MAGNUM_DESCRIPTION: &str = "
Simple multi-node OpenStack + Kubernetes deployment using Ubuntu 24.04.
Kubernetes is deployed using OpenStack Magnum.
This profile provisions one controller node and a user-defined number of
compute nodes. Default Magnum scripts and settings are used for the
deployment.
";

const MAGNUM_INSTRUCTIONS: &str = "
### Basic Instructions

**PATIENCE IS KEY!** The OpenStack installation and configuration process is
complex and can take 30-60 minutes to complete.

- While the experiment nodes are being provisioned, you can monitor the
  `logs` on the project page.
- Once the controller node's `Status` changes to `ready` and the startup
  scripts finish (indicated by the `Startup` column changing to `Finished`),
  you'll be able to log in to the OpenStack dashboard at
  `http://{host-controller}/dashboard`.

### Deploy a Kubernetes Cluster

Open a shell on the controller node, then:

```bash
$ source /opt/devstack/openrc admin admin
$ openstack keypair create mykey > ~/.ssh/mykey.pem
$ chmod 600 ~/.ssh/mykey.pem
$ openstack coe cluster template list
$ openstack coe cluster create --cluster-template <UUID> \\
    --master-count 1 --node-count 2 --keypair mykey my-first-k8s-cluster
$ watch openstack coe cluster show my-first-k8s-cluster
```
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(Preset::from_name("openstack").unwrap(), Preset::Openstack);
        assert_eq!(Preset::from_name("magnum").unwrap(), Preset::Magnum);
        assert!(Preset::from_name("devstack").is_err());
    }

    #[test]
    fn test_openstack_declarations_bind_with_defaults() {
        let mut registry = ParameterRegistry::new();
        Preset::Openstack.declare_parameters(&mut registry).unwrap();
        assert_eq!(registry.specs().len(), 9);

        let (params, errors) = registry.bind(&BTreeMap::new());
        assert!(errors.is_empty());
        assert_eq!(params.integer("controller_count").unwrap(), 1);
        assert_eq!(params.integer("storage_size_gb").unwrap(), 100);
        assert_eq!(params.string("tenant_network_type").unwrap(), "vxlan");
    }

    #[test]
    fn test_magnum_declarations_bind_with_defaults() {
        let mut registry = ParameterRegistry::new();
        Preset::Magnum.declare_parameters(&mut registry).unwrap();
        assert_eq!(registry.specs().len(), 5);

        let (params, errors) = registry.bind(&BTreeMap::new());
        assert!(errors.is_empty());
        assert_eq!(params.integer("compute_count").unwrap(), 2);
        assert_eq!(params.string("os_image").unwrap(), MAGNUM_IMAGE);
    }

    #[test]
    fn test_tours_are_markdown() {
        let tour = Preset::Magnum.tour();
        assert!(tour.description.contains("Magnum"));
        assert!(tour.instructions.unwrap().contains("PATIENCE IS KEY"));
    }
}
