//! RSpec type definitions.
//!
//! This module contains the data structures for the resource-specification
//! document handed to the provisioning backend: nodes, network interfaces,
//! LANs, block storage volumes, and boot-time services.

use crate::params::ValidationError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A shared layer-2 broadcast domain connecting node interfaces.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Lan {
    /// Unique LAN name within the graph
    pub name: String,
    /// Whether the backend may provision this LAN with best-effort bandwidth
    pub best_effort: bool,
    /// Names of member interfaces, one per participating node
    pub interfaces: Vec<String>,
}

impl Lan {
    pub fn new(name: &str, best_effort: bool) -> Self {
        Self {
            name: name.to_string(),
            best_effort,
            interfaces: Vec::new(),
        }
    }
}

/// A named attachment point on a node to exactly one LAN.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Interface {
    /// Interface name, unique across the whole graph
    pub name: String,
    /// Name of the LAN this interface is attached to
    pub lan: String,
}

/// A persistent storage volume attachment request for a node.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Blockstore {
    /// Volume name, unique across the whole graph
    pub name: String,
    /// Mount path (or device path) on the node
    pub mount_point: String,
    /// Requested capacity in gigabytes
    pub size_gb: u64,
}

/// A root-privileged shell command executed once after the node boots.
///
/// Commands are opaque to the builder; only their per-node ordering is
/// guaranteed.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Service {
    /// Shell used to run the command (e.g. "sh", "bash")
    pub shell: String,
    /// The command string, with any required arguments already substituted
    pub command: String,
}

/// A single machine request.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Node {
    /// Logical node name, unique within the graph
    pub name: String,
    /// Disk image URN
    pub disk_image: String,
    /// Hardware type constraint; `None` means any available type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_type: Option<String>,
    /// Network attachments, one per declared LAN
    pub interfaces: Vec<Interface>,
    /// Storage volume requests
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blockstores: Vec<Blockstore>,
    /// Boot services, in execution order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
}

impl Node {
    pub fn new(name: &str, disk_image: &str, hardware_type: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            disk_image: disk_image.to_string(),
            hardware_type,
            interfaces: Vec::new(),
            blockstores: Vec::new(),
            services: Vec::new(),
        }
    }

    pub fn add_service(&mut self, shell: &str, command: impl Into<String>) {
        self.services.push(Service {
            shell: shell.to_string(),
            command: command.into(),
        });
    }
}

/// Descriptive text attached to the graph, rendered as markdown by the
/// portal.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Tour {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// The root resource-specification document.
///
/// Owns all LANs and nodes; serialized to YAML exactly once after
/// construction completes and [`ResourceGraph::validate`] has passed.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResourceGraph {
    pub lans: Vec<Lan>,
    pub nodes: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour: Option<Tour>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self {
            lans: Vec::new(),
            nodes: Vec::new(),
            tour: None,
        }
    }

    /// Look up a LAN by name.
    pub fn lan(&self, name: &str) -> Option<&Lan> {
        self.lans.iter().find(|l| l.name == name)
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Nodes whose names start with `"<role>-"`.
    pub fn nodes_with_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a Node> {
        let prefix = format!("{}-", role);
        self.nodes
            .iter()
            .filter(move |n| n.name.starts_with(&prefix))
    }

    /// Check the structural invariants of a finished graph.
    ///
    /// - node names are unique;
    /// - interface names are unique graph-wide;
    /// - every interface references a LAN present in the graph;
    /// - LAN membership lists agree with node interfaces, with at most one
    ///   interface per node on any one LAN;
    /// - blockstore names are unique and sizes are positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut node_names = HashSet::new();
        for node in &self.nodes {
            if !node_names.insert(node.name.as_str()) {
                return Err(ValidationError::InvalidTopology(format!(
                    "duplicate node name '{}'",
                    node.name
                )));
            }
        }

        let lan_names: HashSet<&str> = self.lans.iter().map(|l| l.name.as_str()).collect();
        if lan_names.len() != self.lans.len() {
            return Err(ValidationError::InvalidTopology(
                "duplicate LAN name".to_string(),
            ));
        }

        // Map each interface name to its owning node while checking
        // graph-wide uniqueness and LAN resolution.
        let mut iface_owner: HashMap<&str, &str> = HashMap::new();
        for node in &self.nodes {
            let mut lans_seen = HashSet::new();
            for iface in &node.interfaces {
                if iface_owner.insert(iface.name.as_str(), node.name.as_str()).is_some() {
                    return Err(ValidationError::InvalidTopology(format!(
                        "duplicate interface name '{}'",
                        iface.name
                    )));
                }
                if !lan_names.contains(iface.lan.as_str()) {
                    return Err(ValidationError::InvalidTopology(format!(
                        "interface '{}' references unknown LAN '{}'",
                        iface.name, iface.lan
                    )));
                }
                if !lans_seen.insert(iface.lan.as_str()) {
                    return Err(ValidationError::InvalidTopology(format!(
                        "node '{}' attaches to LAN '{}' more than once",
                        node.name, iface.lan
                    )));
                }
            }
        }

        // LAN membership lists must name real interfaces that are attached
        // to that LAN.
        for lan in &self.lans {
            for member in &lan.interfaces {
                let owner = iface_owner.get(member.as_str()).ok_or_else(|| {
                    ValidationError::InvalidTopology(format!(
                        "LAN '{}' lists unknown interface '{}'",
                        lan.name, member
                    ))
                })?;
                let attached = self
                    .node(owner)
                    .and_then(|n| n.interfaces.iter().find(|i| &i.name == member));
                match attached {
                    Some(iface) if iface.lan == lan.name => {}
                    _ => {
                        return Err(ValidationError::InvalidTopology(format!(
                            "interface '{}' is listed on LAN '{}' but not attached to it",
                            member, lan.name
                        )))
                    }
                }
            }
        }

        let mut blockstore_names = HashSet::new();
        for node in &self.nodes {
            for bs in &node.blockstores {
                if !blockstore_names.insert(bs.name.as_str()) {
                    return Err(ValidationError::InvalidTopology(format!(
                        "duplicate blockstore name '{}'",
                        bs.name
                    )));
                }
                if bs.size_gb == 0 {
                    return Err(ValidationError::InvalidTopology(format!(
                        "blockstore '{}' has zero size",
                        bs.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for ResourceGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_one_node() -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        let mut lan = Lan::new("management", true);
        let mut node = Node::new("controller-1", "urn:image", None);
        node.interfaces.push(Interface {
            name: "mgmt-controller-1".to_string(),
            lan: "management".to_string(),
        });
        lan.interfaces.push("mgmt-controller-1".to_string());
        graph.lans.push(lan);
        graph.nodes.push(node);
        graph
    }

    #[test]
    fn test_valid_graph_passes() {
        assert!(graph_with_one_node().validate().is_ok());
    }

    #[test]
    fn test_duplicate_node_name_rejected() {
        let mut graph = graph_with_one_node();
        graph
            .nodes
            .push(Node::new("controller-1", "urn:image", None));
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate node name"));
    }

    #[test]
    fn test_unknown_lan_rejected() {
        let mut graph = graph_with_one_node();
        graph.nodes[0].interfaces.push(Interface {
            name: "data-controller-1".to_string(),
            lan: "data".to_string(),
        });
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("unknown LAN"));
    }

    #[test]
    fn test_duplicate_lan_membership_rejected() {
        let mut graph = graph_with_one_node();
        graph.nodes[0].interfaces.push(Interface {
            name: "mgmt2-controller-1".to_string(),
            lan: "management".to_string(),
        });
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_zero_size_blockstore_rejected() {
        let mut graph = graph_with_one_node();
        graph.nodes[0].blockstores.push(Blockstore {
            name: "controller-1-storage".to_string(),
            mount_point: "/opt/openstack".to_string(),
            size_gb: 0,
        });
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("zero size"));
    }

    #[test]
    fn test_stale_lan_member_rejected() {
        let mut graph = graph_with_one_node();
        graph.lans[0]
            .interfaces
            .push("mgmt-compute-1".to_string());
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("unknown interface"));
    }

    #[test]
    fn test_hardware_type_omitted_when_none() {
        let node = Node::new("controller-1", "urn:image", None);
        let yaml = serde_yaml::to_string(&node).unwrap();
        assert!(!yaml.contains("hardware_type"));

        let node = Node::new("controller-1", "urn:image", Some("d430".to_string()));
        let yaml = serde_yaml::to_string(&node).unwrap();
        assert!(yaml.contains("hardware_type: d430"));
    }
}
