//! # Resource Specification Module
//!
//! Data structures for the resource-specification (RSpec) document that the
//! builder hands to the provisioning backend. The document describes every
//! requested machine, its network attachments into shared LANs, its storage
//! volumes, and the ordered shell commands to run after boot.
//!
//! The wire format is plain YAML produced by serde; the backend owns the
//! interpretation of the document. The contract on this side is that
//! [`ResourceGraph::validate`] holds before the graph is serialized:
//!
//! - node names are unique within the graph;
//! - every interface references a LAN present in the same graph;
//! - interface and blockstore names are unique graph-wide;
//! - no node attaches to the same LAN twice;
//! - blockstore sizes are positive.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Blockstore, Interface, Lan, Node, ResourceGraph, Service, Tour};
