//! # rspecgen - Configuration utility for testbed resource specifications
//!
//! This library generates resource-specification (RSpec) documents for an
//! external testbed provisioning backend. A profile declares a small set of
//! typed, user-overridable parameters; the topology builder validates them
//! and deterministically constructs a resource graph of machine requests,
//! network interfaces wired into shared LANs, block storage volumes, and
//! ordered post-boot shell commands.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `params`: Parameter declaration registry, binding, and coercion
//! - `report`: Validation error channel
//! - `preset`: The shipped profile shapes (multi-LAN OpenStack, Magnum)
//! - `rspec`: Resource-graph data structures and serialization
//! - `builder`: Single-pass topology construction
//! - `param_loader`: YAML override file loading
//!
//! ## Example Usage
//!
//! ```rust
//! use rspecgen::builder::generate_profile;
//! use rspecgen::preset::Preset;
//! use std::collections::BTreeMap;
//!
//! let profile = generate_profile(Preset::Openstack, &BTreeMap::new())?;
//! let yaml = serde_yaml::to_string(&profile.graph)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Parameter and topology problems are the single `ValidationError` domain
//! error; all violations found during binding are collected and reported
//! together rather than failing on the first. I/O and serialization use
//! `color_eyre` results with context.

pub mod builder;
pub mod param_loader;
pub mod params;
pub mod preset;
pub mod report;
pub mod rspec;
