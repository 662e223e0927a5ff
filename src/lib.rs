//! Ketama consistent hashing for routing keys to a static set of cluster nodes.
//!
//! A [`KetamaClusterModel`] is built once from a [`ClusterSpec`] and then answers which node owns
//! a given key. Every node is placed on a hash ring at several virtual points derived from MD5
//! digests of its replication keys; a key belongs to the first point at or after its own hash.
//!
//! ```
//! use ketama_cluster::{ClusterModel, ClusterSpec, KetamaClusterModel};
//!
//! let spec = ClusterSpec::from_dsns(&["10.0.0.1:6379", "10.0.0.2:6379", "10.0.0.3:6379"])?;
//! let model = KetamaClusterModel::new(&spec)?;
//!
//! let node = model.node_for_key("user:1000");
//! assert!(spec.nodes().contains(node));
//! # Ok::<(), ketama_cluster::Error>(())
//! ```
#![deny(warnings, missing_docs)]

mod error;
pub use self::error::Error;

pub mod digest;
pub use self::digest::{DigestProvider, Md5Digest};

pub mod hash;
pub use self::hash::{HashAlgorithm, KetamaHash};

mod ring;
pub use self::ring::Ring;

mod node;
pub use self::node::{Endpoint, NodeSpec};

mod cluster;
pub use self::cluster::{ClusterSpec, ClusterType};

mod config;
pub use self::config::{replication_count, KetamaConfig, MAX_RING_POINTS, REPLICATION_CONSTANT};

mod model;
pub use self::model::{ClusterModel, KetamaClusterModel};
