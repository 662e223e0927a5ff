//! Static description of a cluster: its nodes and the routing scheme they are declared for.
use fxhash::FxHashSet;
use strum::{Display, EnumString};

use crate::error::Error;
use crate::hash::HashAlgorithm;
use crate::node::NodeSpec;

/// The routing scheme a cluster specification declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ClusterType {
    /// Keys are routed over a consistent hash ring.
    #[strum(serialize = "consistent-hash")]
    ConsistentHash,
    /// Keys are routed by their hash modulo the node count.
    #[strum(serialize = "modulo")]
    Modulo,
}

impl Default for ClusterType {
    fn default() -> Self {
        ClusterType::ConsistentHash
    }
}

/// The set of nodes making up a cluster, along with its declared type and key hash.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSpec {
    nodes: Vec<NodeSpec>,
    cluster_type: ClusterType,
    hash_algorithm: HashAlgorithm,
}

impl ClusterSpec {
    /// Creates a consistent-hash [`ClusterSpec`] over the given nodes.
    ///
    /// Node order is preserved and is the order node indexes refer to. Returns
    /// [`Error::DuplicateNode`] if two nodes share a name.
    pub fn new<I>(nodes: I) -> Result<ClusterSpec, Error>
    where
        I: IntoIterator<Item = NodeSpec>,
    {
        let nodes: Vec<NodeSpec> = nodes.into_iter().collect();

        let mut seen = FxHashSet::default();
        for node in &nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(Error::DuplicateNode(node.name.clone()));
            }
        }

        Ok(ClusterSpec {
            nodes,
            cluster_type: ClusterType::default(),
            hash_algorithm: HashAlgorithm::default(),
        })
    }

    /// Creates a [`ClusterSpec`] from a list of data source strings.
    ///
    /// See [`NodeSpec::from_dsn`] for the accepted formats.
    pub fn from_dsns<I, S>(dsns: I) -> Result<ClusterSpec, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes = dsns
            .into_iter()
            .map(NodeSpec::from_dsn)
            .collect::<Result<Vec<_>, _>>()?;

        ClusterSpec::new(nodes)
    }

    /// Declares the cluster type.
    pub fn with_cluster_type(mut self, cluster_type: ClusterType) -> ClusterSpec {
        self.cluster_type = cluster_type;
        self
    }

    /// Declares the key hashing algorithm.
    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> ClusterSpec {
        self.hash_algorithm = hash_algorithm;
        self
    }

    /// The nodes of the cluster, in declaration order.
    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    /// The declared cluster type.
    pub fn cluster_type(&self) -> ClusterType {
        self.cluster_type
    }

    /// The declared key hashing algorithm.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dsns() {
        let spec = ClusterSpec::from_dsns(vec!["10.0.0.1:6379", "tcp://10.0.0.2:6379"])
            .expect("valid dsns");

        let names: Vec<&str> = spec.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["10.0.0.1:6379", "10.0.0.2:6379"]);
        assert_eq!(spec.cluster_type(), ClusterType::ConsistentHash);
        assert_eq!(spec.hash_algorithm(), HashAlgorithm::Ketama);
    }

    #[test]
    fn test_from_dsns_propagates_dsn_errors() {
        let result = ClusterSpec::from_dsns(&["10.0.0.1:6379", "tcp://10.0.0.2"]);

        assert_eq!(result, Err(Error::InvalidDsn("tcp://10.0.0.2".to_string())));
    }

    #[test]
    fn test_duplicate_nodes_are_rejected() {
        let result = ClusterSpec::from_dsns(&["10.0.0.1:6379", "tcp://10.0.0.1:6379"]);

        assert_eq!(
            result,
            Err(Error::DuplicateNode("10.0.0.1:6379".to_string()))
        );
    }

    #[test]
    fn test_setters() {
        let spec = ClusterSpec::new(vec![NodeSpec::new("a")])
            .expect("valid spec")
            .with_cluster_type(ClusterType::Modulo)
            .with_hash_algorithm(HashAlgorithm::Crc32);

        assert_eq!(spec.cluster_type(), ClusterType::Modulo);
        assert_eq!(spec.hash_algorithm(), HashAlgorithm::Crc32);
    }

    #[test]
    fn test_cluster_type_from_str() {
        assert_eq!(
            "consistent-hash".parse::<ClusterType>(),
            Ok(ClusterType::ConsistentHash)
        );
        assert_eq!("modulo".parse::<ClusterType>(), Ok(ClusterType::Modulo));
        assert!("ring".parse::<ClusterType>().is_err());
        assert_eq!(ClusterType::ConsistentHash.to_string(), "consistent-hash");
    }
}
