//! Cluster models mapping keys to nodes.
use log::{debug, error, warn};

use crate::cluster::{ClusterSpec, ClusterType};
use crate::config::KetamaConfig;
use crate::digest::{DigestProvider, Md5Digest};
use crate::error::Error;
use crate::hash::{hash_chunk, HashAlgorithm, KetamaHash, CHUNKS_PER_DIGEST};
use crate::node::NodeSpec;
use crate::ring::Ring;

/// Routing interface shared by cluster models.
///
/// A model is fully built by its constructor; every query on it is read-only.
pub trait ClusterModel {
    /// The nodes this model routes to. Node indexes refer to positions in this slice.
    fn nodes(&self) -> &[NodeSpec];

    /// Index into [`ClusterModel::nodes`] of the node owning `key`.
    fn node_index_for<K: AsRef<[u8]>>(&self, key: K) -> usize;

    /// The node owning `key`.
    ///
    /// The same key always resolves to the same node for a given model.
    fn node_for_key<K: AsRef<[u8]>>(&self, key: K) -> &NodeSpec {
        &self.nodes()[self.node_index_for(key)]
    }

    /// Groups `keys` by owning node.
    ///
    /// The returned vector holds one (possibly empty) group per node, in the order of
    /// [`ClusterModel::nodes`]. Keys keep their relative order within a group.
    fn partition_keys<I, K>(&self, keys: I) -> Vec<Vec<K>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let mut keys_for_node: Vec<Vec<K>> = self.nodes().iter().map(|_| Vec::new()).collect();
        for key in keys {
            let node_index = self.node_index_for(&key);
            keys_for_node[node_index].push(key);
        }
        keys_for_node
    }

    /// Whether nodes may be added to or removed from this model after construction.
    fn supports_reconfiguration(&self) -> bool;

    /// Whether this model can serve clusters of the given type.
    fn supports(&self, cluster_type: ClusterType) -> bool;

    /// Adds a node to the cluster.
    fn add_node(&mut self, node: NodeSpec) -> Result<(), Error>;

    /// Removes a node from the cluster.
    fn remove_node(&mut self, node: &NodeSpec) -> Result<(), Error>;
}

/// Ketama consistent hashing over a static set of nodes.
///
/// Each node is hashed onto the ring at `4 * slots` points, where the slot count grows with the
/// natural log of the cluster size. A key belongs to the node owning the first point at or after
/// the key's hash, wrapping around past the last point.
///
/// The node set is fixed at construction: [`ClusterModel::add_node`] and
/// [`ClusterModel::remove_node`] always fail with [`Error::UnsupportedOperation`].
pub struct KetamaClusterModel<D = Md5Digest> {
    nodes: Vec<NodeSpec>,
    ring: Ring,
    hash: KetamaHash<D>,
    node_replication_count: usize,
    slots_per_node: usize,
}

impl KetamaClusterModel<Md5Digest> {
    /// Builds a model for `spec` using MD5 digests and the default [`KetamaConfig`].
    pub fn new(spec: &ClusterSpec) -> Result<Self, Error> {
        KetamaClusterModel::with_config(spec, KetamaConfig::default())
    }

    /// Builds a model for `spec` using MD5 digests and the given config.
    pub fn with_config(spec: &ClusterSpec, config: KetamaConfig) -> Result<Self, Error> {
        KetamaClusterModel::with_digest(spec, config, Md5Digest)
    }
}

impl<D: DigestProvider> KetamaClusterModel<D> {
    /// Builds a model for `spec` using the given config and digest provider.
    ///
    /// Fails if `spec` has no nodes, declares a cluster type or hash algorithm other than
    /// consistent-hash/Ketama, if `config` is rejected by [`KetamaConfig::validate`], or if the
    /// finished ring does not hold exactly [`KetamaConfig::expected_ring_len`] points.
    pub fn with_digest(spec: &ClusterSpec, config: KetamaConfig, digest: D) -> Result<Self, Error> {
        if !supports_cluster_type(spec.cluster_type()) {
            return Err(Error::UnsupportedOperation(format!(
                "ketama cluster model cannot serve a `{}` cluster",
                spec.cluster_type()
            )));
        }
        if spec.hash_algorithm() != HashAlgorithm::Ketama {
            return Err(Error::UnsupportedOperation(format!(
                "ketama cluster model requires `{}` hashing, got `{}`",
                HashAlgorithm::Ketama,
                spec.hash_algorithm()
            )));
        }

        let nodes = spec.nodes().to_vec();
        if nodes.is_empty() {
            return Err(Error::EmptyCluster);
        }

        let expected = config.validate(nodes.len())?;
        let node_replication_count = config.replication_count(nodes.len());
        let slots_per_node = config.slots_per_node(nodes.len());
        let hash = KetamaHash::new(digest);

        let ring = build_continuum(&nodes, &hash, slots_per_node);

        if ring.len() != expected {
            error!(
                "ring size: {} | expected: {} ({} nodes, {} slots per node)",
                ring.len(),
                expected,
                nodes.len(),
                slots_per_node
            );
            return Err(Error::InvariantViolation {
                observed: ring.len(),
                expected,
            });
        }
        if ring.is_empty() {
            error!(
                "ring for {} node(s) has no points with {} slots per node",
                nodes.len(),
                slots_per_node
            );
            return Err(Error::EmptyRing);
        }

        debug!(
            "mapped {} nodes onto {} ring points (replication count {}, {} slots per node)",
            nodes.len(),
            ring.len(),
            node_replication_count,
            slots_per_node
        );

        Ok(KetamaClusterModel {
            nodes,
            ring,
            hash,
            node_replication_count,
            slots_per_node,
        })
    }

    /// The ring backing this model.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// Replication count derived from the node count, before quantization to slots.
    pub fn node_replication_count(&self) -> usize {
        self.node_replication_count
    }

    /// Number of digests hashed per node.
    pub fn slots_per_node(&self) -> usize {
        self.slots_per_node
    }

    /// Ring coordinate of `key`.
    pub fn hash_key<K: AsRef<[u8]>>(&self, key: K) -> i64 {
        self.hash.hash_key(key)
    }
}

impl<D: DigestProvider> ClusterModel for KetamaClusterModel<D> {
    fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    fn node_index_for<K: AsRef<[u8]>>(&self, key: K) -> usize {
        self.ring.node_index_for(self.hash.hash_key(key))
    }

    fn supports_reconfiguration(&self) -> bool {
        false
    }

    fn supports(&self, cluster_type: ClusterType) -> bool {
        supports_cluster_type(cluster_type)
    }

    fn add_node(&mut self, node: NodeSpec) -> Result<(), Error> {
        warn!("rejected addition of node {} to ketama cluster", node);
        Err(reconfiguration_unsupported())
    }

    fn remove_node(&mut self, node: &NodeSpec) -> Result<(), Error> {
        warn!("rejected removal of node {} from ketama cluster", node);
        Err(reconfiguration_unsupported())
    }
}

fn supports_cluster_type(cluster_type: ClusterType) -> bool {
    cluster_type == ClusterType::ConsistentHash
}

fn reconfiguration_unsupported() -> Error {
    Error::UnsupportedOperation(
        "ketama cluster model does not support reconfiguration of nodes".to_string(),
    )
}

fn build_continuum<D: DigestProvider>(
    nodes: &[NodeSpec],
    hash: &KetamaHash<D>,
    slots_per_node: usize,
) -> Ring {
    nodes
        .iter()
        .enumerate()
        .flat_map(move |(node_index, node)| {
            // one digest per slot, split into four points
            (0..slots_per_node).flat_map(move |slot| {
                let digest = hash.digest(node.replication_key(slot));
                (0..CHUNKS_PER_DIGEST).map(move |chunk| (hash_chunk(&digest, chunk), node_index))
            })
        })
        .collect()
}
