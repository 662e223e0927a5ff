//! Replication settings for the Ketama model.
use crate::error::Error;
use crate::hash::CHUNKS_PER_DIGEST;

/// Default multiplier `k` in the `k * ln(C)` replication count, `C` being the node count.
pub const REPLICATION_CONSTANT: f64 = 10.0;

/// Upper bound on the number of points a ring may hold.
pub const MAX_RING_POINTS: usize = 1 << 24;

/// Tunables for building a Ketama ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KetamaConfig {
    /// Multiplier applied to the natural log of the node count to get the replication count.
    pub replication_constant: f64,
    /// Lower bound on the number of digest slots hashed per node.
    ///
    /// Small clusters have a replication count below 4 (a single node has none at all), which
    /// would otherwise leave them with no ring points.
    pub min_slots_per_node: usize,
}

impl Default for KetamaConfig {
    fn default() -> Self {
        KetamaConfig {
            replication_constant: REPLICATION_CONSTANT,
            min_slots_per_node: 1,
        }
    }
}

impl KetamaConfig {
    /// Sets the replication constant.
    pub fn with_replication_constant(mut self, replication_constant: f64) -> KetamaConfig {
        self.replication_constant = replication_constant;
        self
    }

    /// Sets the minimum number of slots per node.
    pub fn with_min_slots_per_node(mut self, min_slots_per_node: usize) -> KetamaConfig {
        self.min_slots_per_node = min_slots_per_node;
        self
    }

    /// Checks the config against a cluster of `node_count` nodes, returning the number of ring
    /// points it calls for.
    ///
    /// Fails with [`Error::UnsupportedOperation`] if the replication constant is not a positive
    /// finite number, or if the ring would need more than [`MAX_RING_POINTS`] points.
    pub fn validate(&self, node_count: usize) -> Result<usize, Error> {
        if !self.replication_constant.is_finite() || self.replication_constant <= 0.0 {
            return Err(Error::UnsupportedOperation(format!(
                "replication constant must be positive and finite, got {}",
                self.replication_constant
            )));
        }
        match self.expected_ring_len(node_count) {
            Some(points) if points <= MAX_RING_POINTS => Ok(points),
            _ => Err(Error::UnsupportedOperation(format!(
                "{} nodes with {} slots each exceed the limit of {} ring points",
                node_count,
                self.slots_per_node(node_count),
                MAX_RING_POINTS
            ))),
        }
    }

    /// Replication count for a cluster of `node_count` nodes under this config.
    ///
    /// A `node_count` of zero yields zero.
    pub fn replication_count(&self, node_count: usize) -> usize {
        if node_count == 0 {
            return 0;
        }
        // `as` saturates, so a negative product clamps to zero.
        ((node_count as f64).ln() * self.replication_constant).floor() as usize
    }

    /// Number of digests hashed per node; each contributes [`CHUNKS_PER_DIGEST`] ring points.
    pub fn slots_per_node(&self, node_count: usize) -> usize {
        std::cmp::max(
            self.replication_count(node_count) / CHUNKS_PER_DIGEST,
            self.min_slots_per_node,
        )
    }

    /// Number of ring points a cluster of `node_count` nodes must end up with.
    ///
    /// Returns `None` if the count does not fit in a `usize`.
    pub fn expected_ring_len(&self, node_count: usize) -> Option<usize> {
        self.slots_per_node(node_count)
            .checked_mul(CHUNKS_PER_DIGEST)?
            .checked_mul(node_count)
    }
}

/// Replication count `floor(ln(node_count) * 10)` for a cluster of `node_count` nodes.
pub fn replication_count(node_count: usize) -> usize {
    KetamaConfig::default().replication_count(node_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replication_count() {
        let expected = [(1, 0), (2, 6), (3, 10), (4, 13), (5, 16), (8, 20), (10, 23)];
        for (node_count, count) in expected.iter() {
            assert_eq!(replication_count(*node_count), *count, "nodes: {}", node_count);
        }
        assert_eq!(replication_count(0), 0);
    }

    #[test]
    fn test_slots_per_node_has_a_floor() {
        let config = KetamaConfig::default();

        assert_eq!(config.slots_per_node(1), 1);
        assert_eq!(config.slots_per_node(2), 1);
        assert_eq!(config.slots_per_node(4), 3);
        assert_eq!(config.expected_ring_len(4), Some(48));
        assert_eq!(config.expected_ring_len(1), Some(4));

        let unfloored = config.with_min_slots_per_node(0);
        assert_eq!(unfloored.slots_per_node(1), 0);
        assert_eq!(unfloored.expected_ring_len(1), Some(0));
    }

    #[test]
    fn test_custom_replication_constant() {
        let config = KetamaConfig::default().with_replication_constant(40.0);

        assert_eq!(config.replication_count(4), 55);
        assert_eq!(config.slots_per_node(4), 13);
    }

    #[test]
    fn test_validate() {
        assert_eq!(KetamaConfig::default().validate(4), Ok(48));
        for constant in [0.0, -1.0, f64::NAN, f64::INFINITY].iter() {
            let config = KetamaConfig::default().with_replication_constant(*constant);
            assert!(config.validate(4).is_err(), "constant: {}", constant);
        }
    }

    #[test]
    fn test_huge_replication_constant_does_not_overflow() {
        let config = KetamaConfig::default().with_replication_constant(1e30);

        assert_eq!(config.replication_count(4), usize::MAX);
        assert_eq!(config.expected_ring_len(4), None);
        assert!(matches!(
            config.validate(4),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_ring_point_limit() {
        let at_limit = KetamaConfig::default().with_min_slots_per_node(MAX_RING_POINTS / 8);
        assert_eq!(at_limit.expected_ring_len(2), Some(MAX_RING_POINTS));
        assert_eq!(at_limit.validate(2), Ok(MAX_RING_POINTS));

        let past_limit = at_limit.with_min_slots_per_node(MAX_RING_POINTS / 8 + 1);
        assert!(matches!(
            past_limit.validate(2),
            Err(Error::UnsupportedOperation(_))
        ));

        let saturated = KetamaConfig::default().with_min_slots_per_node(usize::MAX);
        assert_eq!(saturated.expected_ring_len(3), None);
        assert!(saturated.validate(3).is_err());
    }
}
