//! Digest providers used as the source of ring hash material.

/// Length in bytes of every digest produced by a [`DigestProvider`].
pub const DIGEST_LEN: usize = 16;

/// Produces a fixed-length digest for an arbitrary byte sequence.
///
/// Implementations must be deterministic: the same input always yields the same digest. The
/// digest is only used to spread points over the ring, so it does not need to be a secure hash.
pub trait DigestProvider {
    /// Computes the digest of `bytes`.
    fn digest(&self, bytes: &[u8]) -> [u8; DIGEST_LEN];
}

/// MD5 digests, as used by libketama.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Md5Digest;

impl DigestProvider for Md5Digest {
    fn digest(&self, bytes: &[u8]) -> [u8; DIGEST_LEN] {
        md5::compute(bytes).0
    }
}
