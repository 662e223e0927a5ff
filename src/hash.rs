//! Hash functions that place keys and virtual nodes on the ring.
//!
//! Ring coordinates are `i64` values. Ketama coordinates are little-endian `u32` groups taken from
//! a 16-byte digest, so every coordinate lies in `0..=u32::MAX`. A lookup key is hashed to the
//! first group of its own digest, while a virtual node slot contributes all four groups of the
//! digest of its replication key. One digest therefore yields four ring points.

use strum::{Display, EnumString};

use crate::digest::{DigestProvider, Md5Digest, DIGEST_LEN};

/// Number of ring points derived from a single digest.
pub const CHUNKS_PER_DIGEST: usize = DIGEST_LEN / 4;

/// The Ketama ring hash, parameterized over the digest that feeds it.
#[derive(Debug, Default, Clone)]
pub struct KetamaHash<D = Md5Digest> {
    digest: D,
}

impl<D: DigestProvider> KetamaHash<D> {
    /// Creates a new [`KetamaHash`] backed by the given digest provider.
    pub fn new(digest: D) -> Self {
        KetamaHash { digest }
    }

    /// Computes the digest of `bytes` with the underlying provider.
    pub fn digest<K: AsRef<[u8]>>(&self, bytes: K) -> [u8; DIGEST_LEN] {
        self.digest.digest(bytes.as_ref())
    }

    /// Maps an arbitrary lookup key onto the ring.
    pub fn hash_key<K: AsRef<[u8]>>(&self, key: K) -> i64 {
        hash_chunk(&self.digest(key), 0)
    }
}

/// Reads the `chunk`-th 4-byte group of `digest` as a little-endian `u32`.
///
/// # Panics
///
/// Panics if `chunk` is not in `0..CHUNKS_PER_DIGEST`.
pub fn hash_chunk(digest: &[u8; DIGEST_LEN], chunk: usize) -> i64 {
    assert!(
        chunk < CHUNKS_PER_DIGEST,
        "chunk index {} out of range for a {}-byte digest",
        chunk,
        DIGEST_LEN
    );
    let offset = chunk * 4;
    let value = u32::from_le_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    i64::from(value)
}

/// Key hashing algorithm declared by a cluster specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum HashAlgorithm {
    /// MD5 based Ketama hashing with 4 ring points per digest.
    #[strum(serialize = "ketama")]
    Ketama,
    /// Plain CRC32 of the key.
    #[strum(serialize = "crc32")]
    Crc32,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Ketama
    }
}

impl HashAlgorithm {
    /// Hashes `key` into the ring coordinate space of this algorithm.
    pub fn hash<K: AsRef<[u8]>>(&self, key: K) -> i64 {
        match self {
            HashAlgorithm::Ketama => KetamaHash::new(Md5Digest).hash_key(key),
            HashAlgorithm::Crc32 => i64::from(crc32fast::hash(key.as_ref())),
        }
    }
}
