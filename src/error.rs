use std::fmt;

/// Error type for cluster model construction and reconfiguration.
#[derive(Debug)]
pub enum Error {
    /// The constructed ring does not hold the number of points the node count calls for.
    ///
    /// This signals a hashing or construction defect, not bad input.
    InvariantViolation {
        /// Number of points actually present on the ring.
        observed: usize,
        /// Number of points the node count and replication settings call for.
        expected: usize,
    },
    /// The requested operation or configuration is not supported by this model.
    UnsupportedOperation(String),
    /// The cluster specification contains no nodes.
    EmptyCluster,
    /// Construction produced a ring with no points, so no key could be routed.
    EmptyRing,
    /// Two nodes in the cluster specification share the same name.
    DuplicateNode(String),
    /// A node DSN was well-formed but could not be turned into an endpoint.
    InvalidDsn(String),
    /// A node DSN could not be parsed at all.
    Url(url::ParseError),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvariantViolation {
                    observed: o1,
                    expected: e1,
                },
                Self::InvariantViolation {
                    observed: o2,
                    expected: e2,
                },
            ) => o1 == o2 && e1 == e2,
            (Self::UnsupportedOperation(s1), Self::UnsupportedOperation(s2)) => s1 == s2,
            (Self::EmptyCluster, Self::EmptyCluster) => true,
            (Self::EmptyRing, Self::EmptyRing) => true,
            (Self::DuplicateNode(n1), Self::DuplicateNode(n2)) => n1 == n2,
            (Self::InvalidDsn(d1), Self::InvalidDsn(d2)) => d1 == d2,
            (Self::Url(e1), Self::Url(e2)) => e1 == e2,
            _ => false,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Url(ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvariantViolation { observed, expected } => write!(
                f,
                "invariant violation: ring holds {} points, expected {}",
                observed, expected
            ),
            Self::UnsupportedOperation(s) => write!(f, "unsupported: {}", s),
            Self::EmptyCluster => write!(f, "cluster has no nodes"),
            Self::EmptyRing => write!(f, "ring has no points"),
            Self::DuplicateNode(n) => write!(f, "duplicate node: {}", n),
            Self::InvalidDsn(d) => write!(f, "invalid dsn: {}", d),
            Self::Url(e) => write!(f, "url: {}", e),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Url(e)
    }
}
