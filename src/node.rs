//! Cluster node identities.
use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::Error;

/// Network location of a cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// A TCP host and port.
    Tcp {
        /// Host name or IP address.
        host: String,
        /// TCP port.
        port: u16,
    },
    /// A UNIX domain socket.
    Unix(PathBuf),
}

/// Identity of a single cluster member.
///
/// A [`NodeSpec`] is only an identity: the cluster model never connects to it. Its name seeds the
/// replication keys that place the node's virtual points on the ring, so two specs with the same
/// name occupy the same points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeSpec {
    /// The name of the node, typically `<host>:<port>` or a socket path.
    pub name: String,
    endpoint: Option<Endpoint>,
}

impl NodeSpec {
    /// Creates an opaque [`NodeSpec`] with the given name and no endpoint.
    pub fn new<S: Into<String>>(name: S) -> NodeSpec {
        NodeSpec {
            name: name.into(),
            endpoint: None,
        }
    }

    /// Creates a new [`NodeSpec`] based on the given data source string.
    ///
    /// Supports UNIX domain sockets and TCP endpoints.
    /// For TCP: the DSN should be in the format of `tcp://<IP>:<port>` or `<IP>:<port>`.
    /// For UNIX: the DSN should be in the format of `unix://<path>`.
    pub fn from_dsn<S: AsRef<str>>(dsn: S) -> Result<NodeSpec, Error> {
        let dsn = dsn.as_ref();
        let url = if dsn.contains("://") {
            Url::parse(dsn)?
        } else {
            Url::parse(&format!("tcp://{}", dsn))?
        };

        match url.scheme() {
            "tcp" => {
                let host = url
                    .host_str()
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| Error::InvalidDsn(dsn.to_string()))?;
                let port = url
                    .port()
                    .ok_or_else(|| Error::InvalidDsn(dsn.to_string()))?;

                Ok(NodeSpec {
                    name: format!("{}:{}", host, port),
                    endpoint: Some(Endpoint::Tcp {
                        host: host.to_string(),
                        port,
                    }),
                })
            }
            "unix" => {
                let path = url.path();
                if path.is_empty() || path == "/" {
                    return Err(Error::InvalidDsn(dsn.to_string()));
                }

                Ok(NodeSpec {
                    name: path.to_string(),
                    endpoint: Some(Endpoint::Unix(PathBuf::from(path))),
                })
            }
            _ => Err(Error::InvalidDsn(dsn.to_string())),
        }
    }

    /// The endpoint this node was parsed from, if any.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Bytes hashed to place the node's virtual points for replication slot `slot`.
    ///
    /// Keys are distinct for every slot of a node and stable across calls.
    pub fn replication_key(&self, slot: usize) -> Vec<u8> {
        format!("{}-{}", self.name, slot).into_bytes()
    }
}

impl fmt::Display for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}
