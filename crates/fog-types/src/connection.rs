use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Lifecycle of a peer connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Failed,
}

/// A peer connection descriptor. Lives beside the object graph, not in it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub address: String,
    pub state: ConnectionState,
}

impl Connection {
    /// A new connection in the `Connecting` state. The address is checked.
    pub fn new(address: &str) -> Result<Self, TypeError> {
        check_address(address)?;
        Ok(Self {
            address: address.to_string(),
            state: ConnectionState::Connecting,
        })
    }
}

/// Check a peer address and return its port.
///
/// Only the text after the last `:` is checked, and it must parse as a
/// 16-bit port. The host part is not resolved or validated, so hostnames,
/// IPv6 literals and a bare port are all accepted.
pub fn check_address(address: &str) -> Result<u16, TypeError> {
    let port = address.rsplit(':').next().unwrap_or(address);
    port.parse().map_err(|e| TypeError::InvalidAddress {
        address: address.to_string(),
        reason: format!("bad port {port:?}: {e}"),
    })
}
