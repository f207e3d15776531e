//! UDP application interface of the UOE.

use super::SocketPair;

/// Datagram metadata.
pub type UdpAppMeta = SocketPair;

/// Datagram length in bytes.
pub type UdpAppDLen = u16;

/// Transmit-test request from the read path to the write path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UdpTestReq {
    /// Sockets of the datagram to generate, already swapped towards the requester.
    pub meta: UdpAppMeta,

    /// Datagram length.
    pub len: UdpAppDLen,
}
