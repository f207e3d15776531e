//! Socket addresses.

use std::fmt;
use std::net::Ipv4Addr;

use shellflow_std::axis::{AxisChunk, CHUNK_BYTES};

/// IPv4 socket address.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SockAddr {
    /// IPv4 address.
    pub addr: u32,

    /// Port.
    pub port: u16,
}

impl SockAddr {
    /// Creates a new socket address.
    pub fn new(addr: u32, port: u16) -> Self { Self { addr, port } }
}

impl fmt::Display for SockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", Ipv4Addr::from(self.addr), self.port)
    }
}

/// Source and destination sockets of a datagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketPair {
    /// Source socket.
    pub src: SockAddr,

    /// Destination socket.
    pub dst: SockAddr,
}

impl SocketPair {
    /// Creates a new socket pair.
    pub fn new(src: SockAddr, dst: SockAddr) -> Self { Self { src, dst } }

    /// Returns the pair seen from the other end: source and destination are exchanged.
    pub fn swapped(self) -> Self { Self { src: self.dst, dst: self.src } }
}

impl fmt::Display for SocketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} -> {}", self.src, self.dst) }
}

/// Control record embedded in the first chunk of a transmit-test stream.
///
/// The record is 8 bytes in network byte order: remote address (4), remote port (2) and requested
/// length (2).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SockLen {
    /// Remote socket.
    pub sock: SockAddr,

    /// Number of bytes to transmit; zero requests a new connection.
    pub len: u16,
}

impl SockLen {
    /// Creates a new control record.
    pub fn new(sock: SockAddr, len: u16) -> Self { Self { sock, len } }

    /// Parses a record from a chunk. Returns `None` unless the chunk carries 8 valid bytes.
    pub fn from_chunk(chunk: &AxisChunk) -> Option<Self> {
        if chunk.len() < CHUNK_BYTES || !chunk.is_keep_contiguous() {
            return None;
        }
        let d = &chunk.tdata;
        let addr = u32::from_be_bytes([d[0], d[1], d[2], d[3]]);
        let port = u16::from_be_bytes([d[4], d[5]]);
        let len = u16::from_be_bytes([d[6], d[7]]);
        Some(Self { sock: SockAddr { addr, port }, len })
    }

    /// Encodes the record as a single chunk.
    pub fn to_chunk(&self, tlast: bool) -> AxisChunk {
        let mut tdata = [0; CHUNK_BYTES];
        tdata[0..4].copy_from_slice(&self.sock.addr.to_be_bytes());
        tdata[4..6].copy_from_slice(&self.sock.port.to_be_bytes());
        tdata[6..8].copy_from_slice(&self.len.to_be_bytes());
        AxisChunk::new(tdata, 0xFF, tlast)
    }
}
