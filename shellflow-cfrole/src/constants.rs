//! Constants for the shell interfaces.

use static_assertions::const_assert;

/// Listen ports, shared by the TCP and UDP shell interfaces.
///
/// The port table of the offload engines splits the port space into static ports (`0..0x8000`),
/// used for listening, and ephemeral ports (`0x8000..`), used for active connections.
pub mod ports {
    use super::*;

    /// Receive test mode: the traffic is dumped.
    pub const RECV_MODE_LSN_PORT: u16 = 8800;
    /// Transmit test mode: the traffic carries a transmit request.
    pub const XMIT_MODE_LSN_PORT: u16 = 8801;
    /// Echo, store-and-forward variant.
    pub const ECHO_MOD2_LSN_PORT: u16 = 8802;
    /// Echo, pass-through variant.
    pub const ECHO_MODE_LSN_PORT: u16 = 8803;
    /// Legacy iperf.
    pub const IPERF_LSN_PORT: u16 = 5001;
    /// Legacy iperf3.
    pub const IPREF3_LSN_PORT: u16 = 5201;

    /// Ports opened at startup, in request order.
    pub const LSN_PORT_TABLE: [u16; 6] = [
        RECV_MODE_LSN_PORT,
        XMIT_MODE_LSN_PORT,
        ECHO_MOD2_LSN_PORT,
        ECHO_MODE_LSN_PORT,
        IPERF_LSN_PORT,
        IPREF3_LSN_PORT,
    ];

    /// Maximum number of listen ports a shell interface can be configured with.
    pub const LSN_PORTS_MAX: usize = 8;

    /// First ephemeral port.
    pub const EPHEMERAL_PORT_BASE: u16 = 0x8000;

    const_assert!(LSN_PORT_TABLE.len() <= LSN_PORTS_MAX);
    const_assert!(RECV_MODE_LSN_PORT < EPHEMERAL_PORT_BASE);
    const_assert!(XMIT_MODE_LSN_PORT < EPHEMERAL_PORT_BASE);
    const_assert!(ECHO_MOD2_LSN_PORT < EPHEMERAL_PORT_BASE);
    const_assert!(ECHO_MODE_LSN_PORT < EPHEMERAL_PORT_BASE);
    const_assert!(IPERF_LSN_PORT < EPHEMERAL_PORT_BASE);
    const_assert!(IPREF3_LSN_PORT < EPHEMERAL_PORT_BASE);
}

/// Transmit test pattern.
pub mod pattern {
    /// First chunk, `"Hi from "`.
    pub const GEN_CHK0: u64 = 0x48692066726f6d20;
    /// Second chunk, `"FMKU60!\n"`.
    pub const GEN_CHK1: u64 = 0x464d4b553630210a;
}

// Constants for `tcp_shell_if`.
#[allow(missing_docs)]
pub mod tcp_shell_if {
    use super::*;

    pub const MAX_SESSIONS: usize = 32;
    pub const SESSION_ID_WIDTH: usize = shellflow::clog2(MAX_SESSIONS);

    /// Capacity of the input read buffer, in chunks.
    pub const INPUT_BUFFER_CHUNKS: usize = 256;
    pub const STREAM_DEPTH: usize = 32;

    /// Send requests issued for one transfer before it is abandoned.
    pub const SEND_RETRIES: u32 = 512;
    pub const LSN_WATCHDOG: u32 = 100;
    pub const CON_WATCHDOG: u32 = 10_000;

    pub const FAULT_HISTORY: usize = 256;

    const_assert!(SESSION_ID_WIDTH <= 16);
    const_assert!(INPUT_BUFFER_CHUNKS > 1);
    const_assert!(STREAM_DEPTH > 1);
    const_assert!(SEND_RETRIES > 0);
}

// Constants for `udp_shell_if`.
#[allow(missing_docs)]
pub mod udp_shell_if {
    use super::*;

    /// Port closed at startup. No role traffic uses it.
    pub const CLOSE_PORT: u16 = 0xDEAD;
    pub const STREAM_DEPTH: usize = 32;
    pub const LSN_WATCHDOG: u32 = 100;

    pub const FAULT_HISTORY: usize = 256;

    const_assert!(STREAM_DEPTH > 1);
}
