//! TCP application interface of the TOE, and the messages internal to the TCP shell interface.

/// Session identifier assigned by the TOE.
pub type SessionId = u16;

/// Notification of received data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TcpAppNotif {
    /// Session which received data.
    pub sess_id: SessionId,

    /// Number of bytes ready to be read.
    pub tcp_dat_len: u16,

    /// Remote IPv4 address.
    pub ip4_src_addr: u32,

    /// Remote port.
    pub tcp_src_port: u16,

    /// Local port the traffic was sent to.
    pub tcp_dst_port: u16,
}

/// Request to read data from a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TcpAppRdReq {
    pub sess_id: SessionId,
    pub length: u16,
}

/// TCP connection state, as reported in an open reply.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpState {
    Closed,
    SynSent,
    SynReceived,
    Established,
    FinWait1,
    FinWait2,
    Closing,
    TimeWait,
    LastAck,
}

/// Reply to an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpAppOpnRep {
    /// Session of the new connection.
    pub sess_id: SessionId,

    /// State of the new connection; only [`TcpState::Established`] is a success.
    pub tcp_state: TcpState,
}

/// Request to send data on a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TcpAppSndReq {
    pub sess_id: SessionId,
    pub length: u16,
}

/// Reply to a send request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TcpAppSndRep {
    /// Session of the request.
    pub sess_id: SessionId,

    /// Requested length.
    pub length: u16,

    /// Free space in the TOE transmit buffer of the session.
    pub space_left: u16,

    /// Raw error code, see [`TcpAppSndErr`].
    pub error: u8,
}

/// Error code of a send reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpAppSndErr {
    /// The data may be sent.
    NoError = 0,

    /// Not enough space in the transmit buffer; ask again later.
    NoSpace = 1,

    /// The session is not established.
    NoConnection = 2,
}

impl TryFrom<u8> for TcpAppSndErr {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NoError),
            1 => Ok(Self::NoSpace),
            2 => Ok(Self::NoConnection),
            _ => Err(code),
        }
    }
}

/// What the read path does with a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Forward to the application.
    Keep,

    /// Discard.
    Drop,
}

/// Sub-opcode of a dropped stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCode {
    /// Discard everything.
    Nop,

    /// Extract the control record of the first chunk, then discard.
    Gen,
}

/// Directive from the scheduler to the read path, one per issued read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardCmd {
    pub sess_id: SessionId,
    pub length: u16,
    pub action: Action,
    pub drop_code: DropCode,
}

/// Per-session entry of the interrupt table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InterruptEntry {
    /// Bytes announced by the TOE and not yet requested.
    pub byte_cnt: u32,

    /// Local port the traffic was sent to.
    pub dst_port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_error_codes() {
        assert_eq!(TcpAppSndErr::try_from(0), Ok(TcpAppSndErr::NoError));
        assert_eq!(TcpAppSndErr::try_from(1), Ok(TcpAppSndErr::NoSpace));
        assert_eq!(TcpAppSndErr::try_from(2), Ok(TcpAppSndErr::NoConnection));
        assert_eq!(TcpAppSndErr::try_from(7), Err(7));
    }
}
