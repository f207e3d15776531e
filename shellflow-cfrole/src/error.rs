//! Protocol faults of the shell interfaces.
//!
//! None of these abort a process: they are reported to the [`Monitor`](shellflow::Monitor) and the
//! affected transfer is retried or discarded.

use shellflow_std::fifo::TrackerError;
use thiserror::Error;

use crate::types::tcp::{SessionId, TcpState};
use crate::types::SockAddr;

/// Shell interface faults.
#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("notification of zero bytes for session {sess_id}, discarded")]
    ZeroLengthNotification { sess_id: SessionId },

    #[error("session {sess_id} is out of the interrupt table ({max} sessions), notification discarded")]
    SessionOutOfRange { sess_id: SessionId, max: usize },

    #[error("session {sess_id}: {expected} bytes were requested but the stream carried {actual}")]
    StreamLengthMismatch { sess_id: SessionId, expected: u16, actual: usize },

    #[error("expected metadata of session {expected}, received session {actual}; stream discarded")]
    SessionMismatch { expected: SessionId, actual: SessionId },

    #[error("control record of {bytes} bytes is too short")]
    MalformedRecord { bytes: usize },

    #[error("transmit request of zero bytes from {requester}")]
    ZeroLengthTestRequest { requester: SockAddr },

    #[error("transmit request for {requested} but the last opened connection is to {opened}")]
    SocketMismatch { requested: SockAddr, opened: SockAddr },

    #[error("transmit request for {requested} but no connection was opened")]
    NoOpenConnection { requested: SockAddr },

    #[error("failed to connect to {sock} (TCP state is {state:?})")]
    OpenFailed { sock: SockAddr, state: TcpState },

    #[error("timeout while connecting to {sock}")]
    OpenTimeout { sock: SockAddr },

    #[error("unexpected open reply for session {sess_id}, closing it")]
    UnexpectedOpenReply { sess_id: SessionId },

    #[error("send reply for session {sess_id} carries unknown error code {code}")]
    UnknownSendReply { sess_id: SessionId, code: u8 },

    #[error("session {sess_id} is not established, transfer abandoned")]
    NoConnection { sess_id: SessionId },

    #[error("session {sess_id}: no transmit space after {attempts} requests, transfer abandoned")]
    SendRetriesExhausted { sess_id: SessionId, attempts: u32 },

    #[error("input read buffer: {0}")]
    InputBuffer(#[from] TrackerError),

    #[error("listening on port {port} was denied")]
    ListenDenied { port: u16 },

    #[error("timeout while requesting to listen on port {port}")]
    ListenTimeout { port: u16 },

    #[error("closing port {port} was denied, it is still open")]
    CloseDenied { port: u16 },

    #[error("unexpected close reply")]
    UnexpectedCloseReply,
}
