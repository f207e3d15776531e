//! Connect (COn): opens active connections and triggers the transmit test mode.

use log::{info, warn};
use shellflow::{Error, Stream};
use shellflow_std::Watchdog;

use crate::types::tcp::*;
use crate::types::{SockAddr, SockLen};
use crate::{Ctx, ShellError};

const NAME: &str = "TSIF/COn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    ReadRequest,
    OpenRequest(SockAddr),
    OpenReply(SockAddr),
    WriteTrigger(TcpAppSndReq),
}

/// Ingress streams of connect.
#[derive(Debug)]
pub struct I<'a> {
    /// Control records from the read path.
    pub sock_len: &'a mut Stream<SockLen>,

    /// Open replies from the TOE.
    pub opn_rep: &'a mut Stream<TcpAppOpnRep>,
}

/// Egress streams of connect.
#[derive(Debug)]
pub struct O<'a> {
    /// Open requests to the TOE.
    pub opn_req: &'a mut Stream<SockAddr>,

    /// Close requests to the TOE.
    pub cls_req: &'a mut Stream<SessionId>,

    /// Transmit test requests to the write path.
    pub test_req: &'a mut Stream<TcpAppSndReq>,
}

/// Serves the control records extracted by the read path.
///
/// A record of length zero opens a connection to its socket. A non-zero length asks to transmit
/// that many test bytes on the connection opened last, provided the sockets match. The open reply
/// is awaited under a watchdog whose expiry restarts the wait without resending the request.
/// Records received while the interface is disabled are discarded.
#[derive(Debug, Clone)]
pub struct Connect {
    state: State,
    watchdog: Watchdog,
    last_opened: Option<(SockAddr, SessionId)>,
}

impl Connect {
    /// Creates a new connect process.
    pub fn new(watchdog: u32) -> Self {
        Self { state: State::Idle, watchdog: Watchdog::new(watchdog), last_opened: None }
    }

    /// Socket and session of the connection opened last.
    pub fn last_opened(&self) -> Option<(SockAddr, SessionId)> { self.last_opened }

    /// Runs one cycle.
    pub fn tick(&mut self, ctx: &mut Ctx<'_>, i: I<'_>, o: O<'_>) -> Result<(), Error> {
        match self.state {
            State::Idle => {
                if ctx.enable {
                    self.state = State::ReadRequest;
                    return Ok(());
                }
                if !i.opn_rep.is_empty() && !o.cls_req.is_full() {
                    let rep = i.opn_rep.read()?;
                    ctx.warn(NAME, ShellError::UnexpectedOpenReply { sess_id: rep.sess_id });
                    o.cls_req.write(rep.sess_id)?;
                }
                if !i.sock_len.is_empty() {
                    let record = i.sock_len.read()?;
                    warn!(target: NAME, "disabled: ignoring request for {} ({} bytes)", record.sock, record.len);
                }
            }
            State::ReadRequest => {
                if !ctx.enable {
                    self.state = State::Idle;
                    return Ok(());
                }
                if i.sock_len.is_empty() {
                    return Ok(());
                }
                let record = i.sock_len.read()?;
                if record.len == 0 {
                    self.state = State::OpenRequest(record.sock);
                    return Ok(());
                }
                match self.last_opened {
                    Some((sock, sess_id)) if sock == record.sock => {
                        self.state = State::WriteTrigger(TcpAppSndReq { sess_id, length: record.len });
                    }
                    Some((opened, _)) => {
                        ctx.error(NAME, ShellError::SocketMismatch { requested: record.sock, opened });
                    }
                    None => ctx.error(NAME, ShellError::NoOpenConnection { requested: record.sock }),
                }
            }
            State::OpenRequest(sock) => {
                if o.opn_req.is_full() {
                    return Ok(());
                }
                o.opn_req.write(sock)?;
                info!(target: NAME, "requesting to connect to {}", sock);
                self.watchdog.arm();
                self.state = State::OpenReply(sock);
            }
            State::OpenReply(sock) => {
                let expired = self.watchdog.tick();
                if !i.opn_rep.is_empty() {
                    let rep = i.opn_rep.read()?;
                    if rep.tcp_state == TcpState::Established {
                        info!(target: NAME, "connected to {} with session {}", sock, rep.sess_id);
                        self.last_opened = Some((sock, rep.sess_id));
                        ctx.stats.incr_connections_opened();
                    } else {
                        ctx.error(NAME, ShellError::OpenFailed { sock, state: rep.tcp_state });
                    }
                    self.state = State::ReadRequest;
                } else if expired {
                    ctx.error(NAME, ShellError::OpenTimeout { sock });
                    self.watchdog.arm();
                }
            }
            State::WriteTrigger(req) => {
                if o.test_req.is_full() {
                    warn!(target: NAME, "cannot trigger the write path because the stream is full");
                    return Ok(());
                }
                o.test_req.write(req)?;
                info!(target: NAME, "triggering the transmission of {} bytes on session {}", req.length, req.sess_id);
                ctx.stats.incr_write_triggers();
                self.state = State::ReadRequest;
            }
        }

        Ok(())
    }
}
