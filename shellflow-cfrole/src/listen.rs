//! Listen (LSn): opens the listen ports at startup.

use arrayvec::ArrayVec;
use log::{info, warn};
use shellflow::{Error, Stream};
use shellflow_std::Watchdog;

use crate::constants::ports::LSN_PORTS_MAX;
use crate::{Ctx, ShellError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    SendReq,
    WaitRep,
    Done,
}

/// Requests the offload engine to listen on each port of a table, one at a time.
///
/// Only a positive reply advances to the next port: a denial or a watchdog expiry resends the
/// request for the same port. Once every port is open the process stays done, even across a
/// disable/enable cycle.
#[derive(Debug, Clone)]
pub struct Listen {
    origin: &'static str,
    ports: ArrayVec<u16, LSN_PORTS_MAX>,
    index: usize,
    state: State,
    watchdog: Watchdog,
}

impl Listen {
    /// Creates a new listen process. `origin` names it in traces.
    pub fn new(origin: &'static str, ports: ArrayVec<u16, LSN_PORTS_MAX>, watchdog: u32) -> Self {
        Self { origin, ports, index: 0, state: State::Idle, watchdog: Watchdog::new(watchdog) }
    }

    /// Returns `true` once every port is open.
    pub fn is_done(&self) -> bool { self.state == State::Done }

    /// Number of ports confirmed so far.
    pub fn opened(&self) -> usize { self.index }

    /// Runs one cycle.
    pub fn tick(
        &mut self, ctx: &mut Ctx<'_>, lsn_req: &mut Stream<u16>, lsn_rep: &mut Stream<bool>,
    ) -> Result<(), Error> {
        match self.state {
            State::Idle => {
                if !ctx.enable {
                    return Ok(());
                }
                self.state = if self.index < self.ports.len() { State::SendReq } else { State::Done };
            }
            State::SendReq => {
                let port = self.ports[self.index];
                if lsn_req.is_full() {
                    warn!(target: self.origin, "cannot request to listen on port {} because the stream is full", port);
                    return Ok(());
                }
                lsn_req.write(port)?;
                info!(target: self.origin, "requesting to listen on port #{} (0x{:04X})", port, port);
                self.watchdog.arm();
                self.state = State::WaitRep;
            }
            State::WaitRep => {
                let expired = self.watchdog.tick();
                let port = self.ports[self.index];
                if !lsn_rep.is_empty() {
                    if lsn_rep.read()? {
                        info!(target: self.origin, "listening on port {}", port);
                        ctx.stats.incr_listened_ports();
                        self.index += 1;
                        self.state = if self.index < self.ports.len() { State::SendReq } else { State::Done };
                    } else {
                        ctx.warn(self.origin, ShellError::ListenDenied { port });
                        ctx.stats.incr_listen_retries();
                        self.state = State::SendReq;
                    }
                } else if expired {
                    ctx.error(self.origin, ShellError::ListenTimeout { port });
                    ctx.stats.incr_listen_retries();
                    self.state = State::SendReq;
                }
            }
            State::Done => {}
        }

        Ok(())
    }
}
