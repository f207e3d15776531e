//! Close (CLs): closes a port at startup.

use log::{info, warn};
use shellflow::{Error, Stream};

use crate::{Ctx, ShellError};

const NAME: &str = "USIF/CLs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    SendReq,
    WaitRep,
    Done,
}

/// Requests the UOE to close a port, repeating the request until the port is reported closed.
///
/// While the interface is disabled, stray close replies are drained.
#[derive(Debug, Clone)]
pub struct Close {
    port: u16,
    state: State,
}

impl Close {
    /// Creates a process closing `port`.
    pub fn new(port: u16) -> Self { Self { port, state: State::Idle } }

    /// Returns `true` once the port is closed.
    pub fn is_done(&self) -> bool { self.state == State::Done }

    /// Runs one cycle.
    pub fn tick(
        &mut self, ctx: &mut Ctx<'_>, cls_req: &mut Stream<u16>, cls_rep: &mut Stream<bool>,
    ) -> Result<(), Error> {
        match self.state {
            State::Idle => {
                if ctx.enable {
                    self.state = State::SendReq;
                } else if !cls_rep.is_empty() {
                    let _ = cls_rep.read()?;
                    ctx.warn(NAME, ShellError::UnexpectedCloseReply);
                }
            }
            State::SendReq => {
                if cls_req.is_full() {
                    warn!(target: NAME, "cannot request to close port {} because the stream is full", self.port);
                    return Ok(());
                }
                cls_req.write(self.port)?;
                info!(target: NAME, "requesting to close port #{} (0x{:04X})", self.port, self.port);
                self.state = State::WaitRep;
            }
            State::WaitRep => {
                if cls_rep.is_empty() {
                    return Ok(());
                }
                if cls_rep.read()? {
                    ctx.warn(NAME, ShellError::CloseDenied { port: self.port });
                    self.state = State::SendReq;
                } else {
                    info!(target: NAME, "port {} is closed", self.port);
                    ctx.stats.incr_closed_ports();
                    self.state = State::Done;
                }
            }
            State::Done => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shellflow::Monitor;

    use super::*;
    use crate::Stats;

    #[test]
    fn resend_until_closed() {
        let mut close = Close::new(0xDEAD);
        let mut req = Stream::new("req", 4);
        let mut rep = Stream::new("rep", 4);
        let mut monitor = Monitor::default();
        let mut stats = Stats::default();
        let mut tick = |close: &mut Close, req: &mut Stream<u16>, rep: &mut Stream<bool>, enable: bool| {
            let mut ctx = Ctx { enable, monitor: &mut monitor, stats: &mut stats };
            close.tick(&mut ctx, req, rep).unwrap();
        };

        rep.write(true).unwrap();
        tick(&mut close, &mut req, &mut rep, false);
        assert!(rep.is_empty());

        tick(&mut close, &mut req, &mut rep, true);
        tick(&mut close, &mut req, &mut rep, true);
        assert_eq!(req.read(), Ok(0xDEAD));
        rep.write(true).unwrap();
        tick(&mut close, &mut req, &mut rep, true);
        tick(&mut close, &mut req, &mut rep, true);
        assert_eq!(req.read(), Ok(0xDEAD));
        rep.write(false).unwrap();
        tick(&mut close, &mut req, &mut rep, true);
        assert!(close.is_done());

        drop(tick);
        assert_eq!(monitor.count(NAME), 2);
        assert_eq!(stats.closed_ports, 1);
    }
}
