//! Read path (RDp): from the input read buffer to the TAF.

use log::{debug, info, warn};
use shellflow::{Error, Stream};
use shellflow_std::axis::AxisChunk;

use crate::types::tcp::*;
use crate::types::SockLen;
use crate::{Ctx, ShellError};

const NAME: &str = "TSIF/RDp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    FwdMeta,
    FwdStream,
    SinkMeta,
    SinkStream,
    ExtractRecord,
}

/// Ingress streams of the read path.
#[derive(Debug)]
pub struct I<'a> {
    /// Forward commands from the scheduler.
    pub fwd_cmd: &'a mut Stream<ForwardCmd>,

    /// Metadata from the input read buffer.
    pub meta: &'a mut Stream<SessionId>,

    /// Data from the input read buffer.
    pub data: &'a mut Stream<AxisChunk>,
}

/// Egress streams of the read path.
#[derive(Debug)]
pub struct O<'a> {
    /// Metadata to the TAF.
    pub taf_meta: &'a mut Stream<SessionId>,

    /// Stream length to the TAF.
    pub taf_dlen: &'a mut Stream<u16>,

    /// Data to the TAF.
    pub taf_data: &'a mut Stream<AxisChunk>,

    /// Control records to connect.
    pub sock_len: &'a mut Stream<SockLen>,

    /// Dequeue signals to the occupancy tracker.
    pub deq: &'a mut Stream<()>,
}

/// Executes the forward commands of the scheduler on the streams of the input read buffer.
///
/// A kept stream is forwarded to the TAF. A dropped stream is discarded, after extracting the
/// control record of its first chunk if requested. While the interface is disabled every stream is
/// discarded. The bytes of each stream are tallied against the length of its forward command.
#[derive(Debug, Clone)]
pub struct ReadPath {
    state: State,
    cmd: Option<ForwardCmd>,
    tally: usize,
}

impl Default for ReadPath {
    fn default() -> Self { Self { state: State::Idle, cmd: None, tally: 0 } }
}

impl ReadPath {
    /// Creates a new read path.
    pub fn new() -> Self { Self::default() }

    /// Runs one cycle.
    pub fn tick(&mut self, ctx: &mut Ctx<'_>, i: I<'_>, o: O<'_>) -> Result<(), Error> {
        match self.state {
            State::Idle => {
                if i.fwd_cmd.is_empty() {
                    return Ok(());
                }
                let mut cmd = i.fwd_cmd.read()?;
                if !ctx.enable && (cmd.action, cmd.drop_code) != (Action::Drop, DropCode::Nop) {
                    // Neither forward nor act on control records while disabled.
                    warn!(target: NAME, "disabled: discarding {} bytes of session {}", cmd.length, cmd.sess_id);
                    cmd.action = Action::Drop;
                    cmd.drop_code = DropCode::Nop;
                }
                self.state = match cmd.action {
                    Action::Keep => State::FwdMeta,
                    Action::Drop => State::SinkMeta,
                };
                self.cmd = Some(cmd);
                self.tally = 0;
            }
            State::FwdMeta => {
                if i.meta.is_empty() || o.taf_meta.is_full() || o.taf_dlen.is_full() {
                    return Ok(());
                }
                let cmd = self.cmd()?;
                let sess_id = i.meta.read()?;
                if sess_id != cmd.sess_id {
                    ctx.error(NAME, ShellError::SessionMismatch { expected: cmd.sess_id, actual: sess_id });
                    self.state = State::SinkStream;
                    return Ok(());
                }
                o.taf_meta.write(sess_id)?;
                o.taf_dlen.write(cmd.length)?;
                debug!(target: NAME, "forwarding {} bytes of session {}", cmd.length, sess_id);
                self.state = State::FwdStream;
            }
            State::FwdStream => {
                if i.data.is_empty() || o.taf_data.is_full() || o.deq.is_full() {
                    return Ok(());
                }
                let chunk = self.consume(i.data, o.deq)?;
                o.taf_data.write(chunk)?;
                ctx.stats.incr_forwarded_chunks();
                if chunk.tlast {
                    ctx.stats.incr_forwarded_streams();
                    self.end_of_stream(ctx)?;
                }
            }
            State::SinkMeta => {
                if i.meta.is_empty() {
                    return Ok(());
                }
                let cmd = self.cmd()?;
                let sess_id = i.meta.read()?;
                if sess_id != cmd.sess_id {
                    ctx.error(NAME, ShellError::SessionMismatch { expected: cmd.sess_id, actual: sess_id });
                    self.state = State::SinkStream;
                    return Ok(());
                }
                self.state = match cmd.drop_code {
                    DropCode::Nop => State::SinkStream,
                    DropCode::Gen => State::ExtractRecord,
                };
            }
            State::SinkStream => {
                if i.data.is_empty() || o.deq.is_full() {
                    return Ok(());
                }
                let chunk = self.consume(i.data, o.deq)?;
                ctx.stats.incr_dropped_chunks();
                if chunk.tlast {
                    self.end_of_stream(ctx)?;
                }
            }
            State::ExtractRecord => {
                if i.data.is_empty() || o.deq.is_full() || o.sock_len.is_full() {
                    return Ok(());
                }
                let chunk = self.consume(i.data, o.deq)?;
                ctx.stats.incr_dropped_chunks();
                match SockLen::from_chunk(&chunk) {
                    Some(record) => {
                        info!(target: NAME, "transmit request for {} ({} bytes)", record.sock, record.len);
                        o.sock_len.write(record)?;
                        ctx.stats.incr_control_records();
                    }
                    None => ctx.error(NAME, ShellError::MalformedRecord { bytes: chunk.len() }),
                }
                if chunk.tlast {
                    self.end_of_stream(ctx)?;
                } else {
                    self.state = State::SinkStream;
                }
            }
        }

        Ok(())
    }

    fn cmd(&self) -> Result<ForwardCmd, Error> { self.cmd.ok_or(Error::StreamEmpty { stream: "fwd_cmd" }) }

    /// Pops one chunk out of the input read buffer.
    fn consume(&mut self, data: &mut Stream<AxisChunk>, deq: &mut Stream<()>) -> Result<AxisChunk, Error> {
        let chunk = data.read()?;
        deq.write(())?;
        self.tally += chunk.len();
        Ok(chunk)
    }

    fn end_of_stream(&mut self, ctx: &mut Ctx<'_>) -> Result<(), Error> {
        let cmd = self.cmd()?;
        if self.tally != usize::from(cmd.length) {
            ctx.error(NAME, ShellError::StreamLengthMismatch {
                sess_id: cmd.sess_id,
                expected: cmd.length,
                actual: self.tally,
            });
        }
        self.cmd = None;
        self.state = State::Idle;
        Ok(())
    }
}
