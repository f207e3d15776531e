//! Write path (WRp): from the TAF, or from the transmit test mode, to the TOE.

use log::{debug, info, warn};
use shellflow::{Error, Stream};
use shellflow_std::axis::AxisChunk;

use crate::pattern::TestPattern;
use crate::types::tcp::*;
use crate::{Ctx, ShellError};

const NAME: &str = "TSIF/WRp";

/// Origin of a send request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// The TAF sends its own data.
    App,
    /// Connect asked for a test payload.
    Test,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    RequestToSend,
    AwaitReply,
    StreamAppData,
    GenerateTestPayload(TestPattern),
    DrainAndDiscard,
}

/// Ingress streams of the write path.
#[derive(Debug)]
pub struct I<'a> {
    /// Send requests from the TAF.
    pub taf_snd_req: &'a mut Stream<TcpAppSndReq>,

    /// Data from the TAF.
    pub taf_data: &'a mut Stream<AxisChunk>,

    /// Transmit test requests from connect.
    pub test_req: &'a mut Stream<TcpAppSndReq>,

    /// Send replies from the TOE.
    pub snd_rep: &'a mut Stream<TcpAppSndRep>,
}

/// Egress streams of the write path.
#[derive(Debug)]
pub struct O<'a> {
    /// Send requests to the TOE.
    pub snd_req: &'a mut Stream<TcpAppSndReq>,

    /// Data to the TOE.
    pub data: &'a mut Stream<AxisChunk>,
}

/// Asks the TOE for transmit space, then sends the data of the TAF or a generated test payload.
///
/// A `NO_SPACE` reply repeats the request until the retry budget is spent. When a transfer is
/// abandoned, the pending data of the TAF is drained so that the next request starts on a stream
/// boundary. Requests of the TAF are served before test requests.
#[derive(Debug, Clone)]
pub struct WritePath {
    state: State,
    mode: Mode,
    req: TcpAppSndReq,
    retries: u32,
    budget: u32,
}

impl WritePath {
    /// Creates a new write path which issues at most `budget` send requests per transfer.
    ///
    /// At least one request is always issued.
    pub fn new(budget: u32) -> Self {
        let budget = budget.max(1);
        Self { state: State::Idle, mode: Mode::App, req: TcpAppSndReq::default(), retries: budget, budget }
    }

    /// Returns `true` if no transfer is in progress.
    pub fn is_idle(&self) -> bool { matches!(self.state, State::Idle) }

    /// Runs one cycle.
    pub fn tick(&mut self, ctx: &mut Ctx<'_>, i: I<'_>, o: O<'_>) -> Result<(), Error> {
        match &mut self.state {
            State::Idle => {
                if !i.taf_snd_req.is_empty() {
                    self.req = i.taf_snd_req.read()?;
                    self.mode = Mode::App;
                    if !ctx.enable {
                        warn!(
                            target: NAME,
                            "disabled: discarding {} bytes of session {}",
                            self.req.length,
                            self.req.sess_id
                        );
                        self.state = State::DrainAndDiscard;
                        return Ok(());
                    }
                } else if !i.test_req.is_empty() {
                    self.req = i.test_req.read()?;
                    self.mode = Mode::Test;
                    if !ctx.enable {
                        warn!(target: NAME, "disabled: ignoring test request of session {}", self.req.sess_id);
                        return Ok(());
                    }
                } else {
                    return Ok(());
                }
                debug!(
                    target: NAME,
                    "{:?} request of {} bytes on session {}",
                    self.mode,
                    self.req.length,
                    self.req.sess_id
                );
                self.retries = self.budget;
                self.state = State::RequestToSend;
            }
            State::RequestToSend => {
                if o.snd_req.is_full() {
                    return Ok(());
                }
                o.snd_req.write(self.req)?;
                ctx.stats.incr_send_requests();
                self.state = State::AwaitReply;
            }
            State::AwaitReply => {
                if i.snd_rep.is_empty() {
                    return Ok(());
                }
                let rep = i.snd_rep.read()?;
                match TcpAppSndErr::try_from(rep.error) {
                    Ok(TcpAppSndErr::NoError) => {
                        self.state = match self.mode {
                            Mode::App => State::StreamAppData,
                            Mode::Test => State::GenerateTestPayload(TestPattern::new(usize::from(self.req.length))),
                        };
                    }
                    Ok(TcpAppSndErr::NoSpace) => {
                        self.retries -= 1;
                        if self.retries == 0 {
                            let (sess_id, attempts) = (self.req.sess_id, self.budget);
                            self.abandon(ctx, ShellError::SendRetriesExhausted { sess_id, attempts });
                        } else {
                            debug!(target: NAME, "session {}: {} bytes left, retrying", rep.sess_id, rep.space_left);
                            ctx.stats.incr_send_retries();
                            self.state = State::RequestToSend;
                        }
                    }
                    Ok(TcpAppSndErr::NoConnection) => {
                        let sess_id = self.req.sess_id;
                        self.abandon(ctx, ShellError::NoConnection { sess_id });
                    }
                    Err(code) => self.abandon(ctx, ShellError::UnknownSendReply { sess_id: rep.sess_id, code }),
                }
            }
            State::StreamAppData => {
                if i.taf_data.is_empty() || o.data.is_full() {
                    return Ok(());
                }
                let chunk = i.taf_data.read()?;
                o.data.write(chunk)?;
                ctx.stats.incr_app_chunks();
                if chunk.tlast {
                    self.state = State::Idle;
                }
            }
            State::GenerateTestPayload(pattern) => {
                if o.data.is_full() {
                    return Ok(());
                }
                match pattern.next() {
                    Some(chunk) => {
                        o.data.write(chunk)?;
                        ctx.stats.add_test_bytes(chunk.len() as u64);
                        if chunk.tlast {
                            info!(target: NAME, "sent {} test bytes on session {}", self.req.length, self.req.sess_id);
                            self.state = State::Idle;
                        }
                    }
                    None => self.state = State::Idle,
                }
            }
            State::DrainAndDiscard => {
                if i.taf_data.is_empty() {
                    return Ok(());
                }
                if i.taf_data.read()?.tlast {
                    self.state = State::Idle;
                }
            }
        }

        Ok(())
    }

    fn abandon(&mut self, ctx: &mut Ctx<'_>, error: ShellError) {
        ctx.warn(NAME, error);
        ctx.stats.incr_abandoned_sends();
        self.state = match self.mode {
            Mode::App => State::DrainAndDiscard,
            Mode::Test => State::Idle,
        };
    }
}

#[cfg(test)]
mod tests {
    use shellflow::Monitor;
    use shellflow_std::axis::{chunks, payload};

    use super::*;
    use crate::Stats;

    struct Harness {
        wrp: WritePath,
        taf_snd_req: Stream<TcpAppSndReq>,
        taf_data: Stream<AxisChunk>,
        test_req: Stream<TcpAppSndReq>,
        snd_rep: Stream<TcpAppSndRep>,
        snd_req: Stream<TcpAppSndReq>,
        data: Stream<AxisChunk>,
        monitor: Monitor<ShellError>,
        stats: Stats,
    }

    impl Harness {
        fn new(budget: u32) -> Self {
            Self {
                wrp: WritePath::new(budget),
                taf_snd_req: Stream::new("taf_snd_req", 4),
                taf_data: Stream::new("taf_data", 64),
                test_req: Stream::new("test_req", 4),
                snd_rep: Stream::new("snd_rep", 4),
                snd_req: Stream::new("snd_req", 4),
                data: Stream::new("data", 64),
                monitor: Monitor::default(),
                stats: Stats::default(),
            }
        }

        fn tick(&mut self, enable: bool) {
            let mut ctx = Ctx { enable, monitor: &mut self.monitor, stats: &mut self.stats };
            let i = I {
                taf_snd_req: &mut self.taf_snd_req,
                taf_data: &mut self.taf_data,
                test_req: &mut self.test_req,
                snd_rep: &mut self.snd_rep,
            };
            let o = O { snd_req: &mut self.snd_req, data: &mut self.data };
            self.wrp.tick(&mut ctx, i, o).unwrap();
        }

        /// Answers every send request with `error` until the write path is idle.
        fn serve(&mut self, error: u8, cycles: usize) -> usize {
            let mut requests = 0;
            for _ in 0..cycles {
                self.tick(true);
                if let Some(req) = self.snd_req.try_read() {
                    requests += 1;
                    let rep = TcpAppSndRep { sess_id: req.sess_id, length: req.length, space_left: 0, error };
                    self.snd_rep.write(rep).unwrap();
                }
            }
            requests
        }
    }

    #[test]
    fn test_payload_after_no_error() {
        let mut h = Harness::new(512);
        h.test_req.write(TcpAppSndReq { sess_id: 42, length: 100 }).unwrap();
        assert_eq!(h.serve(0, 40), 1);
        let sent = h.data.drain().collect::<Vec<_>>();
        assert_eq!(sent.len(), 13);
        assert_eq!(payload(&sent).len(), 100);
        assert_eq!(sent.iter().filter(|c| c.tlast).count(), 1);
        assert!(sent[12].tlast);
        assert_eq!(h.stats.test_bytes, 100);
        assert!(h.wrp.is_idle());
    }

    #[test]
    fn no_space_until_budget_is_spent() {
        let mut h = Harness::new(512);
        h.test_req.write(TcpAppSndReq { sess_id: 42, length: 100 }).unwrap();
        assert_eq!(h.serve(1, 2000), 512);
        assert!(h.data.is_empty());
        assert!(h.wrp.is_idle());
        assert_eq!(h.stats.abandoned_sends, 1);
        assert_eq!(h.stats.send_retries, 511);
        let fault = h.monitor.take_faults().pop().unwrap();
        assert_eq!(fault.error, ShellError::SendRetriesExhausted { sess_id: 42, attempts: 512 });
    }

    #[test]
    fn app_data_is_streamed() {
        let mut h = Harness::new(512);
        let bytes = (0..30).collect::<Vec<u8>>();
        h.taf_snd_req.write(TcpAppSndReq { sess_id: 1, length: 30 }).unwrap();
        for chunk in chunks(&bytes) {
            h.taf_data.write(chunk).unwrap();
        }
        h.serve(0, 20);
        assert_eq!(payload(&h.data.drain().collect::<Vec<_>>()), bytes);
    }

    #[test]
    fn no_connection_drains_app_data() {
        let mut h = Harness::new(512);
        h.taf_snd_req.write(TcpAppSndReq { sess_id: 1, length: 30 }).unwrap();
        for chunk in chunks(&[0; 30]) {
            h.taf_data.write(chunk).unwrap();
        }
        assert_eq!(h.serve(2, 20), 1);
        assert!(h.data.is_empty());
        assert!(h.taf_data.is_empty());
        assert!(h.wrp.is_idle());
        assert_eq!(h.monitor.count(NAME), 1);
    }

    #[test]
    fn unknown_reply_code_abandons() {
        let mut h = Harness::new(512);
        h.test_req.write(TcpAppSndReq { sess_id: 4, length: 8 }).unwrap();
        assert_eq!(h.serve(9, 20), 1);
        assert!(h.data.is_empty());
        assert_eq!(h.monitor.take_faults()[0].error, ShellError::UnknownSendReply { sess_id: 4, code: 9 });
    }

    #[test]
    fn unknown_reply_code_drains_app_data() {
        let mut h = Harness::new(512);
        h.taf_snd_req.write(TcpAppSndReq { sess_id: 3, length: 20 }).unwrap();
        for chunk in chunks(&[7; 20]) {
            h.taf_data.write(chunk).unwrap();
        }
        h.taf_snd_req.write(TcpAppSndReq { sess_id: 5, length: 8 }).unwrap();
        h.taf_data.write(AxisChunk::from_bytes(b"abcdefgh", true)).unwrap();
        assert_eq!(h.serve(9, 5), 1);
        // The next request starts on the boundary of its own stream.
        assert_eq!(h.serve(0, 20), 1);
        assert_eq!(payload(&h.data.drain().collect::<Vec<_>>()), b"abcdefgh".to_vec());
        assert!(h.taf_data.is_empty());
        assert!(h.wrp.is_idle());
        assert_eq!(h.stats.abandoned_sends, 1);
        assert_eq!(h.monitor.take_faults()[0].error, ShellError::UnknownSendReply { sess_id: 3, code: 9 });
    }

    #[test]
    fn zero_budget_still_sends_once() {
        let mut h = Harness::new(0);
        h.test_req.write(TcpAppSndReq { sess_id: 42, length: 8 }).unwrap();
        assert_eq!(h.serve(1, 50), 1);
        assert!(h.wrp.is_idle());
        assert_eq!(h.stats.send_retries, 0);
        let fault = h.monitor.take_faults().pop().unwrap();
        assert_eq!(fault.error, ShellError::SendRetriesExhausted { sess_id: 42, attempts: 1 });
    }

    #[test]
    fn app_requests_come_first() {
        let mut h = Harness::new(512);
        h.test_req.write(TcpAppSndReq { sess_id: 2, length: 8 }).unwrap();
        h.taf_snd_req.write(TcpAppSndReq { sess_id: 1, length: 8 }).unwrap();
        h.taf_data.write(AxisChunk::from_bytes(b"abcdefgh", true)).unwrap();
        h.tick(true);
        h.tick(true);
        assert_eq!(h.snd_req.read().map(|req| req.sess_id), Ok(1));
    }

    #[test]
    fn disabled_discards_requests() {
        let mut h = Harness::new(512);
        h.taf_snd_req.write(TcpAppSndReq { sess_id: 1, length: 16 }).unwrap();
        for chunk in chunks(&[0; 16]) {
            h.taf_data.write(chunk).unwrap();
        }
        h.test_req.write(TcpAppSndReq { sess_id: 2, length: 8 }).unwrap();
        for _ in 0..10 {
            h.tick(false);
        }
        assert!(h.snd_req.is_empty());
        assert!(h.taf_data.is_empty() && h.taf_snd_req.is_empty() && h.test_req.is_empty());
        assert!(h.wrp.is_idle());
    }
}
