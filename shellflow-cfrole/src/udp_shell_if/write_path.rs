//! Write path (WRp): from the UAF, or from the transmit test mode, to the UOE.

use log::{debug, warn};
use shellflow::{Error, Stream};
use shellflow_std::axis::AxisChunk;

use crate::pattern::TestPattern;
use crate::types::udp::*;
use crate::Ctx;

const NAME: &str = "USIF/WRp";

#[derive(Debug, Clone)]
enum State {
    Idle,
    Stream,
    Generate(TestPattern),
    Discard,
}

/// Ingress streams of the write path.
#[derive(Debug)]
pub struct I<'a> {
    /// Datagram metadata from the UAF.
    pub uaf_meta: &'a mut Stream<UdpAppMeta>,

    /// Datagram length from the UAF.
    pub uaf_dlen: &'a mut Stream<UdpAppDLen>,

    /// Datagram data from the UAF.
    pub uaf_data: &'a mut Stream<AxisChunk>,

    /// Transmit test requests from the read path.
    pub test_req: &'a mut Stream<UdpTestReq>,
}

/// Egress streams of the write path.
#[derive(Debug)]
pub struct O<'a> {
    /// Datagram metadata to the UOE.
    pub meta: &'a mut Stream<UdpAppMeta>,

    /// Datagram length to the UOE.
    pub dlen: &'a mut Stream<UdpAppDLen>,

    /// Datagram data to the UOE.
    pub data: &'a mut Stream<AxisChunk>,
}

/// Sends the datagrams of the UAF, or generated test datagrams, to the UOE.
///
/// Datagrams of the UAF are served first.
#[derive(Debug, Clone)]
pub struct WritePath {
    state: State,
}

impl Default for WritePath {
    fn default() -> Self { Self { state: State::Idle } }
}

impl WritePath {
    /// Creates a new write path.
    pub fn new() -> Self { Self::default() }

    /// Returns `true` if no datagram is in progress.
    pub fn is_idle(&self) -> bool { matches!(self.state, State::Idle) }

    /// Runs one cycle.
    pub fn tick(&mut self, ctx: &mut Ctx<'_>, i: I<'_>, o: O<'_>) -> Result<(), Error> {
        match &mut self.state {
            State::Idle => {
                let header_ready = !o.meta.is_full() && !o.dlen.is_full();
                if !i.uaf_meta.is_empty() && !i.uaf_dlen.is_empty() && (header_ready || !ctx.enable) {
                    let meta = i.uaf_meta.read()?;
                    let dlen = i.uaf_dlen.read()?;
                    if !ctx.enable {
                        warn!(target: NAME, "disabled: discarding datagram of {} bytes to {}", dlen, meta.dst);
                        self.state = State::Discard;
                        return Ok(());
                    }
                    debug!(target: NAME, "datagram of {} bytes from the UAF ({})", dlen, meta);
                    o.meta.write(meta)?;
                    o.dlen.write(dlen)?;
                    self.state = State::Stream;
                } else if !i.test_req.is_empty() && (header_ready || !ctx.enable) {
                    let req = i.test_req.read()?;
                    if !ctx.enable {
                        warn!(target: NAME, "disabled: ignoring test request of {} bytes", req.len);
                        return Ok(());
                    }
                    debug!(target: NAME, "test datagram of {} bytes ({})", req.len, req.meta);
                    o.meta.write(req.meta)?;
                    o.dlen.write(req.len)?;
                    self.state = State::Generate(TestPattern::new(usize::from(req.len)));
                }
            }
            State::Stream => {
                if i.uaf_data.is_empty() || o.data.is_full() {
                    return Ok(());
                }
                let chunk = i.uaf_data.read()?;
                o.data.write(chunk)?;
                ctx.stats.incr_app_chunks();
                if chunk.tlast {
                    self.state = State::Idle;
                }
            }
            State::Generate(pattern) => {
                if o.data.is_full() {
                    return Ok(());
                }
                match pattern.next() {
                    Some(chunk) => {
                        o.data.write(chunk)?;
                        ctx.stats.add_test_bytes(chunk.len() as u64);
                        if chunk.tlast {
                            self.state = State::Idle;
                        }
                    }
                    None => self.state = State::Idle,
                }
            }
            State::Discard => {
                if i.uaf_data.is_empty() {
                    return Ok(());
                }
                if i.uaf_data.read()?.tlast {
                    self.state = State::Idle;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shellflow::Monitor;
    use shellflow_std::axis::{chunks, payload};

    use super::*;
    use crate::types::{SockAddr, SocketPair};
    use crate::{ShellError, Stats};

    struct Harness {
        wrp: WritePath,
        uaf_meta: Stream<UdpAppMeta>,
        uaf_dlen: Stream<UdpAppDLen>,
        uaf_data: Stream<AxisChunk>,
        test_req: Stream<UdpTestReq>,
        meta: Stream<UdpAppMeta>,
        dlen: Stream<UdpAppDLen>,
        data: Stream<AxisChunk>,
        monitor: Monitor<ShellError>,
        stats: Stats,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                wrp: WritePath::new(),
                uaf_meta: Stream::new("uaf_meta", 4),
                uaf_dlen: Stream::new("uaf_dlen", 4),
                uaf_data: Stream::new("uaf_data", 64),
                test_req: Stream::new("test_req", 4),
                meta: Stream::new("meta", 4),
                dlen: Stream::new("dlen", 4),
                data: Stream::new("data", 64),
                monitor: Monitor::default(),
                stats: Stats::default(),
            }
        }

        fn run(&mut self, enable: bool, cycles: usize) {
            for _ in 0..cycles {
                let mut ctx = Ctx { enable, monitor: &mut self.monitor, stats: &mut self.stats };
                let i = I {
                    uaf_meta: &mut self.uaf_meta,
                    uaf_dlen: &mut self.uaf_dlen,
                    uaf_data: &mut self.uaf_data,
                    test_req: &mut self.test_req,
                };
                let o = O { meta: &mut self.meta, dlen: &mut self.dlen, data: &mut self.data };
                self.wrp.tick(&mut ctx, i, o).unwrap();
            }
        }
    }

    fn pair() -> SocketPair { SocketPair::new(SockAddr::new(0x0A0C_C801, 8801), SockAddr::new(0x0A0C_C832, 41000)) }

    #[test]
    fn test_datagram_is_generated() {
        let mut h = Harness::new();
        h.test_req.write(UdpTestReq { meta: pair(), len: 21 }).unwrap();
        h.run(true, 10);
        assert_eq!(h.meta.read(), Ok(pair()));
        assert_eq!(h.dlen.read(), Ok(21));
        let sent = h.data.drain().collect::<Vec<_>>();
        assert_eq!(payload(&sent), b"Hi from FMKU60!\nHi fr".to_vec());
        assert!(sent.last().unwrap().tlast);
        assert!(h.wrp.is_idle());
    }

    #[test]
    fn uaf_datagram_takes_priority() {
        let mut h = Harness::new();
        let bytes = (0..12).collect::<Vec<u8>>();
        h.test_req.write(UdpTestReq { meta: pair(), len: 8 }).unwrap();
        h.uaf_meta.write(pair().swapped()).unwrap();
        h.uaf_dlen.write(12).unwrap();
        for chunk in chunks(&bytes) {
            h.uaf_data.write(chunk).unwrap();
        }
        h.run(true, 10);
        assert_eq!(h.meta.drain().collect::<Vec<_>>(), vec![pair().swapped(), pair()]);
        assert_eq!(h.dlen.drain().collect::<Vec<_>>(), vec![12, 8]);
        let sent = h.data.drain().collect::<Vec<_>>();
        assert_eq!(payload(&sent[..2]), bytes);
        assert_eq!(payload(&sent[2..]), b"Hi from ".to_vec());
    }

    #[test]
    fn disabled_discards() {
        let mut h = Harness::new();
        h.uaf_meta.write(pair()).unwrap();
        h.uaf_dlen.write(9).unwrap();
        for chunk in chunks(&[0; 9]) {
            h.uaf_data.write(chunk).unwrap();
        }
        h.test_req.write(UdpTestReq { meta: pair(), len: 8 }).unwrap();
        h.run(false, 10);
        assert!(h.meta.is_empty() && h.data.is_empty());
        assert!(h.uaf_data.is_empty() && h.test_req.is_empty());
    }
}
