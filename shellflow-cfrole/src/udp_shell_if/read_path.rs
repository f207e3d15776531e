//! Read path (RDp): from the UOE to the UAF.

use log::{debug, info};
use shellflow::{Error, Stream};
use shellflow_std::axis::AxisChunk;

use crate::routing::RoutingTable;
use crate::types::tcp::{Action, DropCode};
use crate::types::udp::*;
use crate::{Ctx, ShellError};

const NAME: &str = "USIF/RDp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadMeta,
    FwdMeta(UdpAppMeta),
    Stream { keep: bool },
    ExtractLength(UdpAppMeta),
}

/// Ingress streams of the read path.
#[derive(Debug)]
pub struct I<'a> {
    /// Datagram metadata from the UOE.
    pub meta: &'a mut Stream<UdpAppMeta>,

    /// Datagram data from the UOE.
    pub data: &'a mut Stream<AxisChunk>,
}

/// Egress streams of the read path.
#[derive(Debug)]
pub struct O<'a> {
    /// Datagram metadata to the UAF.
    pub uaf_meta: &'a mut Stream<UdpAppMeta>,

    /// Datagram data to the UAF.
    pub uaf_data: &'a mut Stream<AxisChunk>,

    /// Transmit test requests to the write path.
    pub test_req: &'a mut Stream<UdpTestReq>,
}

/// Dispatches received datagrams by destination port.
///
/// Forwarded datagrams go to the UAF. Dumped datagrams are discarded. A transmit-test datagram
/// carries the length of the datagram to send back in its first 16-bit word. While the interface
/// is disabled every datagram is discarded.
#[derive(Debug, Clone)]
pub struct ReadPath {
    state: State,
    routes: RoutingTable,
}

impl ReadPath {
    /// Creates a new read path.
    pub fn new(routes: RoutingTable) -> Self { Self { state: State::ReadMeta, routes } }

    /// Runs one cycle.
    pub fn tick(&mut self, ctx: &mut Ctx<'_>, i: I<'_>, o: O<'_>) -> Result<(), Error> {
        match self.state {
            State::ReadMeta => {
                if i.meta.is_empty() {
                    return Ok(());
                }
                let meta = i.meta.read()?;
                let route = self.routes.lookup(meta.dst.port);
                self.state = match (route.action, route.drop_code) {
                    _ if !ctx.enable => {
                        debug!(target: NAME, "disabled: discarding datagram {}", meta);
                        State::Stream { keep: false }
                    }
                    (Action::Keep, _) => State::FwdMeta(meta),
                    (Action::Drop, DropCode::Nop) => {
                        debug!(target: NAME, "receive test mode (port {})", meta.dst.port);
                        State::Stream { keep: false }
                    }
                    (Action::Drop, DropCode::Gen) => {
                        debug!(target: NAME, "transmit test mode (port {})", meta.dst.port);
                        State::ExtractLength(meta)
                    }
                };
            }
            State::FwdMeta(meta) => {
                if o.uaf_meta.is_full() {
                    return Ok(());
                }
                o.uaf_meta.write(meta)?;
                ctx.stats.incr_forwarded_streams();
                self.state = State::Stream { keep: true };
            }
            State::Stream { keep } => {
                if i.data.is_empty() || (keep && o.uaf_data.is_full()) {
                    return Ok(());
                }
                let chunk = i.data.read()?;
                if keep {
                    o.uaf_data.write(chunk)?;
                    ctx.stats.incr_forwarded_chunks();
                } else {
                    ctx.stats.incr_dropped_chunks();
                }
                if chunk.tlast {
                    self.state = State::ReadMeta;
                }
            }
            State::ExtractLength(meta) => {
                if i.data.is_empty() || o.test_req.is_full() {
                    return Ok(());
                }
                let chunk = i.data.read()?;
                ctx.stats.incr_dropped_chunks();
                if chunk.len() < 2 {
                    ctx.error(NAME, ShellError::MalformedRecord { bytes: chunk.len() });
                } else {
                    let len = u16::from_be_bytes([chunk.tdata[0], chunk.tdata[1]]);
                    if len == 0 {
                        ctx.warn(NAME, ShellError::ZeroLengthTestRequest { requester: meta.src });
                    } else {
                        info!(target: NAME, "transmit request of {} bytes from {}", len, meta.src);
                        o.test_req.write(UdpTestReq { meta: meta.swapped(), len })?;
                        ctx.stats.incr_control_records();
                    }
                }
                self.state = if chunk.tlast { State::ReadMeta } else { State::Stream { keep: false } };
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
    use crate::constants::ports::*;
    use crate::types::{SockAddr, SocketPair};
    use crate::Stats;

    const HOST: SockAddr = SockAddr { addr: 0x0A0C_C832, port: 41000 };
    const FPGA: u32 = 0x0A0C_C801;

    struct Harness {
        rdp: ReadPath,
        meta: Stream<UdpAppMeta>,
        data: Stream<AxisChunk>,
        uaf_meta: Stream<UdpAppMeta>,
        uaf_data: Stream<AxisChunk>,
        test_req: Stream<UdpTestReq>,
        monitor: Monitor<ShellError>,
        stats: Stats,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rdp: ReadPath::new(RoutingTable::default()),
                meta: Stream::new("meta", 8),
                data: Stream::new("data", 64),
                uaf_meta: Stream::new("uaf_meta", 8),
                uaf_data: Stream::new("uaf_data", 64),
                test_req: Stream::new("test_req", 8),
                monitor: Monitor::default(),
                stats: Stats::default(),
            }
        }

        fn push(&mut self, port: u16, bytes: &[u8]) -> SocketPair {
            let meta = SocketPair::new(HOST, SockAddr::new(FPGA, port));
            self.meta.write(meta).unwrap();
            for chunk in chunks(bytes) {
                self.data.write(chunk).unwrap();
            }
            meta
        }

        fn run(&mut self, enable: bool, cycles: usize) {
            for _ in 0..cycles {
                let mut ctx = Ctx { enable, monitor: &mut self.monitor, stats: &mut self.stats };
                let i = I { meta: &mut self.meta, data: &mut self.data };
                let o = O { uaf_meta: &mut self.uaf_meta, uaf_data: &mut self.uaf_data, test_req: &mut self.test_req };
                self.rdp.tick(&mut ctx, i, o).unwrap();
            }
        }
    }

    #[test]
    fn datagram_is_forwarded() {
        let mut h = Harness::new();
        let bytes = (0..19).collect::<Vec<u8>>();
        let meta = h.push(ECHO_MODE_LSN_PORT, &bytes);
        h.run(true, 10);
        assert_eq!(h.uaf_meta.read(), Ok(meta));
        assert_eq!(payload(&h.uaf_data.drain().collect::<Vec<_>>()), bytes);
    }

    #[test]
    fn receive_test_mode_dumps() {
        let mut h = Harness::new();
        let _ = h.push(RECV_MODE_LSN_PORT, &[1; 50]);
        h.run(true, 20);
        assert!(h.uaf_meta.is_empty() && h.uaf_data.is_empty());
        assert!(h.data.is_empty());
        assert_eq!(h.stats.dropped_chunks, 7);
    }

    #[test]
    fn transmit_request_is_extracted_with_swapped_sockets() {
        let mut h = Harness::new();
        let meta = h.push(XMIT_MODE_LSN_PORT, &[0x01, 0x2C, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        h.run(true, 10);
        assert_eq!(h.test_req.read(), Ok(UdpTestReq { meta: meta.swapped(), len: 300 }));
        assert!(h.data.is_empty());
        assert!(h.uaf_data.is_empty());
    }

    #[test]
    fn malformed_transmit_requests_are_reported() {
        let mut h = Harness::new();
        let _ = h.push(XMIT_MODE_LSN_PORT, &[0x01]);
        let _ = h.push(XMIT_MODE_LSN_PORT, &[0x00, 0x00]);
        h.run(true, 10);
        assert!(h.test_req.is_empty());
        let faults = h.monitor.take_faults();
        assert_eq!(faults[0].error, ShellError::MalformedRecord { bytes: 1 });
        assert_eq!(faults[1].error, ShellError::ZeroLengthTestRequest { requester: HOST });
    }

    #[test]
    fn disabled_interface_discards() {
        let mut h = Harness::new();
        let _ = h.push(ECHO_MODE_LSN_PORT, &[1; 16]);
        let _ = h.push(XMIT_MODE_LSN_PORT, &[0, 8]);
        h.run(false, 10);
        assert!(h.uaf_meta.is_empty() && h.test_req.is_empty());
        assert!(h.data.is_empty() && h.meta.is_empty());
    }
}
