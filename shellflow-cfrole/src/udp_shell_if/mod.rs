//! UDP shell interface (USIF).
//!
//! Opens the listen ports, closes the configured port, dispatches the received datagrams and sends
//! the datagrams of the UAF or of the transmit test mode.

mod close;
mod read_path;
mod write_path;

pub use close::Close;
pub use read_path::ReadPath;
pub use write_path::WritePath;

use shellflow::{Error, Monitor, Stream};
use shellflow_std::axis::AxisChunk;

use crate::types::udp::*;
use crate::{ConfigError, Ctx, Listen, ShellError, Stats, UdpConfig};

/// Ingress streams of the UDP shell interface.
#[derive(Debug)]
pub struct I {
    /// Listen replies from the UOE.
    pub shl_lsn_rep: Stream<bool>,

    /// Close replies from the UOE; `true` means the port is still open.
    pub shl_cls_rep: Stream<bool>,

    /// Received datagram data from the UOE.
    pub shl_data: Stream<AxisChunk>,

    /// Received datagram metadata from the UOE.
    pub shl_meta: Stream<UdpAppMeta>,

    /// Datagram data from the UAF.
    pub uaf_data: Stream<AxisChunk>,

    /// Datagram metadata from the UAF.
    pub uaf_meta: Stream<UdpAppMeta>,

    /// Datagram length from the UAF.
    pub uaf_dlen: Stream<UdpAppDLen>,
}

impl I {
    /// Creates the ingress streams.
    pub fn new(config: &UdpConfig) -> Self {
        let depth = config.stream_depth;
        Self {
            shl_lsn_rep: Stream::new("shl_lsn_rep", depth),
            shl_cls_rep: Stream::new("shl_cls_rep", depth),
            shl_data: Stream::new("shl_data", depth),
            shl_meta: Stream::new("shl_meta", depth),
            uaf_data: Stream::new("uaf_data", depth),
            uaf_meta: Stream::new("uaf_meta", depth),
            uaf_dlen: Stream::new("uaf_dlen", depth),
        }
    }
}

/// Egress streams of the UDP shell interface.
#[derive(Debug)]
pub struct O {
    /// Listen requests to the UOE.
    pub shl_lsn_req: Stream<u16>,

    /// Close requests to the UOE.
    pub shl_cls_req: Stream<u16>,

    /// Datagram data to the UOE.
    pub shl_data: Stream<AxisChunk>,

    /// Datagram metadata to the UOE.
    pub shl_meta: Stream<UdpAppMeta>,

    /// Datagram length to the UOE.
    pub shl_dlen: Stream<UdpAppDLen>,

    /// Datagram data to the UAF.
    pub uaf_data: Stream<AxisChunk>,

    /// Datagram metadata to the UAF.
    pub uaf_meta: Stream<UdpAppMeta>,
}

impl O {
    /// Creates the egress streams.
    pub fn new(config: &UdpConfig) -> Self {
        let depth = config.stream_depth;
        Self {
            shl_lsn_req: Stream::new("shl_lsn_req", depth),
            shl_cls_req: Stream::new("shl_cls_req", depth),
            shl_data: Stream::new("shl_data", depth),
            shl_meta: Stream::new("shl_meta", depth),
            shl_dlen: Stream::new("shl_dlen", depth),
            uaf_data: Stream::new("uaf_data", depth),
            uaf_meta: Stream::new("uaf_meta", depth),
        }
    }
}

/// UDP shell interface.
#[derive(Debug)]
pub struct UdpShellIf {
    listen: Listen,
    close: Close,
    read_path: ReadPath,
    write_path: WritePath,
    test_req: Stream<UdpTestReq>,
    monitor: Monitor<ShellError>,
    stats: Stats,
}

impl UdpShellIf {
    /// Creates a new interface.
    pub fn new(config: UdpConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            listen: Listen::new("USIF/LSn", config.listen_ports.clone(), config.listen_watchdog),
            close: Close::new(config.close_port),
            read_path: ReadPath::new(config.routes.clone()),
            write_path: WritePath::new(),
            test_req: Stream::new("test_req", config.stream_depth),
            monitor: Monitor::new(config.fault_history),
            stats: Stats::default(),
        })
    }

    /// Faults reported so far.
    pub fn monitor(&self) -> &Monitor<ShellError> { &self.monitor }

    /// Activity counters.
    pub fn stats(&self) -> &Stats { &self.stats }

    /// Listen process.
    pub fn listen(&self) -> &Listen { &self.listen }

    /// Close process.
    pub fn close(&self) -> &Close { &self.close }

    /// Returns `true` if the write path has no datagram in progress.
    pub fn is_write_idle(&self) -> bool { self.write_path.is_idle() }

    /// Runs one cycle of every process.
    pub fn step(&mut self, enable: bool, i: &mut I, o: &mut O) -> Result<(), Error> {
        let mut ctx = Ctx { enable, monitor: &mut self.monitor, stats: &mut self.stats };

        self.listen.tick(&mut ctx, &mut o.shl_lsn_req, &mut i.shl_lsn_rep)?;
        self.close.tick(&mut ctx, &mut o.shl_cls_req, &mut i.shl_cls_rep)?;
        self.read_path.tick(
            &mut ctx,
            read_path::I { meta: &mut i.shl_meta, data: &mut i.shl_data },
            read_path::O { uaf_meta: &mut o.uaf_meta, uaf_data: &mut o.uaf_data, test_req: &mut self.test_req },
        )?;
        self.write_path.tick(
            &mut ctx,
            write_path::I {
                uaf_meta: &mut i.uaf_meta,
                uaf_dlen: &mut i.uaf_dlen,
                uaf_data: &mut i.uaf_data,
                test_req: &mut self.test_req,
            },
            write_path::O { meta: &mut o.shl_meta, dlen: &mut o.shl_dlen, data: &mut o.shl_data },
        )?;

        self.monitor.advance();
        Ok(())
    }
}
