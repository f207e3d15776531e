//! TCP shell interface (TSIF).
//!
//! Wires the processes of the interface together and steps them once per cycle:
//!
//! - [`Listen`] opens the listen ports of the role.
//! - [`Connect`] opens active connections and triggers the transmit test mode.
//! - [`InterruptTable`] posts the TOE notifications and schedules read requests.
//! - [`InputReadBuffer`] and the [`OccupancyTracker`] bound the data in flight.
//! - [`ReadPath`] dispatches the received streams.
//! - [`WritePath`] sends the data of the TAF and the test payloads.

mod connect;
mod input_read_buffer;
mod interrupt_table;
mod read_path;
mod write_path;

pub use connect::Connect;
pub use input_read_buffer::InputReadBuffer;
pub use interrupt_table::{InterruptTable, SessionTable};
pub use read_path::ReadPath;
pub use write_path::WritePath;

use shellflow::{Error, Monitor, Stream};
use shellflow_std::axis::AxisChunk;
use shellflow_std::fifo::OccupancyTracker;

use crate::types::tcp::*;
use crate::types::{SockAddr, SockLen};
use crate::{ConfigError, Ctx, Listen, ShellError, Stats, TcpConfig};

/// Ingress streams of the TCP shell interface.
#[derive(Debug)]
pub struct I {
    /// Data notifications from the TOE.
    pub shl_notif: Stream<TcpAppNotif>,

    /// Received data from the TOE.
    pub shl_data: Stream<AxisChunk>,

    /// Metadata of the received data from the TOE.
    pub shl_meta: Stream<SessionId>,

    /// Listen replies from the TOE.
    pub shl_lsn_rep: Stream<bool>,

    /// Open replies from the TOE.
    pub shl_opn_rep: Stream<TcpAppOpnRep>,

    /// Send replies from the TOE.
    pub shl_snd_rep: Stream<TcpAppSndRep>,

    /// Send requests from the TAF.
    pub taf_snd_req: Stream<TcpAppSndReq>,

    /// Data to send from the TAF.
    pub taf_data: Stream<AxisChunk>,
}

impl I {
    /// Creates the ingress streams.
    pub fn new(config: &TcpConfig) -> Self {
        let depth = config.stream_depth;
        Self {
            shl_notif: Stream::new("shl_notif", depth),
            shl_data: Stream::new("shl_data", depth),
            shl_meta: Stream::new("shl_meta", depth),
            shl_lsn_rep: Stream::new("shl_lsn_rep", depth),
            shl_opn_rep: Stream::new("shl_opn_rep", depth),
            shl_snd_rep: Stream::new("shl_snd_rep", depth),
            taf_snd_req: Stream::new("taf_snd_req", depth),
            taf_data: Stream::new("taf_data", depth),
        }
    }
}

/// Egress streams of the TCP shell interface.
#[derive(Debug)]
pub struct O {
    /// Read requests to the TOE.
    pub shl_dreq: Stream<TcpAppRdReq>,

    /// Listen requests to the TOE.
    pub shl_lsn_req: Stream<u16>,

    /// Open requests to the TOE.
    pub shl_opn_req: Stream<SockAddr>,

    /// Close requests to the TOE.
    pub shl_cls_req: Stream<SessionId>,

    /// Send requests to the TOE.
    pub shl_snd_req: Stream<TcpAppSndReq>,

    /// Data to send to the TOE.
    pub shl_data: Stream<AxisChunk>,

    /// Session of each stream forwarded to the TAF.
    pub taf_meta: Stream<SessionId>,

    /// Length of each stream forwarded to the TAF.
    pub taf_dlen: Stream<u16>,

    /// Data forwarded to the TAF.
    pub taf_data: Stream<AxisChunk>,
}

impl O {
    /// Creates the egress streams.
    pub fn new(config: &TcpConfig) -> Self {
        let depth = config.stream_depth;
        Self {
            shl_dreq: Stream::new("shl_dreq", depth),
            shl_lsn_req: Stream::new("shl_lsn_req", depth),
            shl_opn_req: Stream::new("shl_opn_req", depth),
            shl_cls_req: Stream::new("shl_cls_req", depth),
            shl_snd_req: Stream::new("shl_snd_req", depth),
            shl_data: Stream::new("shl_data", depth),
            taf_meta: Stream::new("taf_meta", depth),
            taf_dlen: Stream::new("taf_dlen", depth),
            taf_data: Stream::new("taf_data", depth),
        }
    }
}

/// Streams between the processes of the interface.
#[derive(Debug)]
struct Internal {
    fwd_cmd: Stream<ForwardCmd>,
    irb_meta: Stream<SessionId>,
    irb_data: Stream<AxisChunk>,
    enq: Stream<()>,
    deq: Stream<()>,
    sock_len: Stream<SockLen>,
    test_req: Stream<TcpAppSndReq>,
}

impl Internal {
    fn new(config: &TcpConfig) -> Self {
        let depth = config.stream_depth;
        Self {
            fwd_cmd: Stream::new("fwd_cmd", depth),
            irb_meta: Stream::new("irb_meta", depth),
            irb_data: Stream::new("irb_data", config.input_buffer_chunks),
            enq: Stream::new("enq", depth),
            deq: Stream::new("deq", depth),
            sock_len: Stream::new("sock_len", depth),
            test_req: Stream::new("test_req", depth),
        }
    }
}

/// TCP shell interface.
#[derive(Debug)]
pub struct TcpShellIf {
    listen: Listen,
    connect: Connect,
    interrupts: InterruptTable,
    irb: InputReadBuffer,
    tracker: OccupancyTracker,
    read_path: ReadPath,
    write_path: WritePath,
    internal: Internal,
    monitor: Monitor<ShellError>,
    stats: Stats,
}

impl TcpShellIf {
    /// Creates a new interface.
    pub fn new(config: TcpConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            listen: Listen::new("TSIF/LSn", config.listen_ports.clone(), config.listen_watchdog),
            connect: Connect::new(config.connect_watchdog),
            interrupts: InterruptTable::new(config.max_sessions, config.routes.clone()),
            irb: InputReadBuffer::new(),
            tracker: OccupancyTracker::new(config.input_buffer_chunks),
            read_path: ReadPath::new(),
            write_path: WritePath::new(config.send_retries),
            internal: Internal::new(&config),
            monitor: Monitor::new(config.fault_history),
            stats: Stats::default(),
        })
    }

    /// Faults reported so far.
    pub fn monitor(&self) -> &Monitor<ShellError> { &self.monitor }

    /// Faults reported so far.
    pub fn monitor_mut(&mut self) -> &mut Monitor<ShellError> { &mut self.monitor }

    /// Activity counters.
    pub fn stats(&self) -> &Stats { &self.stats }

    /// Listen process.
    pub fn listen(&self) -> &Listen { &self.listen }

    /// Connect process.
    pub fn connect(&self) -> &Connect { &self.connect }

    /// Session table of the interrupt table.
    pub fn sessions(&self) -> &SessionTable { self.interrupts.table() }

    /// Occupancy of the input read buffer.
    pub fn tracker(&self) -> &OccupancyTracker { &self.tracker }

    /// Chunks currently held by the input read buffer.
    pub fn buffered_chunks(&self) -> usize { self.internal.irb_data.len() }

    /// Returns `true` if the write path has no transfer in progress.
    pub fn is_write_idle(&self) -> bool { self.write_path.is_idle() }

    /// Runs one cycle of every process.
    pub fn step(&mut self, enable: bool, i: &mut I, o: &mut O) -> Result<(), Error> {
        let n = &mut self.internal;
        let mut ctx = Ctx { enable, monitor: &mut self.monitor, stats: &mut self.stats };

        self.listen.tick(&mut ctx, &mut o.shl_lsn_req, &mut i.shl_lsn_rep)?;
        self.connect.tick(
            &mut ctx,
            connect::I { sock_len: &mut n.sock_len, opn_rep: &mut i.shl_opn_rep },
            connect::O { opn_req: &mut o.shl_opn_req, cls_req: &mut o.shl_cls_req, test_req: &mut n.test_req },
        )?;
        self.interrupts.tick(&mut ctx, &mut i.shl_notif, &mut self.tracker, &mut o.shl_dreq, &mut n.fwd_cmd)?;
        self.irb.tick(&mut i.shl_data, &mut i.shl_meta, &mut n.irb_data, &mut n.irb_meta, &mut n.enq)?;
        if let Err(e) = self.tracker.tick(&mut n.enq, &mut n.deq) {
            ctx.error("TSIF/IRb", e.into());
        }
        self.read_path.tick(
            &mut ctx,
            read_path::I { fwd_cmd: &mut n.fwd_cmd, meta: &mut n.irb_meta, data: &mut n.irb_data },
            read_path::O {
                taf_meta: &mut o.taf_meta,
                taf_dlen: &mut o.taf_dlen,
                taf_data: &mut o.taf_data,
                sock_len: &mut n.sock_len,
                deq: &mut n.deq,
            },
        )?;
        self.write_path.tick(
            &mut ctx,
            write_path::I {
                taf_snd_req: &mut i.taf_snd_req,
                taf_data: &mut i.taf_data,
                test_req: &mut n.test_req,
                snd_rep: &mut i.shl_snd_rep,
            },
            write_path::O { snd_req: &mut o.shl_snd_req, data: &mut o.shl_data },
        )?;

        self.monitor.advance();
        Ok(())
    }
}
