//! Receive interrupt table (RIt) and read request handler (RRh).
//!
//! The poster accumulates the byte counts announced by the TOE into a per-session table and flags
//! the session as pending. The scheduler picks pending sessions in round-robin order and turns
//! their byte counts into read requests bounded by the free space of the input read buffer. Both
//! access the table under a mutex arbiter which favors the poster.

use log::{debug, trace};
use shellflow::{some_or, Error, Stream};
use shellflow_std::axis::CHUNK_BYTES;
use shellflow_std::fifo::OccupancyTracker;
use shellflow_std::{Bitmap, Grant, MutexArbiter, RoundRobin};

use crate::routing::RoutingTable;
use crate::types::tcp::*;
use crate::{Ctx, ShellError};

const POSTER: &str = "TSIF/RIt";
const SCHEDULER: &str = "TSIF/RRh";

/// Pending byte counts per session, with the bitmap of sessions that have any.
///
/// A session's bit is set iff its byte count is non-zero.
#[derive(Debug, Clone)]
pub struct SessionTable {
    entries: Vec<InterruptEntry>,
    pending: Bitmap,
}

impl SessionTable {
    /// Creates an empty table of `sessions` entries.
    pub fn new(sessions: usize) -> Self {
        Self { entries: vec![InterruptEntry::default(); sessions], pending: Bitmap::new(sessions) }
    }

    /// Number of entries.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns `true` if the table has no entry.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Entry of `sess_id`.
    pub fn entry(&self, sess_id: SessionId) -> Option<&InterruptEntry> { self.entries.get(usize::from(sess_id)) }

    /// Bitmap of sessions with pending bytes.
    pub fn pending(&self) -> &Bitmap { &self.pending }

    /// Adds `len` bytes to the entry of `sess_id`.
    pub fn post(&mut self, sess_id: SessionId, len: u16, dst_port: u16) {
        let index = usize::from(sess_id);
        let entry = &mut self.entries[index];
        entry.byte_cnt = entry.byte_cnt.saturating_add(u32::from(len));
        entry.dst_port = dst_port;
        if entry.byte_cnt > 0 {
            self.pending.set(index);
        }
    }

    /// Removes `len` bytes from the entry of `sess_id` and returns the updated entry.
    pub fn consume(&mut self, sess_id: SessionId, len: u32) -> InterruptEntry {
        let index = usize::from(sess_id);
        let entry = &mut self.entries[index];
        entry.byte_cnt = entry.byte_cnt.saturating_sub(len);
        if entry.byte_cnt == 0 {
            self.pending.clear(index);
        }
        *entry
    }

    /// Checks that the pending bitmap agrees with the byte counts.
    pub fn is_consistent(&self) -> bool {
        self.entries.iter().enumerate().all(|(i, entry)| (entry.byte_cnt > 0) == self.pending.get(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PosterState {
    Idle,
    Post(TcpAppNotif),
}

/// Consumes the notifications of the TOE and posts them to the table.
#[derive(Debug, Clone)]
struct Poster {
    state: PosterState,
}

impl Poster {
    fn new() -> Self { Self { state: PosterState::Idle } }

    fn wants_table(&self) -> bool { matches!(self.state, PosterState::Post(_)) }

    fn tick(
        &mut self, ctx: &mut Ctx<'_>, granted: bool, table: &mut SessionTable, notif: &mut Stream<TcpAppNotif>,
    ) -> Result<(), Error> {
        match self.state {
            PosterState::Idle => {
                if notif.is_empty() {
                    return Ok(());
                }
                let notif = notif.read()?;
                if notif.tcp_dat_len == 0 {
                    ctx.warn(POSTER, ShellError::ZeroLengthNotification { sess_id: notif.sess_id });
                    ctx.stats.incr_discarded_notifications();
                } else if usize::from(notif.sess_id) >= table.len() {
                    ctx.error(POSTER, ShellError::SessionOutOfRange { sess_id: notif.sess_id, max: table.len() });
                    ctx.stats.incr_discarded_notifications();
                } else {
                    self.state = PosterState::Post(notif);
                }
            }
            PosterState::Post(notif) => {
                if !granted {
                    return Ok(());
                }
                table.post(notif.sess_id, notif.tcp_dat_len, notif.tcp_dst_port);
                trace!(
                    target: POSTER,
                    "session {} (port {}): +{} bytes",
                    notif.sess_id,
                    notif.tcp_dst_port,
                    notif.tcp_dat_len
                );
                ctx.stats.incr_notifications();
                self.state = PosterState::Idle;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Idle,
    Query(SessionId),
    Emit(TcpAppRdReq, ForwardCmd),
}

/// Turns pending byte counts into read requests.
#[derive(Debug, Clone)]
struct Scheduler {
    state: SchedulerState,
    rr: RoundRobin,
    routes: RoutingTable,
}

impl Scheduler {
    fn new(routes: RoutingTable) -> Self { Self { state: SchedulerState::Idle, rr: RoundRobin::new(), routes } }

    fn wants_table(&self) -> bool { matches!(self.state, SchedulerState::Query(_)) }

    fn tick(
        &mut self, ctx: &mut Ctx<'_>, granted: bool, table: &mut SessionTable, tracker: &mut OccupancyTracker,
        dreq: &mut Stream<TcpAppRdReq>, fwd_cmd: &mut Stream<ForwardCmd>,
    ) -> Result<(), Error> {
        match self.state {
            SchedulerState::Idle => {
                let sess_id = some_or!(self.rr.select(table.pending()), return Ok(()));
                // The table holds at most 2^16 sessions.
                self.state = SchedulerState::Query(sess_id as SessionId);
            }
            SchedulerState::Query(sess_id) => {
                if !granted {
                    return Ok(());
                }
                let entry = *some_or!(table.entry(sess_id), {
                    self.state = SchedulerState::Idle;
                    return Ok(());
                });
                let space = tracker.available() * CHUNK_BYTES;
                let length = entry.byte_cnt.min(u32::from(u16::MAX)).min(space as u32) as u16;
                if length == 0 {
                    // No room in the input buffer yet. Release the table and come back later.
                    self.state = SchedulerState::Idle;
                    return Ok(());
                }

                let left = table.consume(sess_id, u32::from(length));
                trace!(target: SCHEDULER, "session {}: -{} bytes, {} left", sess_id, length, left.byte_cnt);
                tracker.reserve(shellflow::units_of(usize::from(length), CHUNK_BYTES));
                self.rr.serviced(usize::from(sess_id), table.len());

                let route = self.routes.lookup(entry.dst_port);
                let cmd = ForwardCmd { sess_id, length, action: route.action, drop_code: route.drop_code };
                self.state = SchedulerState::Emit(TcpAppRdReq { sess_id, length }, cmd);
            }
            SchedulerState::Emit(req, cmd) => {
                if dreq.is_full() || fwd_cmd.is_full() {
                    return Ok(());
                }
                dreq.write(req)?;
                fwd_cmd.write(cmd)?;
                debug!(
                    target: SCHEDULER,
                    "requesting {} bytes of session {} ({:?}/{:?})",
                    req.length,
                    req.sess_id,
                    cmd.action,
                    cmd.drop_code
                );
                ctx.stats.incr_read_requests();
                ctx.stats.add_requested_bytes(u64::from(req.length));
                self.state = SchedulerState::Idle;
            }
        }

        Ok(())
    }
}

/// Interrupt table: the session table, its arbiter, the poster and the scheduler.
#[derive(Debug, Clone)]
pub struct InterruptTable {
    table: SessionTable,
    arbiter: MutexArbiter,
    poster: Poster,
    scheduler: Scheduler,
}

impl InterruptTable {
    /// Creates a new interrupt table.
    pub fn new(sessions: usize, routes: RoutingTable) -> Self {
        Self {
            table: SessionTable::new(sessions),
            arbiter: MutexArbiter::new(),
            poster: Poster::new(),
            scheduler: Scheduler::new(routes),
        }
    }

    /// Session table.
    pub fn table(&self) -> &SessionTable { &self.table }

    /// Current grant of the table.
    pub fn grant(&self) -> Grant { self.arbiter.grant() }

    /// Runs one cycle of the arbiter, the poster and the scheduler.
    pub fn tick(
        &mut self, ctx: &mut Ctx<'_>, notif: &mut Stream<TcpAppNotif>, tracker: &mut OccupancyTracker,
        dreq: &mut Stream<TcpAppRdReq>, fwd_cmd: &mut Stream<ForwardCmd>,
    ) -> Result<(), Error> {
        let grant = self.arbiter.tick(self.poster.wants_table(), self.scheduler.wants_table());
        self.poster.tick(ctx, grant == Grant::High, &mut self.table, notif)?;
        self.scheduler.tick(ctx, grant == Grant::Low, &mut self.table, tracker, dreq, fwd_cmd)?;
        debug_assert!(self.table.is_consistent());
        Ok(())
    }
}
