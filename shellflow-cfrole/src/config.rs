//! Configuration of the shell interfaces.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::constants::ports::{EPHEMERAL_PORT_BASE, LSN_PORTS_MAX, LSN_PORT_TABLE};
use crate::constants::{tcp_shell_if as tcp, udp_shell_if as udp};
use crate::routing::{Route, RoutingTable};

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A listen port lies in the ephemeral range.
    #[error("listen port {0} is not in the static port range")]
    EphemeralListenPort(u16),

    /// Too many listen ports.
    #[error("at most {} listen ports are supported", LSN_PORTS_MAX)]
    TooManyListenPorts,

    /// A size which must be positive is zero.
    #[error("`{0}` must be non-zero")]
    Zero(&'static str),

    /// The input read buffer cannot hold a single chunk.
    #[error("the input read buffer needs at least 2 chunks, got {0}")]
    InputBufferTooSmall(usize),

    /// Session identifiers do not fit the TOE interface.
    #[error("{0} sessions do not fit a 16-bit session id")]
    TooManySessions(usize),
}

fn default_listen_ports() -> ArrayVec<u16, LSN_PORTS_MAX> { LSN_PORT_TABLE.iter().copied().collect() }

fn check_listen_ports(ports: &[u16]) -> Result<(), ConfigError> {
    match ports.iter().find(|port| **port >= EPHEMERAL_PORT_BASE) {
        Some(port) => Err(ConfigError::EphemeralListenPort(*port)),
        None => Ok(()),
    }
}

fn check_non_zero(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero(name));
    }
    Ok(())
}

/// Configuration of the TCP shell interface.
#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// Sessions tracked by the interrupt table.
    pub max_sessions: usize,

    /// Capacity of the input read buffer, in chunks.
    pub input_buffer_chunks: usize,

    /// Depth of the streams between processes.
    pub stream_depth: usize,

    /// Send requests issued for one transfer before it is abandoned.
    pub send_retries: u32,

    /// Cycles to wait for a listen reply.
    pub listen_watchdog: u32,

    /// Cycles to wait for an open reply before restarting the wait.
    pub connect_watchdog: u32,

    /// Ports opened at startup, in request order.
    pub listen_ports: ArrayVec<u16, LSN_PORTS_MAX>,

    /// Dispatch of received streams.
    pub routes: RoutingTable,

    /// Faults retained by the monitor.
    pub fault_history: usize,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            max_sessions: tcp::MAX_SESSIONS,
            input_buffer_chunks: tcp::INPUT_BUFFER_CHUNKS,
            stream_depth: tcp::STREAM_DEPTH,
            send_retries: tcp::SEND_RETRIES,
            listen_watchdog: tcp::LSN_WATCHDOG,
            connect_watchdog: tcp::CON_WATCHDOG,
            listen_ports: default_listen_ports(),
            routes: RoutingTable::default(),
            fault_history: tcp::FAULT_HISTORY,
        }
    }
}

impl TcpConfig {
    /// Sets the route of `port`.
    pub fn route(mut self, port: u16, route: Route) -> Self {
        let _ = self.routes.insert(port, route);
        self
    }

    /// Replaces the listen port table.
    pub fn listen_on(mut self, ports: &[u16]) -> Result<Self, ConfigError> {
        self.listen_ports = ports.iter().copied().collect_ports()?;
        Ok(self)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_zero("max_sessions", self.max_sessions)?;
        check_non_zero("stream_depth", self.stream_depth)?;
        check_non_zero("send_retries", self.send_retries as usize)?;
        if self.max_sessions > usize::from(u16::MAX) + 1 {
            return Err(ConfigError::TooManySessions(self.max_sessions));
        }
        if self.input_buffer_chunks < 2 {
            return Err(ConfigError::InputBufferTooSmall(self.input_buffer_chunks));
        }
        check_listen_ports(&self.listen_ports)
    }
}

/// Configuration of the UDP shell interface.
#[derive(Debug, Clone)]
pub struct UdpConfig {
    /// Depth of the streams between processes.
    pub stream_depth: usize,

    /// Cycles to wait for a listen reply.
    pub listen_watchdog: u32,

    /// Ports opened at startup, in request order.
    pub listen_ports: ArrayVec<u16, LSN_PORTS_MAX>,

    /// Port closed at startup.
    pub close_port: u16,

    /// Dispatch of received datagrams.
    pub routes: RoutingTable,

    /// Faults retained by the monitor.
    pub fault_history: usize,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            stream_depth: udp::STREAM_DEPTH,
            listen_watchdog: udp::LSN_WATCHDOG,
            listen_ports: default_listen_ports(),
            close_port: udp::CLOSE_PORT,
            routes: RoutingTable::default(),
            fault_history: udp::FAULT_HISTORY,
        }
    }
}

impl UdpConfig {
    /// Sets the route of `port`.
    pub fn route(mut self, port: u16, route: Route) -> Self {
        let _ = self.routes.insert(port, route);
        self
    }

    /// Replaces the listen port table.
    pub fn listen_on(mut self, ports: &[u16]) -> Result<Self, ConfigError> {
        self.listen_ports = ports.iter().copied().collect_ports()?;
        Ok(self)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_zero("stream_depth", self.stream_depth)?;
        check_listen_ports(&self.listen_ports)
    }
}

trait CollectPorts: Iterator<Item = u16> + Sized {
    fn collect_ports(self) -> Result<ArrayVec<u16, LSN_PORTS_MAX>, ConfigError> {
        let mut ports = ArrayVec::new();
        for port in self {
            ports.try_push(port).map_err(|_| ConfigError::TooManyListenPorts)?;
        }
        check_listen_ports(&ports)?;
        Ok(ports)
    }
}

impl<I: Iterator<Item = u16>> CollectPorts for I {}
