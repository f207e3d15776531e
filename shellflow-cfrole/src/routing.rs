//! Dispatch of received streams by destination port.

use linked_hash_map::LinkedHashMap;

use crate::constants::ports::*;
use crate::types::tcp::{Action, DropCode};

/// Forwarding policy of a destination port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Whether the stream reaches the application.
    pub action: Action,

    /// What to do with a dropped stream.
    pub drop_code: DropCode,
}

impl Route {
    /// Forward to the application.
    pub const FORWARD: Self = Self { action: Action::Keep, drop_code: DropCode::Nop };

    /// Receive test mode: discard.
    pub const DUMP: Self = Self { action: Action::Drop, drop_code: DropCode::Nop };

    /// Transmit test mode: extract the transmit request, discard the rest.
    pub const GENERATE: Self = Self { action: Action::Drop, drop_code: DropCode::Gen };
}

/// Static routing table from destination port to [`Route`].
///
/// Ports without an entry take the default route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    routes: LinkedHashMap<u16, Route>,
    default: Route,
}

impl Default for RoutingTable {
    fn default() -> Self {
        let mut table = Self::new(Route::FORWARD);
        table.insert(RECV_MODE_LSN_PORT, Route::DUMP);
        table.insert(XMIT_MODE_LSN_PORT, Route::GENERATE);
        table
    }
}

impl RoutingTable {
    /// Creates an empty table.
    pub fn new(default: Route) -> Self { Self { routes: LinkedHashMap::new(), default } }

    /// Sets the route of `port`, returning the previous one.
    pub fn insert(&mut self, port: u16, route: Route) -> Option<Route> { self.routes.insert(port, route) }

    /// Removes the route of `port`, which then takes the default route.
    pub fn remove(&mut self, port: u16) -> Option<Route> { self.routes.remove(&port) }

    /// Returns the route of `port`.
    pub fn lookup(&self, port: u16) -> Route { self.routes.get(&port).copied().unwrap_or(self.default) }

    /// Default route.
    pub fn default_route(&self) -> Route { self.default }

    /// Iterates over the explicit routes, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Route)> + '_ {
        self.routes.iter().map(|(port, route)| (*port, *route))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes() {
        let table = RoutingTable::default();
        assert_eq!(table.lookup(RECV_MODE_LSN_PORT), Route::DUMP);
        assert_eq!(table.lookup(XMIT_MODE_LSN_PORT), Route::GENERATE);
        assert_eq!(table.lookup(ECHO_MODE_LSN_PORT), Route::FORWARD);
        assert_eq!(table.lookup(0xBEEF), Route::FORWARD);
    }

    #[test]
    fn extension_is_a_table_update() {
        let mut table = RoutingTable::default();
        assert_eq!(table.insert(IPERF_LSN_PORT, Route::DUMP), None);
        assert_eq!(table.iter().map(|(port, _)| port).collect::<Vec<_>>(), vec![
            RECV_MODE_LSN_PORT,
            XMIT_MODE_LSN_PORT,
            IPERF_LSN_PORT
        ]);
        assert_eq!(table.insert(RECV_MODE_LSN_PORT, Route::FORWARD), Some(Route::DUMP));
        assert_eq!(table.lookup(IPERF_LSN_PORT), Route::DUMP);
        assert_eq!(table.lookup(RECV_MODE_LSN_PORT), Route::FORWARD);
        assert_eq!(table.remove(IPERF_LSN_PORT), Some(Route::DUMP));
        assert_eq!(table.lookup(IPERF_LSN_PORT), Route::FORWARD);
    }
}
