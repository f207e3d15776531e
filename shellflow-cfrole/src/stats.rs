//! Activity counters.

shellflow::counters! {
    /// Activity counters of a shell interface.
    pub struct Stats {
        /// Notifications posted to the interrupt table.
        notifications,
        /// Notifications discarded.
        discarded_notifications,
        /// Read requests issued to the TOE.
        read_requests,
        /// Bytes requested from the TOE.
        requested_bytes,
        /// Chunks forwarded to the application.
        forwarded_chunks,
        /// Chunks discarded.
        dropped_chunks,
        /// Streams or datagrams forwarded to the application.
        forwarded_streams,
        /// Control records extracted.
        control_records,
        /// Connections opened.
        connections_opened,
        /// Transmissions triggered by a control record.
        write_triggers,
        /// Send requests issued.
        send_requests,
        /// Send requests repeated after a `NO_SPACE` reply.
        send_retries,
        /// Transfers abandoned.
        abandoned_sends,
        /// Application chunks sent.
        app_chunks,
        /// Test payload bytes generated.
        test_bytes,
        /// Ports opened for listening.
        listened_ports,
        /// Listen requests repeated.
        listen_retries,
        /// Ports closed.
        closed_ports,
    }
}
