//! Test benches driving the shell interfaces with scripted offload engines.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use shellflow_cfrole::tcp_shell_if::{self, TcpShellIf};
use shellflow_cfrole::types::tcp::*;
use shellflow_cfrole::types::udp::*;
use shellflow_cfrole::types::{SockAddr, SockLen, SocketPair};
use shellflow_cfrole::udp_shell_if::{self, UdpShellIf};
use shellflow_cfrole::{TcpConfig, UdpConfig};
use shellflow_std::axis::{chunks, AxisChunk};

pub const HOST: SockAddr = SockAddr { addr: 0x0A0C_C832, port: 8803 };

pub fn init_logger() { let _ = env_logger::builder().is_test(true).try_init(); }

/// Bytes of a control record, optionally followed by padding.
pub fn record(sock: SockAddr, len: u16, padding: usize) -> Vec<u8> {
    let mut bytes = SockLen::new(sock, len).to_chunk(false).tdata.to_vec();
    bytes.resize(8 + padding, 0);
    bytes
}

/// TCP shell interface between a scripted TOE and a sink TAF.
pub struct TcpBench {
    pub tsif: TcpShellIf,
    pub i: tcp_shell_if::I,
    pub o: tcp_shell_if::O,
    pub enable: bool,

    /// Replies to the next listen requests; requests beyond the script are accepted.
    pub lsn_script: VecDeque<bool>,
    pub lsn_requests: Vec<u16>,

    /// Error code answered to every send request; `None` leaves the replies to the test.
    pub snd_error: Option<u8>,
    pub snd_requests: Vec<TcpAppSndReq>,

    pub dreqs: Vec<TcpAppRdReq>,
    rx: HashMap<SessionId, VecDeque<u8>>,
    staged_notif: VecDeque<TcpAppNotif>,
    staged_meta: VecDeque<SessionId>,
    staged_data: VecDeque<AxisChunk>,

    pub taf_meta: Vec<SessionId>,
    pub taf_dlen: Vec<u16>,
    pub taf_data: Vec<AxisChunk>,
    pub shl_data: Vec<AxisChunk>,
}

impl TcpBench {
    pub fn new(config: TcpConfig) -> Self {
        init_logger();
        let i = tcp_shell_if::I::new(&config);
        let o = tcp_shell_if::O::new(&config);
        Self {
            tsif: TcpShellIf::new(config).unwrap(),
            i,
            o,
            enable: true,
            lsn_script: VecDeque::new(),
            lsn_requests: Vec::new(),
            snd_error: Some(0),
            snd_requests: Vec::new(),
            dreqs: Vec::new(),
            rx: HashMap::new(),
            staged_notif: VecDeque::new(),
            staged_meta: VecDeque::new(),
            staged_data: VecDeque::new(),
            taf_meta: Vec::new(),
            taf_dlen: Vec::new(),
            taf_data: Vec::new(),
            shl_data: Vec::new(),
        }
    }

    /// Announces `bytes` received on `sess_id` for local port `dst_port`.
    pub fn notify(&mut self, sess_id: SessionId, bytes: &[u8], dst_port: u16) {
        self.rx.entry(sess_id).or_default().extend(bytes.iter().copied());
        self.staged_notif.push_back(TcpAppNotif {
            sess_id,
            tcp_dat_len: bytes.len() as u16,
            ip4_src_addr: HOST.addr,
            tcp_src_port: HOST.port,
            tcp_dst_port: dst_port,
        });
    }

    /// Bytes announced but not requested yet.
    pub fn unread(&self) -> usize { self.rx.values().map(VecDeque::len).sum() }

    pub fn step(&mut self) {
        while let Some(port) = self.o.shl_lsn_req.try_read() {
            self.lsn_requests.push(port);
            let ok = self.lsn_script.pop_front().unwrap_or(true);
            self.i.shl_lsn_rep.write(ok).unwrap();
        }
        while let Some(req) = self.o.shl_dreq.try_read() {
            self.dreqs.push(req);
            let pending = self.rx.get_mut(&req.sess_id).unwrap();
            let bytes = pending.drain(..usize::from(req.length)).collect::<Vec<_>>();
            self.staged_meta.push_back(req.sess_id);
            self.staged_data.extend(chunks(&bytes));
        }
        while let Some(req) = self.o.shl_snd_req.try_read() {
            self.snd_requests.push(req);
            if let Some(error) = self.snd_error {
                let rep = TcpAppSndRep { sess_id: req.sess_id, length: req.length, space_left: 0, error };
                self.i.shl_snd_rep.write(rep).unwrap();
            }
        }
        feed(&mut self.staged_notif, &mut self.i.shl_notif);
        feed(&mut self.staged_meta, &mut self.i.shl_meta);
        feed(&mut self.staged_data, &mut self.i.shl_data);

        self.tsif.step(self.enable, &mut self.i, &mut self.o).unwrap();

        self.taf_meta.extend(self.o.taf_meta.drain());
        self.taf_dlen.extend(self.o.taf_dlen.drain());
        self.taf_data.extend(self.o.taf_data.drain());
        self.shl_data.extend(self.o.shl_data.drain());
    }

    pub fn run(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Runs until the listen ports are open.
    pub fn open_listen_ports(&mut self) {
        for _ in 0..1000 {
            if self.tsif.listen().is_done() {
                return;
            }
            self.step();
        }
        panic!("listen ports not opened");
    }

    /// Runs until `f` holds, at most `cycles` cycles.
    pub fn run_until(&mut self, cycles: usize, f: impl Fn(&Self) -> bool) -> bool {
        for _ in 0..cycles {
            if f(self) {
                return true;
            }
            self.step();
        }
        f(self)
    }
}

/// UDP shell interface between a scripted UOE and a sink UAF.
pub struct UdpBench {
    pub usif: UdpShellIf,
    pub i: udp_shell_if::I,
    pub o: udp_shell_if::O,
    pub enable: bool,

    /// Replies to the next listen requests; requests beyond the script are accepted.
    pub lsn_script: VecDeque<bool>,
    pub lsn_requests: Vec<u16>,

    /// Replies to the next close requests; requests beyond the script succeed.
    pub cls_script: VecDeque<bool>,
    pub cls_requests: Vec<u16>,

    staged_meta: VecDeque<UdpAppMeta>,
    staged_data: VecDeque<AxisChunk>,

    pub uaf_meta: Vec<UdpAppMeta>,
    pub uaf_data: Vec<AxisChunk>,
    pub shl_meta: Vec<UdpAppMeta>,
    pub shl_dlen: Vec<UdpAppDLen>,
    pub shl_data: Vec<AxisChunk>,
}

impl UdpBench {
    pub fn new(config: UdpConfig) -> Self {
        init_logger();
        let i = udp_shell_if::I::new(&config);
        let o = udp_shell_if::O::new(&config);
        Self {
            usif: UdpShellIf::new(config).unwrap(),
            i,
            o,
            enable: true,
            lsn_script: VecDeque::new(),
            lsn_requests: Vec::new(),
            cls_script: VecDeque::new(),
            cls_requests: Vec::new(),
            staged_meta: VecDeque::new(),
            staged_data: VecDeque::new(),
            uaf_meta: Vec::new(),
            uaf_data: Vec::new(),
            shl_meta: Vec::new(),
            shl_dlen: Vec::new(),
            shl_data: Vec::new(),
        }
    }

    /// Delivers a datagram from `src` to local port `dst_port`.
    pub fn datagram(&mut self, src: SockAddr, dst_port: u16, bytes: &[u8]) -> SocketPair {
        let meta = SocketPair::new(src, SockAddr::new(0x0A0C_C801, dst_port));
        self.staged_meta.push_back(meta);
        self.staged_data.extend(chunks(bytes));
        meta
    }

    pub fn step(&mut self) {
        while let Some(port) = self.o.shl_lsn_req.try_read() {
            self.lsn_requests.push(port);
            let ok = self.lsn_script.pop_front().unwrap_or(true);
            self.i.shl_lsn_rep.write(ok).unwrap();
        }
        while let Some(port) = self.o.shl_cls_req.try_read() {
            self.cls_requests.push(port);
            let still_open = self.cls_script.pop_front().unwrap_or(false);
            self.i.shl_cls_rep.write(still_open).unwrap();
        }
        feed(&mut self.staged_meta, &mut self.i.shl_meta);
        feed(&mut self.staged_data, &mut self.i.shl_data);

        self.usif.step(self.enable, &mut self.i, &mut self.o).unwrap();

        self.uaf_meta.extend(self.o.uaf_meta.drain());
        self.uaf_data.extend(self.o.uaf_data.drain());
        self.shl_meta.extend(self.o.shl_meta.drain());
        self.shl_dlen.extend(self.o.shl_dlen.drain());
        self.shl_data.extend(self.o.shl_data.drain());
    }

    pub fn run(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.step();
        }
    }
}

fn feed<T>(staged: &mut VecDeque<T>, stream: &mut shellflow::Stream<T>) {
    while !stream.is_full() {
        match staged.pop_front() {
            Some(item) => stream.write(item).unwrap(),
            None => break,
        }
    }
}
