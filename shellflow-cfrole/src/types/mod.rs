//! Types exchanged between the shell, the shell interfaces and the application cores.

mod sock;
pub mod tcp;
pub mod udp;

pub use sock::*;
