//! cloudFPGA role: TCP and UDP shell interfaces.
//!
//! The shell interfaces sit between the network offload engines of the shell (TOE and UOE) and the
//! application flash cores of the role (TAF and UAF). They open listen ports, schedule reads of
//! the received data under a bounded input buffer, dispatch streams by destination port, open
//! active connections and serve the transmit test mode.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
//
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::bare_urls)]
//
#![allow(clippy::needless_lifetimes)]
#![allow(elided_lifetimes_in_paths)]

mod config;
pub mod constants;
mod ctx;
mod error;
mod listen;
mod pattern;
mod routing;
mod stats;
pub mod tcp_shell_if;
pub mod types;
pub mod udp_shell_if;

pub use config::*;
pub use ctx::Ctx;
pub use error::*;
pub use listen::*;
pub use pattern::*;
pub use routing::*;
pub use stats::*;
