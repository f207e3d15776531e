//! ShellFlow: cycle-level dataflow processes connected by bounded, non-blocking streams.
//!
//! Every process is a state machine driven by a `tick()` method. A tick performs at most one unit
//! of work per stream and never blocks: reads are preceded by an emptiness check and writes by a
//! fullness check, and a process that is not ready simply retries on the next tick.

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

mod counters;
mod error;
mod monitor;
mod stream;
pub mod utils;

pub use error::Error;
pub use monitor::{Fault, Monitor};
#[doc(hidden)]
pub use paste;
pub use stream::Stream;
pub use utils::*;
