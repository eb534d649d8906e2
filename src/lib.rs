//! # selreg
//!
//! X11 selection register daemon: 256 addressable, persistent clipboard
//! slots served over the PRIMARY selection.
//!
//! The PRIMARY selection dies with the process that owns it. `selreg` keeps
//! a long-lived daemon around that captures selection content into named
//! registers on demand and serves any register back to third-party
//! requesters, so copied text survives the application it came from.
//!
//! # Architecture
//!
//! ```text
//! selreg (client)          selreg (daemon)              other X clients
//!   locate marker owner ─▶   event dispatch loop
//!   COPY/PASTE message  ─▶     ├─ command handler ──▶ convert / claim
//!                              ├─ conversion done ──▶ register store
//!                              ├─ content request ◀── requester
//!                              │    └─ negotiation ──▶ notify reply
//!                              └─ selection lost  ──▶ idle / shutdown
//! ```
//!
//! The daemon is single-threaded: one blocking loop, one event at a time.
//! The X server's exclusive selection ownership is both the daemon
//! election primitive (the marker selection) and the serving handoff (the
//! PRIMARY selection).

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Interned identifier registry
pub mod atoms;

/// Client command path
pub mod client;

/// Configuration loading and validation
pub mod config;

/// The daemon: election, dispatch loop, negotiation state machine
pub mod daemon;

/// Error types
pub mod error;

/// The register store
pub mod registers;

/// Transport seam and the X11 implementation
pub mod transport;

pub use atoms::{Atom, Atoms, REGISTER_COUNT};
pub use client::Client;
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use registers::{Register, RegisterStore};
pub use transport::{Transport, TransportEvent};
