//! # n-mark — Mark engine for n-mark
//!
//! Highlights several patterns at once, each in its own color, and keeps
//! every open view in agreement about what is marked:
//!
//! - **[`registry`]** — `SlotRegistry`, the fixed set of color slots with
//!   free-slot-first allocation and round-robin eviction
//! - **[`sync`]** — `ViewSync`, per-view highlight registrations rebuilt
//!   lazily from registry state
//! - **[`lookup`]** — which mark (if any) covers the cursor
//! - **[`search`]** — jump to the next/previous occurrence of a mark
//! - **[`trigger`]** — `Marks`, the session object behind the user commands
//! - **[`pattern`]** — pattern derivation and case-marker injection
//! - **[`host`]** — the traits a host editor implements
//! - **[`config`]** — user configuration (`MarkConfig`)
//!
//! The engine owns no text, windows or regex engine. Everything it needs
//! from the editor goes through [`host::Host`].

pub mod config;
pub mod error;
pub mod host;
pub mod lookup;
pub mod pattern;
pub mod registry;
pub mod search;
pub mod sync;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{HistoryKind, MarkConfig};
pub use error::MarkError;
pub use host::{Host, MatchHandle, Matcher, ViewId};
pub use registry::SlotRegistry;
pub use trigger::{Marks, Outcome};
