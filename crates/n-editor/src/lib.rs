//! # n-editor — Editor model for n-mark
//!
//! The host side of mark highlighting: a read-only buffer shown in windows
//! across tab pages, with everything a mark engine asks of an editor.
//!
//! - **[`position`]** — `Position` (line, char col) and char/byte column conversion
//! - **[`buffer`]** — `Buffer` wrapping a rope, loaded from a file or a string
//! - **[`word`]** — character classes and the word under the cursor
//! - **[`search`]** — Vim magic patterns compiled to `regex`, match finding
//! - **[`highlight`]** — highlight groups and per-window `matchadd()` tables
//! - **[`split`]** — split trees, screen layout and tab pages
//! - **[`options`]** — `:set` parsing and option values
//! - **[`register`]** — the `/` and `:` registers
//! - **[`history`]** — search, command and input histories
//! - **[`command`]** — `:` command parsing
//! - **[`editor`]** — `Editor`, tying the above together

pub mod buffer;
pub mod command;
pub mod editor;
pub mod highlight;
pub mod history;
pub mod options;
pub mod position;
pub mod register;
pub mod search;
pub mod split;
pub mod word;

pub use editor::{Editor, EditorError, Window};
