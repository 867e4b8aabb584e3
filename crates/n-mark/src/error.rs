use thiserror::Error;

/// Errors raised by the mark engine.
///
/// Only [`MarkError::NoSlots`] reaches the user in practice: it means the
/// host defines no mark highlight groups, so nothing can be colored. The
/// command that hit it leaves all state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkError {
    /// The host exposes no `MarkWordN` highlight groups.
    #[error("no highlight slots available")]
    NoSlots,
    /// A slot index outside `[0, capacity)`.
    #[error("slot {index} out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },
}
