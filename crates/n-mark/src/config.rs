//! Mark configuration.
//!
//! Deserialized from the `[marks]` table of the user's config file. Every
//! field has a default, so an absent table behaves like an empty one.

use serde::Deserialize;

/// A history list the host keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Search-pattern history (`/` and `?`).
    Search,
    /// `:` command-line history.
    Command,
    /// Input-line history.
    Input,
}

/// User-tunable behavior of the mark engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkConfig {
    /// Histories that receive patterns marked with an explicit `:Mark`.
    pub history_add: Vec<HistoryKind>,
}

impl Default for MarkConfig {
    fn default() -> Self {
        Self {
            history_add: vec![HistoryKind::Search, HistoryKind::Input],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_adds_to_search_and_input() {
        let cfg = MarkConfig::default();
        assert_eq!(cfg.history_add, vec![HistoryKind::Search, HistoryKind::Input]);
    }

    #[test]
    fn empty_table_uses_defaults() {
        let cfg: MarkConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, MarkConfig::default());
    }

    #[test]
    fn explicit_history_list() {
        let cfg: MarkConfig = toml::from_str(r#"history_add = ["command"]"#).unwrap();
        assert_eq!(cfg.history_add, vec![HistoryKind::Command]);
    }

    #[test]
    fn empty_history_list_disables_recording() {
        let cfg: MarkConfig = toml::from_str("history_add = []").unwrap();
        assert!(cfg.history_add.is_empty());
    }

    #[test]
    fn unknown_history_rejected() {
        assert!(toml::from_str::<MarkConfig>(r#"history_add = ["yank"]"#).is_err());
    }
}
