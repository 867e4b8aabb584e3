//! Editor options — `:set` parsing and the option values.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Enable boolean / show numeric |
//! | `:set nooption`  | Disable boolean               |
//! | `:set option!`   | Toggle boolean                |
//! | `:set option?`   | Query current value           |
//! | `:set option=N`  | Assign numeric value          |
//! | `:set`           | Show every option             |
//!
//! # Options
//!
//! | Full name    | Abbrev | Type    | Default |
//! |--------------|--------|---------|---------|
//! | `ignorecase` | `ic`   | bool    | false   |
//! | `number`     | `nu`   | bool    | false   |
//! | `history`    | `hi`   | integer | 50      |

use thiserror::Error;

use crate::history::DEFAULT_HISTORY_LEN;

/// A parsed `:set` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    On(String),
    Off(String),
    Toggle(String),
    Query(String),
    Assign(String, String),
    ShowAll,
}

/// A `:set` argument the editor rejects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("E518: Unknown option: {0}")]
    Unknown(String),
    #[error("E474: Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Which option a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionName {
    IgnoreCase,
    Number,
    History,
}

impl OptionName {
    /// Resolve a full name or abbreviation.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "ignorecase" | "ic" => Some(Self::IgnoreCase),
            "number" | "nu" => Some(Self::Number),
            "history" | "hi" => Some(Self::History),
            _ => None,
        }
    }

    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Self::IgnoreCase => "ignorecase",
            Self::Number => "number",
            Self::History => "history",
        }
    }

    #[must_use]
    pub const fn is_bool(self) -> bool {
        !matches!(self, Self::History)
    }
}

/// Parse the arguments of `:set` into directives.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() || trimmed == "all" {
        return vec![SetDirective::ShowAll];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // Only a known boolean after "no" negates, so `number` stays `number`.
    if let Some(name) = arg.strip_prefix("no") {
        if OptionName::lookup(name).is_some_and(OptionName::is_bool) {
            return SetDirective::Off(name.to_string());
        }
    }
    if OptionName::lookup(arg).is_some_and(|o| !o.is_bool()) {
        return SetDirective::Query(arg.to_string());
    }
    SetDirective::On(arg.to_string())
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Current option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub ignorecase: bool,
    pub number: bool,
    pub history: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignorecase: false,
            number: false,
            history: DEFAULT_HISTORY_LEN,
        }
    }
}

/// What applying a directive did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// `option` now has a different value.
    Changed(OptionName),
    /// Nothing changed.
    Unchanged,
    /// Text to show the user (queries).
    Show(String),
}

impl Options {
    fn bool_mut(&mut self, name: OptionName) -> Option<&mut bool> {
        match name {
            OptionName::IgnoreCase => Some(&mut self.ignorecase),
            OptionName::Number => Some(&mut self.number),
            OptionName::History => None,
        }
    }

    /// `name=value` or `noname`, the way `:set name?` prints it.
    #[must_use]
    pub fn format(&self, name: OptionName) -> String {
        match name {
            OptionName::IgnoreCase => format_bool(name.full_name(), self.ignorecase),
            OptionName::Number => format_bool(name.full_name(), self.number),
            OptionName::History => format!("history={}", self.history),
        }
    }

    /// Apply one directive.
    ///
    /// # Errors
    ///
    /// [`OptionError`] for unknown names, bool operations on a number, and
    /// unparsable values.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<SetOutcome, OptionError> {
        let resolve =
            |name: &str| OptionName::lookup(name).ok_or_else(|| OptionError::Unknown(name.to_string()));
        let invalid = OptionError::InvalidArgument;

        match directive {
            SetDirective::ShowAll => Ok(SetOutcome::Show(
                [OptionName::History, OptionName::IgnoreCase, OptionName::Number]
                    .map(|o| self.format(o))
                    .join("  "),
            )),
            SetDirective::Query(name) => Ok(SetOutcome::Show(self.format(resolve(name)?))),
            SetDirective::On(name) | SetDirective::Off(name) | SetDirective::Toggle(name) => {
                let option = resolve(name)?;
                let value = self.bool_mut(option).ok_or_else(|| invalid(name.clone()))?;
                let new = match directive {
                    SetDirective::On(_) => true,
                    SetDirective::Off(_) => false,
                    _ => !*value,
                };
                Ok(if std::mem::replace(value, new) == new {
                    SetOutcome::Unchanged
                } else {
                    SetOutcome::Changed(option)
                })
            }
            SetDirective::Assign(name, raw) => {
                let option = resolve(name)?;
                if option.is_bool() {
                    return Err(invalid(format!("{name}={raw}")));
                }
                let value: usize = raw.parse().map_err(|_| invalid(format!("{name}={raw}")))?;
                Ok(if std::mem::replace(&mut self.history, value) == value {
                    SetOutcome::Unchanged
                } else {
                    SetOutcome::Changed(option)
                })
            }
        }
    }
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}
