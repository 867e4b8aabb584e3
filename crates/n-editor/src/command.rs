//! Command-line commands — parsing what follows the `:`.
//!
//! # Supported commands
//!
//! | Command                          | Action                                   |
//! |----------------------------------|------------------------------------------|
//! | `:Mark`                          | Toggle mark visibility                   |
//! | `:Mark {pattern}`                | Mark / unmark `pattern`                  |
//! | `:MarkClear`                     | Remove every mark                        |
//! | `:Marks`                         | List marks                               |
//! | `:sp[lit]` / `:vs[plit]`         | Split the current window                 |
//! | `:clo[se]`                       | Close the current window                 |
//! | `:wincmd w` / `:wincmd W`        | Next / previous window                   |
//! | `:tabnew`                        | Open a tab page                          |
//! | `:tabn[ext]` / `:tabp[revious]`  | Next / previous tab page                 |
//! | `:se[t] {args}`                  | Options (see [`crate::options`])         |
//! | `:hi[ghlight] {group} guibg=#rgb`| Define a highlight group                 |
//! | `:hi[ghlight] clear {group}`     | Remove a highlight group                 |
//!
//! Commands are parsed into a [`Command`]; the caller executes it.

use thiserror::Error;

use crate::highlight::Rgb;

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:Mark [pattern]`. `None` toggles visibility.
    Mark(Option<String>),
    MarkClear,
    Marks,
    Split,
    VSplit,
    Close,
    /// `:wincmd w` (`true`) or `:wincmd W` (`false`).
    WinCycle { forward: bool },
    TabNew,
    TabNext,
    TabPrev,
    /// `:set` with its raw arguments.
    Set(String),
    Highlight { group: String, bg: Rgb },
    HighlightClear(String),
}

/// Why a command line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("E492: Not an editor command: {0}")]
    NotACommand(String),
    #[error("E488: Trailing characters: {0}")]
    TrailingCharacters(String),
    #[error("E471: Argument required")]
    ArgumentRequired,
    #[error("E475: Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Does `word` abbreviate `full` with at least `min` chars (`:sp` for
/// `:split`)?
fn abbrev(word: &str, full: &str, min: usize) -> bool {
    word.len() >= min && full.starts_with(word)
}

/// Parse a command line (without the leading `:`).
///
/// # Errors
///
/// [`ParseError`] for unknown commands and bad arguments.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim_start().trim_start_matches(':').trim();
    let (cmd, arg) = trimmed
        .find(char::is_whitespace)
        .map_or((trimmed, ""), |pos| (&trimmed[..pos], trimmed[pos..].trim_start()));

    let no_arg = |command: Command| {
        if arg.is_empty() {
            Ok(command)
        } else {
            Err(ParseError::TrailingCharacters(arg.to_string()))
        }
    };

    match cmd {
        "Mark" => Ok(Command::Mark(Some(arg.to_string()).filter(|a| !a.is_empty()))),
        "MarkClear" => no_arg(Command::MarkClear),
        "Marks" => no_arg(Command::Marks),
        "tabnew" => no_arg(Command::TabNew),
        "wincmd" => match arg {
            "w" => Ok(Command::WinCycle { forward: true }),
            "W" => Ok(Command::WinCycle { forward: false }),
            "" => Err(ParseError::ArgumentRequired),
            other => Err(ParseError::InvalidArgument(other.to_string())),
        },
        c if abbrev(c, "split", 2) => no_arg(Command::Split),
        c if abbrev(c, "vsplit", 2) => no_arg(Command::VSplit),
        c if abbrev(c, "close", 3) => no_arg(Command::Close),
        c if abbrev(c, "tabnext", 4) => no_arg(Command::TabNext),
        c if abbrev(c, "tabprevious", 4) || c == "tabNext" => no_arg(Command::TabPrev),
        c if abbrev(c, "set", 2) => Ok(Command::Set(arg.to_string())),
        c if abbrev(c, "highlight", 2) => parse_highlight(arg),
        "" => Err(ParseError::NotACommand(String::new())),
        _ => Err(ParseError::NotACommand(trimmed.to_string())),
    }
}

/// `{group} guibg=#rrggbb` or `clear {group}`.
fn parse_highlight(arg: &str) -> Result<Command, ParseError> {
    let mut words = arg.split_whitespace();
    let group = words.next().ok_or(ParseError::ArgumentRequired)?;
    if group == "clear" {
        let name = words.next().ok_or(ParseError::ArgumentRequired)?;
        return match words.next() {
            None => Ok(Command::HighlightClear(name.to_string())),
            Some(extra) => Err(ParseError::TrailingCharacters(extra.to_string())),
        };
    }

    let mut bg = None;
    for attr in words {
        let (key, value) = attr
            .split_once('=')
            .ok_or_else(|| ParseError::InvalidArgument(attr.to_string()))?;
        match key {
            "guibg" | "ctermbg" => {
                bg = Some(Rgb::hex(value).ok_or_else(|| ParseError::InvalidArgument(attr.to_string()))?);
            }
            // Foreground and attributes are accepted and ignored.
            "guifg" | "ctermfg" | "gui" | "cterm" | "term" => {}
            _ => return Err(ParseError::InvalidArgument(attr.to_string())),
        }
    }
    let bg = bg.ok_or(ParseError::ArgumentRequired)?;
    Ok(Command::Highlight {
        group: group.to_string(),
        bg,
    })
}
