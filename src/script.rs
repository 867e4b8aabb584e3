// SPDX-License-Identifier: MIT
//
// Script runner — drives an editing session one line at a time.
//
// A script line is one of:
//
//   :{command}               an editor or mark command
//   <Plug>{action}           a mark mapping (MarkSet, MarkSearchAnyNext, ...)
//   goto {line} {col}        move the cursor (1-based)
//   vmark {l1} {c1} {l2} {c2}  mark a charwise visual selection (inclusive)
//   "...                     a comment
//
// Every window or tab change is followed by the matching mark lifecycle
// hook, the way the editor's autocommands would fire them.

use anyhow::{Context, Result, anyhow, bail};
use n_editor::Editor;
use n_editor::buffer::Buffer;
use n_editor::command::{Command, parse_command};
use n_editor::options::{OptionName, SetOutcome, parse_set};
use n_editor::position::Position;
use n_editor::split::Orientation;
use n_mark::search::Direction;
use n_mark::{MarkConfig, Marks, Outcome};
use tracing::debug;

use crate::host::EditorHost;

// ─── Plug actions ───────────────────────────────────────────────────────────

/// The `<Plug>` mappings of the mark commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlugAction {
    MarkSet,
    MarkAllClear,
    MarkToggle,
    SearchCurrent(Direction),
    SearchAny(Direction),
}

impl PlugAction {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "MarkSet" => Self::MarkSet,
            "MarkAllClear" => Self::MarkAllClear,
            "MarkToggle" => Self::MarkToggle,
            "MarkSearchCurrentNext" => Self::SearchCurrent(Direction::Forward),
            "MarkSearchCurrentPrev" => Self::SearchCurrent(Direction::Backward),
            "MarkSearchAnyNext" => Self::SearchAny(Direction::Forward),
            "MarkSearchAnyPrev" => Self::SearchAny(Direction::Backward),
            _ => return None,
        })
    }
}

// ─── Session ────────────────────────────────────────────────────────────────

/// An editor plus its mark state, and the messages shown so far.
pub struct Session {
    editor: Editor,
    marks: Marks,
    messages: Vec<String>,
}

impl Session {
    pub fn new(editor: Editor, config: MarkConfig) -> Self {
        Self {
            editor,
            marks: Marks::new(config),
            messages: Vec::new(),
        }
    }

    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    pub const fn marks(&self) -> &Marks {
        &self.marks
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Run every line of `script`.
    pub fn run_script(&mut self, script: &str) {
        for line in script.lines() {
            self.run_line(line);
        }
    }

    /// Run one line. Failures are reported as messages, like the editor's
    /// command line does.
    pub fn run_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('"') {
            return;
        }
        debug!(line, "script");
        if let Err(err) = self.execute(line) {
            self.messages.push(format!("{err:#}"));
        }
    }

    fn say(&mut self, msg: impl ToString) {
        self.messages.push(msg.to_string());
    }

    fn execute(&mut self, line: &str) -> Result<()> {
        if let Some(cmd) = line.strip_prefix(':') {
            self.editor.record_command(cmd);
            let command = parse_command(cmd)?;
            return self.execute_command(command);
        }
        if let Some(name) = line.strip_prefix("<Plug>") {
            let action = PlugAction::parse(name).ok_or_else(|| anyhow!("unknown mapping: <Plug>{name}"))?;
            return self.execute_plug(action);
        }

        let mut words = line.split_whitespace();
        match words.next() {
            Some("goto") => {
                let [l, c] = numbers(words)?;
                self.editor.set_cursor(Position::new(l, c));
                Ok(())
            }
            Some("vmark") => {
                let [l1, c1, l2, c2] = numbers(words)?;
                let text = selection_text(
                    self.editor.buffer(),
                    Position::new(l1, c1),
                    Position::new(l2, c2),
                );
                let mut host = EditorHost::new(&mut self.editor);
                let outcome = self.marks.mark_literal(&mut host, &text)?;
                self.say(&outcome);
                Ok(())
            }
            _ => bail!("unknown script line: {line}"),
        }
    }

    fn execute_plug(&mut self, action: PlugAction) -> Result<()> {
        let mut host = EditorHost::new(&mut self.editor);
        let outcome = match action {
            PlugAction::MarkSet => self.marks.mark_current_word(&mut host)?,
            PlugAction::MarkAllClear => self.marks.clear_all(&mut host),
            PlugAction::MarkToggle => self.marks.toggle_visibility(&mut host)?,
            PlugAction::SearchCurrent(dir) => self.marks.search_current_mark(&mut host, dir),
            PlugAction::SearchAny(dir) => self.marks.search_any_mark(&mut host, dir),
        };
        self.say(&outcome);
        Ok(())
    }

    fn execute_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Mark(pattern) => {
                let mut host = EditorHost::new(&mut self.editor);
                let outcome = self
                    .marks
                    .mark_explicit(&mut host, pattern.as_deref().unwrap_or_default())?;
                self.say(&outcome);
            }
            Command::MarkClear => {
                let outcome = self.marks.clear_all(&mut EditorHost::new(&mut self.editor));
                self.say(&outcome);
            }
            Command::Marks => {
                let entries = self.marks.list();
                if entries.is_empty() {
                    self.say(&Outcome::NoMarks);
                }
                for entry in entries {
                    self.say(format!("{:<10} {}", entry.group, entry.pattern));
                }
            }
            Command::Split | Command::VSplit => {
                let orientation = if command == Command::Split {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                self.editor.split(orientation);
                self.view_entered();
            }
            Command::Close => {
                let tabs = self.editor.tab_count();
                let closed = self.editor.close()?;
                self.marks.on_view_closed(closed);
                if self.editor.tab_count() == tabs {
                    self.view_entered();
                } else {
                    self.tab_entered();
                }
            }
            Command::WinCycle { forward } => {
                self.editor.cycle_window(forward);
                self.view_entered();
            }
            Command::TabNew => {
                self.editor.tab_new();
                self.tab_entered();
            }
            Command::TabNext | Command::TabPrev => {
                if self.editor.tab_cycle(command == Command::TabNext) {
                    self.tab_entered();
                }
            }
            Command::Set(args) => self.set_options(&args)?,
            Command::Highlight { group, bg } => {
                self.editor.groups_mut().define(&group, bg);
                self.marks
                    .on_color_scheme_changed(&mut EditorHost::new(&mut self.editor));
            }
            Command::HighlightClear(group) => {
                if !self.editor.groups_mut().clear(&group) {
                    bail!("E411: Highlight group not found: {group}");
                }
                self.marks
                    .on_color_scheme_changed(&mut EditorHost::new(&mut self.editor));
            }
        }
        Ok(())
    }

    fn set_options(&mut self, args: &str) -> Result<()> {
        for directive in parse_set(args) {
            match self.editor.apply_option(&directive)? {
                SetOutcome::Changed(OptionName::IgnoreCase) => {
                    self.marks
                        .on_ignore_case_changed(&mut EditorHost::new(&mut self.editor));
                }
                SetOutcome::Show(text) => self.say(text),
                SetOutcome::Changed(_) | SetOutcome::Unchanged => {}
            }
        }
        Ok(())
    }

    fn view_entered(&mut self) {
        self.marks.on_view_entered(&mut EditorHost::new(&mut self.editor));
    }

    fn tab_entered(&mut self) {
        self.marks.on_tab_entered(&mut EditorHost::new(&mut self.editor));
    }
}

/// Parse `N` 1-based numbers into 0-based positions.
fn numbers<'a, const N: usize>(mut words: impl Iterator<Item = &'a str>) -> Result<[usize; N]> {
    let mut out = [0; N];
    for slot in &mut out {
        let word = words.next().context("missing argument")?;
        let n: usize = word
            .parse()
            .ok()
            .with_context(|| format!("not a number: {word}"))?;
        *slot = n.saturating_sub(1);
    }
    if let Some(extra) = words.next() {
        bail!("E488: Trailing characters: {extra}");
    }
    Ok(out)
}

/// The text of a charwise selection from `start` to `end`, both inclusive.
fn selection_text(buffer: &Buffer, start: Position, end: Position) -> String {
    let (start, end) = if end < start { (end, start) } else { (start, end) };
    let mut parts = Vec::new();
    for l in start.line..=end.line {
        let Some(line) = buffer.line(l) else { break };
        let from = if l == start.line { start.col } else { 0 };
        let to = if l == end.line { end.col + 1 } else { usize::MAX };
        parts.push(line.chars().skip(from).take(to.saturating_sub(from)).collect::<String>());
    }
    parts.join("\n")
}

// ─── Tests ──────────────────────────────────────────────────────────────────
