// SPDX-License-Identifier: MIT
//
// Plain-text rendering of the current tab page.
//
// Each window gets a header line with its id and screen rectangle, then the
// buffer lines painted with the window's matches:
//
//   ── window 2* (41,0 39x24) ──
//     1 foo bar baz
//     2 bar foo qux
//
// `*` marks the current window. Mark colors are emitted as 24-bit SGR
// background sequences; with color off the text is printed bare.

use std::io::{self, Write};

use n_editor::Editor;
use n_editor::highlight::Rgb;
use n_editor::split::{Rect, WinId};

/// Rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
}

// ─── SGR ────────────────────────────────────────────────────────────────────

fn bg(w: &mut impl Write, color: Rgb) -> io::Result<()> {
    let Rgb(r, g, b) = color;
    write!(w, "\x1b[48;2;{r};{g};{b}m")
}

fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Windows ────────────────────────────────────────────────────────────────

fn header(w: &mut impl Write, id: WinId, rect: Rect, current: bool) -> io::Result<()> {
    let star = if current { "*" } else { "" };
    writeln!(
        w,
        "── window {id}{star} ({},{} {}x{}) ──",
        rect.x, rect.y, rect.w, rect.h
    )
}

/// Write `line` with runs of equal color wrapped in SGR sequences.
fn painted_line(w: &mut impl Write, line: &str, colors: &[Option<Rgb>]) -> io::Result<()> {
    let mut active = None;
    for (ch, &color) in line.chars().zip(colors) {
        if color != active {
            match color {
                Some(c) => bg(w, c)?,
                None => reset(w)?,
            }
            active = color;
        }
        write!(w, "{ch}")?;
    }
    if active.is_some() {
        reset(w)?;
    }
    Ok(())
}

fn window(w: &mut impl Write, editor: &Editor, id: WinId, opts: RenderOptions) -> io::Result<()> {
    let Some(win) = editor.window(id) else {
        return Ok(());
    };
    let buffer = editor.buffer();
    let width = buffer.line_count().max(1).to_string().len().max(3);
    for i in 0..buffer.line_count() {
        let line = buffer.line(i).unwrap_or_default();
        if editor.options().number {
            write!(w, "{:>width$} ", i + 1)?;
        }
        if opts.color {
            let colors = win.matches.paint_line(editor.matcher(), editor.groups(), &line);
            painted_line(w, &line, &colors)?;
        } else {
            w.write_all(line.as_bytes())?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Render every window of the current tab page, in layout order.
pub fn render(w: &mut impl Write, editor: &Editor, opts: RenderOptions) -> io::Result<()> {
    let current = editor.current_window();
    for (id, rect) in editor.layout() {
        header(w, id, rect, id == current)?;
        window(w, editor, id, opts)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use n_editor::buffer::Buffer;
    use n_editor::highlight::HighlightGroups;
    use n_editor::split::Orientation;
    use pretty_assertions::assert_eq;

    const RED: Rgb = Rgb(255, 0, 0);

    fn editor(text: &str) -> Editor {
        Editor::new(Buffer::from_text(text), HighlightGroups::with_mark_colors(&[RED]))
    }

    fn emit(editor: &Editor, color: bool) -> String {
        let mut out = Vec::new();
        render(&mut out, editor, RenderOptions { color }).unwrap();
        String::from_utf8(out).unwrap()
    }

    // -- painting ------------------------------------------------------------

    #[test]
    fn runs_are_wrapped_once() {
        let mut out = Vec::new();
        let colors = [None, Some(RED), Some(RED), None];
        painted_line(&mut out, "abcd", &colors).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a\x1b[48;2;255;0;0mbc\x1b[0md"
        );
    }

    #[test]
    fn color_at_line_end_is_reset() {
        let mut out = Vec::new();
        painted_line(&mut out, "ab", &[None, Some(RED)]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\x1b[48;2;255;0;0mb\x1b[0m");
    }

    // -- windows -------------------------------------------------------------

    #[test]
    fn one_window() {
        let mut ed = editor("foo bar\n");
        ed.match_add(1, "MarkWord1", "bar", -1);
        assert_eq!(
            emit(&ed, true),
            "── window 1* (0,0 80x24) ──\nfoo \x1b[48;2;255;0;0mbar\x1b[0m\n"
        );
        assert_eq!(emit(&ed, false), "── window 1* (0,0 80x24) ──\nfoo bar\n");
    }

    #[test]
    fn split_windows_in_layout_order() {
        let mut ed = editor("x\n");
        ed.split(Orientation::Vertical);
        assert_eq!(
            emit(&ed, false),
            "── window 1 (0,0 40x24) ──\nx\n── window 2* (41,0 39x24) ──\nx\n"
        );
    }

    #[test]
    fn line_numbers() {
        let mut ed = editor("a\nb\n");
        ed.set_number(true);
        assert_eq!(emit(&ed, false), "── window 1* (0,0 80x24) ──\n  1 a\n  2 b\n");
    }
}
