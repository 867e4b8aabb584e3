//! Registers — the read-only registers marking touches.
//!
//! - **Last search (`"/`)**: the pattern `n`/`N` repeat. Marking the word
//!   under the cursor writes it here, like `*` does.
//! - **Last command (`":`)**: the most recent `:` command line.
//!
//! Any other name reads as empty.

/// The `/` and `:` registers.
#[derive(Debug, Clone, Default)]
pub struct Registers {
    search: String,
    command: String,
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            search: String::new(),
            command: String::new(),
        }
    }

    /// Store the last search pattern.
    pub fn set_search(&mut self, pattern: &str) {
        pattern.clone_into(&mut self.search);
    }

    /// Store the last command line (without the leading `:`).
    pub fn set_command(&mut self, line: &str) {
        line.clone_into(&mut self.command);
    }

    /// Contents of register `name`.
    #[must_use]
    pub fn get(&self, name: char) -> &str {
        match name {
            '/' => &self.search,
            ':' => &self.command,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registers_are_empty() {
        let regs = Registers::new();
        assert_eq!(regs.get('/'), "");
        assert_eq!(regs.get(':'), "");
    }

    #[test]
    fn search_register() {
        let mut regs = Registers::new();
        regs.set_search("\\<foo\\>");
        assert_eq!(regs.get('/'), "\\<foo\\>");
        regs.set_search("bar");
        assert_eq!(regs.get('/'), "bar");
    }

    #[test]
    fn command_register() {
        let mut regs = Registers::new();
        regs.set_command("Mark foo");
        assert_eq!(regs.get(':'), "Mark foo");
        assert_eq!(regs.get('/'), "");
    }

    #[test]
    fn unknown_name_is_empty() {
        let mut regs = Registers::new();
        regs.set_search("x");
        assert_eq!(regs.get('a'), "");
    }
}
