//! Terminal output helpers shared by the CLI commands.

use std::io::IsTerminal;

/// Whether `--quiet` was given (propagated via env so any module can check).
pub fn is_quiet() -> bool {
    std::env::var_os("SYLLABO_QUIET").is_some()
}

fn color_enabled() -> bool {
    if std::env::var_os("SYLLABO_NO_COLOR").is_some() || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

/// ANSI status symbols with a plain-text fallback for pipes and NO_COLOR.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self {
            color: color_enabled(),
        }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m✓\x1b[0m"
        } else {
            "[OK]"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m!\x1b[0m"
        } else {
            "[!!]"
        }
    }

    pub fn err_sym(&self) -> &'static str {
        if self.color {
            "\x1b[31m✗\x1b[0m"
        } else {
            "[XX]"
        }
    }

    pub fn info_sym(&self) -> &'static str {
        if self.color {
            "\x1b[36m·\x1b[0m"
        } else {
            "[..]"
        }
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
