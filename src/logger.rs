//! Logging utilities with colored output.
//!
//! Every line is written as `[module] message`, where the module prefix is
//! colored by kind so failures stand out in a long batch.
//!
//! # Example
//!
//! ```ignore
//! log!("dropdown"; "updated {}", path.display());
//! log!("error"; "{err}");
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Total prefix length for a module name.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
///
/// Long single-line messages are truncated to fit terminal width, except
/// `error` lines, which are always printed whole.
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();

    let max_msg_len = width.saturating_sub(calc_prefix_len(module.len()));
    writeln!(stdout, "{prefix} {}", fit_message(&module_lower, message, max_msg_len)).ok();

    stdout.flush().ok();
}

/// Text actually printed for `message` on a line with `max_len` columns left.
#[inline]
fn fit_message<'a>(module_lower: &str, message: &'a str, max_len: usize) -> &'a str {
    if module_lower == "error" || message.contains('\n') {
        message
    } else {
        truncate_str(message, max_len)
    }
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "summary" => prefix.bright_green().bold(),
        "versions" => prefix.bright_blue().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_str_char_boundary() {
        // "é" is two bytes; cutting in the middle must step back
        assert_eq!(truncate_str("aé", 2), "a");
    }

    #[test]
    fn test_fit_message() {
        let long = "x".repeat(200);
        assert_eq!(fit_message("dropdown", &long, 112).len(), 112);
        assert_eq!(fit_message("error", &long, 112), long);
        assert_eq!(fit_message("banner", "a\nb", 1), "a\nb");
    }

    #[test]
    fn test_calc_prefix_len() {
        // "[dropdown] "
        assert_eq!(calc_prefix_len("dropdown".len()), 11);
    }
}
