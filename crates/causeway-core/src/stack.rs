//! Stack trace helpers: frame filtering and `Caused by:` joining.

use serde::{Deserialize, Serialize};

/// Separator placed before each cause's stack in a display stack.
pub const CAUSED_BY: &str = "Caused by: ";

/// Removes frames that point into this library, the standard library, or
/// third-party dependencies. Only frame lines are candidates; headers and
/// `Caused by:` lines are always kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFilter {
    /// Substrings that mark a frame as internal.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_patterns() -> Vec<String> {
    [
        "/.cargo/registry/",
        "/.cargo/git/",
        "/rustc/",
        "causeway_core::",
        "causeway_json::",
        "causeway-core/src/",
        "causeway-json/src/",
        "std::backtrace",
        "node_modules",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Default for StackFilter {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl StackFilter {
    pub fn new(exclude_patterns: Vec<String>) -> Self {
        Self { exclude_patterns }
    }

    /// A filter that keeps every line.
    pub fn keep_all() -> Self {
        Self::new(Vec::new())
    }

    /// `true` if `line` is a frame that matches one of the exclude patterns.
    pub fn is_internal(&self, line: &str) -> bool {
        is_frame_line(line) && self.exclude_patterns.iter().any(|p| line.contains(p.as_str()))
    }

    /// Drop internal frames, keeping every other line verbatim.
    pub fn clean(&self, stack: &str) -> String {
        stack
            .lines()
            .filter(|line| !self.is_internal(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Frame lines look like `"  12: some::function"`, `"      at src/x.rs:1:2"`
/// (Rust backtraces) or `"    at fn (file:1:2)"` (foreign traces).
fn is_frame_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with("at ") {
        return true;
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && trimmed[digits..].starts_with(':')
}

/// `"<Name>: <message>"`, or just the name when the message is empty.
pub fn synthetic_header(name: &str, message: &str) -> String {
    if message.is_empty() {
        name.to_string()
    } else {
        format!("{name}: {message}")
    }
}

/// Append `cause` below `own`, separated by a `Caused by:` line.
pub fn join_caused_by(own: &str, cause: &str) -> String {
    format!("{own}\n{CAUSED_BY}{cause}")
}

/// `true` if `own` already holds `cause` as a whole `Caused by:` segment,
/// i.e. after a separator line and followed by the end or a newline.
pub fn has_caused_by(own: &str, cause: &str) -> bool {
    let segment = format!("\n{CAUSED_BY}{cause}");
    own.match_indices(&segment).any(|(at, _)| {
        let rest = &own[at + segment.len()..];
        rest.is_empty() || rest.starts_with('\n')
    })
}
