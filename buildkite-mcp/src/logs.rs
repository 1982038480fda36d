//! Job log normalization and paging
//!
//! Raw Buildkite job logs are terminal output: ANSI colour codes, OSC
//! hyperlinks, `_bk;t=` timestamp markers and carriage-return progress bars.
//! [`normalize_log`] reduces them to the plain lines a reader would see, and
//! the paging helpers slice those lines for the log tools.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// CSI sequences, string sequences (OSC, DCS, SOS, PM and APC, which carries
/// the `_bk;t=` timestamps) ended by BEL or ST, and two character escapes
const ESCAPE_PATTERN: &str = r"\x1b(?:\[[\x30-\x3f]*[\x20-\x2f]*[\x40-\x7e]?|[\]PX^_][^\x07\x1b]*(?:\x07|\x1b\\)?|[^\[\]PX^_]|$)";

fn escape_regex() -> &'static Regex {
    static ESCAPES: OnceLock<Regex> = OnceLock::new();
    ESCAPES.get_or_init(|| Regex::new(ESCAPE_PATTERN).expect("escape pattern is a valid regex"))
}

/// Remove terminal escape sequences and resolve carriage-return overwrites
pub fn strip_terminal_escapes(input: &str) -> String {
    let without_escapes = escape_regex().replace_all(input, "");
    without_escapes
        .split('\n')
        .map(resolve_carriage_returns)
        .collect::<Vec<_>>()
        .join("\n")
}

fn resolve_carriage_returns(line: &str) -> String {
    if !line.contains('\r') {
        return line.to_string();
    }

    let mut screen: Vec<char> = Vec::new();
    for segment in line.split('\r') {
        for (column, c) in segment.chars().enumerate() {
            if column < screen.len() {
                screen[column] = c;
            } else {
                screen.push(c);
            }
        }
    }
    screen.into_iter().collect()
}

/// Normalize a raw job log into display lines.
///
/// A trailing newline does not produce an empty final line.
pub fn normalize_log(raw: &str) -> Vec<String> {
    let clean = strip_terminal_escapes(raw);
    let clean = clean.strip_suffix('\n').unwrap_or(&clean);
    if clean.is_empty() {
        return Vec::new();
    }
    clean.split('\n').map(str::to_string).collect()
}

/// A single log line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// 1-based position in the normalized log
    pub line_number: usize,
    /// Line text without escapes
    pub text: String,
}

/// A window of log lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogPage {
    /// Lines in the window
    pub lines: Vec<LogLine>,
    /// Number of lines in the whole log
    pub total_lines: usize,
    /// 0-based index of the first line in the window
    pub offset: usize,
    /// Whether lines remain after the window
    pub has_more: bool,
}

fn page(lines: &[String], offset: usize, limit: usize) -> LogPage {
    let total_lines = lines.len();
    let start = offset.min(total_lines);
    let end = start.saturating_add(limit).min(total_lines);

    LogPage {
        lines: lines[start..end]
            .iter()
            .enumerate()
            .map(|(i, text)| LogLine {
                line_number: start + i + 1,
                text: text.clone(),
            })
            .collect(),
        total_lines,
        offset: start,
        has_more: end < total_lines,
    }
}

/// Read `limit` lines starting at the 0-based `offset`
pub fn read_lines(lines: &[String], offset: usize, limit: usize) -> LogPage {
    page(lines, offset, limit)
}

/// The last `count` lines
pub fn tail_lines(lines: &[String], count: usize) -> LogPage {
    let offset = lines.len().saturating_sub(count);
    page(lines, offset, count)
}

/// Options for [`search_lines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSearchOptions {
    /// Regular expression to look for
    pub pattern: String,
    /// Match case exactly
    pub case_sensitive: bool,
    /// Return lines that do not match instead
    pub invert_match: bool,
    /// Lines of context before and after each match
    pub context: usize,
    /// Maximum number of matches
    pub limit: usize,
}

impl LogSearchOptions {
    /// Case-insensitive search with no context and a limit of 100 matches
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
            invert_match: false,
            context: 0,
            limit: 100,
        }
    }
}

/// A matching line with surrounding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMatch {
    /// 1-based line number of the match
    pub line_number: usize,
    /// The matching line
    pub text: String,
    /// Context lines before the match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before: Vec<LogLine>,
    /// Context lines after the match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<LogLine>,
}

/// Search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSearchResult {
    /// Matches in log order
    pub matches: Vec<LogMatch>,
    /// Number of lines searched
    pub total_lines: usize,
    /// Whether the limit cut the search short
    pub truncated: bool,
}

/// Find lines matching a regular expression.
///
/// # Errors
///
/// Returns an error if the pattern is not a valid regular expression.
pub fn search_lines(
    lines: &[String],
    options: &LogSearchOptions,
) -> Result<LogSearchResult, regex::Error> {
    let regex = if options.case_sensitive {
        Regex::new(&options.pattern)
    } else {
        Regex::new(&format!("(?i){}", options.pattern))
    }?;

    let context_line = |index: usize| LogLine {
        line_number: index + 1,
        text: lines[index].clone(),
    };

    let mut matches = Vec::new();
    let mut truncated = false;

    for (index, line) in lines.iter().enumerate() {
        if regex.is_match(line) == options.invert_match {
            continue;
        }
        if matches.len() >= options.limit {
            truncated = true;
            break;
        }

        let before_start = index.saturating_sub(options.context);
        let after_end = index
            .saturating_add(options.context)
            .saturating_add(1)
            .min(lines.len());

        matches.push(LogMatch {
            line_number: index + 1,
            text: line.clone(),
            before: (before_start..index).map(context_line).collect(),
            after: (index + 1..after_end).map(context_line).collect(),
        });
    }

    Ok(LogSearchResult {
        matches,
        total_lines: lines.len(),
        truncated,
    })
}
