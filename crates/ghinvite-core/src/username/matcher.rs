//! Individual username heuristics, each a pure matcher over the message text

use once_cell::sync::Lazy;
use regex::Regex;

/// GitHub's username length ceiling
pub const MAX_USERNAME_LEN: usize = 39;

/// Shortest token the fallback scan will accept
pub const MIN_FALLBACK_LEN: usize = 2;

static LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[gG]it[hH]ub:?\s+@?([a-zA-Z0-9_-]+)").expect("valid labeled regex")
});

static QUALIFIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[gG]it[hH]ub\s+username:?\s+@?([a-zA-Z0-9_-]+)").expect("valid qualified regex")
});

static SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@?([a-zA-Z0-9_-]+)\s+on\s+[gG]it[hH]ub").expect("valid suffix regex")
});

static PROFILE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([a-zA-Z0-9_-]+)").expect("valid profile url regex"));

/// One username heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// `GitHub: name`, `github @name`
    Labeled,
    /// `GitHub username: name`
    Qualified,
    /// `@name on GitHub`
    Suffix,
    /// `github.com/name`
    ProfileUrl,
    /// First username-shaped word
    Fallback,
}

impl Heuristic {
    /// Evaluation order; the first heuristic with a capture wins
    pub const ORDER: [Heuristic; 5] = [
        Heuristic::Labeled,
        Heuristic::Qualified,
        Heuristic::Suffix,
        Heuristic::ProfileUrl,
        Heuristic::Fallback,
    ];

    /// Stable name for logs and CLI output
    pub const fn as_str(&self) -> &'static str {
        match self {
            Heuristic::Labeled => "labeled",
            Heuristic::Qualified => "qualified",
            Heuristic::Suffix => "suffix",
            Heuristic::ProfileUrl => "profile_url",
            Heuristic::Fallback => "fallback",
        }
    }

    /// Run this heuristic alone, borrowing the capture from `text`
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        match self {
            Heuristic::Labeled => first_group(&LABELED, text),
            Heuristic::Qualified => first_group(&QUALIFIED, text),
            Heuristic::Suffix => first_group(&SUFFIX, text),
            Heuristic::ProfileUrl => first_group(&PROFILE_URL, text),
            Heuristic::Fallback => fallback_scan(text),
        }
    }
}

fn first_group<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

/// Characters GitHub allows in a login
#[inline]
pub const fn is_username_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Whole-token check used by the fallback scan
#[inline]
pub fn is_username_shaped(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(is_username_char)
}

/// Word separators of the fallback scan.
///
/// Unicode whitespace plus the byte-order mark, minus NEL (U+0085).
fn is_word_separator(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Left-to-right scan for the first word that looks like a username.
///
/// Strips a single leading `@` and requires 2..=39 characters. Common
/// words such as "add" also qualify.
fn fallback_scan(text: &str) -> Option<&str> {
    text.split(is_word_separator)
        .filter(|word| !word.is_empty())
        .map(|word| word.strip_prefix('@').unwrap_or(word))
        .find(|word| {
            is_username_shaped(word)
                && (MIN_FALLBACK_LEN..=MAX_USERNAME_LEN).contains(&word.len())
        })
}
