/// Marker that opens or closes a fenced code block.
pub const CODE_FENCE: &str = "```";

/// Lead characters of an interactive prompt line (followed by a space).
pub const PROMPT_LEADS: [char; 5] = ['>', '$', '❯', '%', '#'];

const ERROR_KEYWORDS: [&str; 6] = ["error", "err", "fatal", "exception", "panic", "failed"];
const WARNING_KEYWORDS: [&str; 3] = ["warning", "warn", "caution"];
const INFO_KEYWORDS: [&str; 3] = ["info", "note", "hint"];

/// Base styling category of a transcript line.
///
/// Variants are listed in priority order; [`HighlightClass::classify`]
/// returns the first one that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightClass {
    CodeFence,
    Prompt,
    Error,
    Warning,
    Info,
    Plain,
}

impl HighlightClass {
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim_start();
        if trimmed.starts_with(CODE_FENCE) {
            return HighlightClass::CodeFence;
        }
        if is_prompt(line) {
            return HighlightClass::Prompt;
        }
        if starts_with_keyword(trimmed, &ERROR_KEYWORDS) {
            return HighlightClass::Error;
        }
        if starts_with_keyword(trimmed, &WARNING_KEYWORDS) {
            return HighlightClass::Warning;
        }
        if starts_with_keyword(trimmed, &INFO_KEYWORDS) || is_bracket_tag(trimmed) {
            return HighlightClass::Info;
        }
        HighlightClass::Plain
    }
}

fn is_prompt(line: &str) -> bool {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(lead), Some(' ')) => PROMPT_LEADS.contains(&lead),
        _ => false,
    }
}

/// Case-insensitive keyword prefix that ends at a word boundary, so `err:`
/// and `Error` match but `errand` does not. Plurals are words of their own:
/// `Errors: 0` and `warnings: 2` stay plain.
fn starts_with_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        let Some(head) = text.get(..keyword.len()) else {
            return false;
        };
        if !head.eq_ignore_ascii_case(keyword) {
            return false;
        }
        text[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |next| !next.is_alphanumeric() && next != '_')
    })
}

fn is_bracket_tag(text: &str) -> bool {
    let Some(rest) = text.strip_prefix('[') else {
        return false;
    };
    match rest.find(']') {
        Some(close) => close > 0 && !rest[..close].contains(char::is_whitespace),
        None => false,
    }
}
