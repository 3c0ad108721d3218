//! Extractive summarisation: keep the leading sentences of a section.

use serde::{Deserialize, Serialize};

/// Sentences kept per section unless configured otherwise
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// Lowercased abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "etc.", "mr.", "mrs.", "ms.", "dr.", "vs.", "no.", "inc.", "ltd.", "approx.",
];

const TERMINATORS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}'];

/// Summary of a single document section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    /// Section name
    pub name: String,
    /// Leading sentences of the section text, verbatim
    pub summary: String,
}

impl SectionSummary {
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }

    /// Check if the section produced any text
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }
}

/// Split text into sentences.
///
/// Each returned slice keeps its trailing whitespace, so concatenating the
/// slices reproduces the input exactly.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        let boundary = if TERMINATORS.contains(&c) {
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if TERMINATORS.contains(&next) || CLOSERS.contains(&next) {
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let at_break = text[end..].chars().next().map_or(true, char::is_whitespace);
            at_break && !(c == '.' && is_abbreviation(&text[start..end]))
        } else if c == '\n' {
            text[idx + 1..]
                .trim_start_matches([' ', '\t', '\r'])
                .starts_with('\n')
        } else {
            false
        };

        if !boundary {
            continue;
        }

        while let Some(&(_, next)) = chars.peek() {
            if next.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }
        let end = chars.peek().map(|&(i, _)| i).unwrap_or(text.len());
        if !text[start..end].trim().is_empty() {
            sentences.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        if text[start..].trim().is_empty() {
            // Leftover whitespace belongs to the last sentence.
            if let Some(last) = sentences.pop() {
                let from = text.len() - text[start..].len() - last.len();
                sentences.push(&text[from..]);
            }
        } else {
            sentences.push(&text[start..]);
        }
    }

    sentences
}

/// Whether the word ending a candidate sentence is an abbreviation, an
/// initial or a list marker rather than the end of a sentence.
fn is_abbreviation(candidate: &str) -> bool {
    let last = candidate.split_whitespace().last().unwrap_or("");
    let prefix = &candidate[..candidate.len() - last.len()];
    let word = last.trim_start_matches(['(', '[', '"', '\'']);

    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) || is_dotted_lowercase(word) {
        return true;
    }

    let mut chars = word.chars();
    let initial = matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(initial), Some('.'), None) if initial.is_alphabetic() && initial.is_uppercase()
    );
    initial || (at_line_start(prefix) && is_list_label(word))
}

/// `a.m.`, `p.m.` and similar lowercase tokens with inner periods
fn is_dotted_lowercase(word: &str) -> bool {
    let body = word.strip_suffix('.').unwrap_or(word);
    body.contains('.')
        && body
            .chars()
            .all(|c| c == '.' || (c.is_alphabetic() && c.is_lowercase()))
}

/// `1.`, `12.` or `a.` opening a numbered or lettered list item
fn is_list_label(word: &str) -> bool {
    let Some(label) = word.strip_suffix('.') else {
        return false;
    };
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => true,
        (Some(_), _) => label.chars().all(|c| c.is_ascii_digit()),
        (None, _) => false,
    }
}

/// Nothing but whitespace since the sentence start or the last line break
fn at_line_start(prefix: &str) -> bool {
    let line = prefix.rsplit('\n').next().unwrap_or(prefix);
    line.trim().is_empty()
}

/// Reduce text to at most `max_sentences` leading sentences.
///
/// Text that already fits is returned unchanged. Longer text is cut after
/// the last kept sentence with trailing whitespace removed.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    if max_sentences == 0 || text.trim().is_empty() {
        return String::new();
    }

    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return text.to_string();
    }

    let end: usize = sentences[..max_sentences].iter().map(|s| s.len()).sum();
    text[..end].trim_end().to_string()
}
