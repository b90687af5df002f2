//! Metric identifier parsing.
//!
//! Identifiers follow `FsF-<Letter><digit>[.<digit>]-<code>`, e.g. `FsF-F1-02D`
//! or `FsF-R1.1-01M`. The principle letter always sits at character offset 4;
//! the `<Letter><digit>[.<digit>]` block is the finer-grained sub-principle.
//!
//! Metric test keys extend the identifier with `-<digit>` and, for sub-tests,
//! a trailing lower-case letter: `FsF-F1-02D-1` and its sub-test `FsF-F1-02D-1a`.

use super::domain::FairLetter;
use regex::Regex;
use std::sync::OnceLock;

const LETTER_OFFSET: usize = 4;

static SUB_PRINCIPLE_PATTERN: OnceLock<Regex> = OnceLock::new();
static SUB_TEST_PATTERN: OnceLock<Regex> = OnceLock::new();

fn sub_principle_pattern() -> &'static Regex {
    SUB_PRINCIPLE_PATTERN
        .get_or_init(|| Regex::new(r"-([FAIR][0-9](\.[0-9])?)-").expect("valid sub-principle regex"))
}

fn sub_test_pattern() -> &'static Regex {
    SUB_TEST_PATTERN.get_or_init(|| Regex::new(r"-[0-9]([a-z])$").expect("valid sub-test regex"))
}

/// Principle letter and optional sub-principle label pulled out of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    pub letter: FairLetter,
    pub sub_principle: Option<String>,
}

/// Returns `None` when no FAIR letter sits at the fixed offset.
pub fn parse_identifier(identifier: &str) -> Option<ParsedIdentifier> {
    let letter = fair_letter(identifier)?;
    Some(ParsedIdentifier {
        letter,
        sub_principle: sub_principle(identifier),
    })
}

pub fn fair_letter(identifier: &str) -> Option<FairLetter> {
    identifier
        .chars()
        .nth(LETTER_OFFSET)
        .and_then(FairLetter::from_char)
}

pub fn sub_principle(identifier: &str) -> Option<String> {
    sub_principle_pattern()
        .captures(identifier)
        .and_then(|captures| captures.get(1))
        .map(|matched| matched.as_str().to_string())
}

/// Letter suffix of a sub-test key, or `None` for top-level tests.
pub fn sub_test_suffix(test_key: &str) -> Option<char> {
    sub_test_pattern()
        .captures(test_key)
        .and_then(|captures| captures.get(1))
        .and_then(|matched| matched.as_str().chars().next())
}
