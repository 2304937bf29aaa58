//! Statement boundary detection.
//!
//! Uses the sqlparser-rs tokenizer with the SQLite dialect to count the
//! statements in a string without executing or fully parsing them. Semicolons
//! inside literals, quoted identifiers, comments, and `CREATE TRIGGER` bodies
//! do not end a statement.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Counts the non-empty statements in `sql`.
///
/// Returns `None` when the text cannot be tokenized (an unterminated literal
/// or comment, for example); SQLite reports those itself when preparing.
pub fn count_statements(sql: &str) -> Option<usize> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql).tokenize().ok()?;

    let mut count = 0;
    let mut current = Segment::default();

    for token in &tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => {}
            Token::SemiColon if current.depth == 0 => {
                if current.has_content {
                    count += 1;
                }
                current = Segment::default();
            }
            Token::Word(word) if word.quote_style.is_none() => current.keyword(&word.value),
            _ => current.has_content = true,
        }
    }

    if current.has_content {
        count += 1;
    }
    Some(count)
}

/// Tokenizer state for the statement being scanned.
#[derive(Debug, Default)]
struct Segment {
    has_content: bool,
    is_create: bool,
    in_trigger: bool,
    /// Open `BEGIN`/`CASE` blocks inside a trigger body.
    depth: usize,
}

impl Segment {
    fn keyword(&mut self, word: &str) {
        let first = !self.has_content;
        self.has_content = true;

        if first {
            self.is_create = word.eq_ignore_ascii_case("CREATE");
        } else if self.is_create && self.depth == 0 && word.eq_ignore_ascii_case("TRIGGER") {
            self.in_trigger = true;
        } else if self.in_trigger && word.eq_ignore_ascii_case("BEGIN") {
            self.depth += 1;
        } else if self.depth > 0 && word.eq_ignore_ascii_case("CASE") {
            self.depth += 1;
        } else if self.depth > 0 && word.eq_ignore_ascii_case("END") {
            self.depth -= 1;
        }
    }
}
