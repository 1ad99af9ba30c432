//! Whitespace tokenizer for command text.
//!
//! The [`Lexer`] walks a borrowed string with a single forward-only cursor.
//! It is used by the router to pick out the prefix keyword and action name,
//! and by actions that want to read their own argument string positionally.
//!
//! ```rust
//! use obot_core::Lexer;
//!
//! let text = "ob nasa notext 2013-07-03";
//! let mut lexer = Lexer::new(text);
//! assert_eq!(lexer.next_token(), "ob");
//! assert_eq!(lexer.next_token(), "nasa");
//! assert_eq!(&text[lexer.skip_whitespace()..], "notext 2013-07-03");
//! ```

/// Returns `true` for the characters the lexer treats as separators.
///
/// This is a fixed set, not [`char::is_whitespace`]: wide spaces such as
/// U+2003 (em space) or U+3000 (ideographic space) are part of a token.
pub const fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\u{0020}'
            | '\u{0009}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{00A0}'
            | '\u{000A}'
            | '\u{000D}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Forward-only tokenizer over a borrowed source string.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    /// Byte offset into `source`, always on a char boundary.
    cursor: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, cursor: 0 }
    }

    /// Returns the source string this lexer reads from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the current byte offset without moving the cursor.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Skips separators, then consumes and returns the next run of
    /// non-separator characters.
    ///
    /// Returns an empty string once the input is exhausted.
    pub fn next_token(&mut self) -> &'a str {
        let start = self.skip_whitespace();
        let rest = &self.source[start..];
        let len = rest.find(is_separator).unwrap_or(rest.len());
        self.cursor = start + len;
        &self.source[start..self.cursor]
    }

    /// Advances past any separators at the cursor and returns the new offset.
    ///
    /// Slicing the source from the returned offset yields "everything after
    /// the tokens read so far". Calling this twice in a row is a no-op the
    /// second time.
    pub fn skip_whitespace(&mut self) -> usize {
        let rest = &self.source[self.cursor..];
        let skipped = rest.find(|c| !is_separator(c)).unwrap_or(rest.len());
        self.cursor += skipped;
        self.cursor
    }

    /// Skips separators and returns the unread remainder of the source.
    pub fn rest(&mut self) -> &'a str {
        let start = self.skip_whitespace();
        &self.source[start..]
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (!token.is_empty()).then_some(token)
    }
}
