//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser], the foundation of the Newick parser:
//! peeking, consuming, comment skipping and quote-aware label parsing.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for ASCII text with support for peeking and consuming.
///
/// # Example
/// ```
/// use evodist::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [PhyML tree] (A:0.1,B:0.2);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert_eq!(parser.peek(), Some(b'('));
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new `ByteParser` from a string by copying it into memory.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }

    /// Creates a new `ByteParser` over the full contents of a file.
    ///
    /// # Errors
    /// Returns a [ParsingError] of kind `IoError` if the file cannot be read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips (consumes) all consecutive whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a comment in square brackets `[...]` if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    ///
    /// # Errors
    /// Returns an error if a comment starts with `[` but doesn't have a closing `]`.
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if !self.consume_if(b'[') {
            return Ok(false);
        }

        while let Some(b) = self.next_byte() {
            if b == b']' {
                return Ok(true);
            }
        }

        Err(ParsingError::unclosed_comment(self))
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte matches the target byte.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it matches the target byte.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current parser position in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(&self.source.get_context(k)).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// # Errors
    /// Returns an error if a comment before the label is unclosed
    /// or a quoted label is never closed.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a quoted label enclosed in single quotes.
    ///
    /// Single quotes within the label are escaped by doubling them
    /// (e.g., `'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Errors
    /// Returns an error if the closing quote is missing.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next_byte(); // consume opening '

        let mut label = Vec::new();
        while let Some(b) = self.next_byte() {
            if b == b'\'' {
                if self.peek() == Some(b'\'') {
                    label.push(b'\'');
                    self.next_byte();
                } else {
                    return Ok(String::from_utf8_lossy(&label).into_owned());
                }
            } else {
                label.push(b);
            }
        }

        Err(ParsingError::unexpected_eof(self))
    }

    /// Parses an unquoted label until any of the given delimiters is encountered.
    ///
    /// Labels are decoded as UTF-8; invalid sequences become the replacement character.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let mut label = Vec::new();

        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            label.push(b);
            self.next_byte();
        }

        String::from_utf8_lossy(&label).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_comment_and_whitespace() {
        let mut parser = ByteParser::for_str("[Go] \n[Keep going]   \t ['...']\n END");
        parser.skip_comment_and_whitespace().unwrap();
        assert_eq!(parser.next_byte(), Some(b'E'));
    }

    #[test]
    fn test_unclosed_comment() {
        let mut parser = ByteParser::for_str("[never closed (A,B);");
        assert!(parser.skip_comment().is_err());
    }

    #[test]
    fn test_parse_labels() {
        let delimiters = b"(),:;";
        let mut parser = ByteParser::for_str("'Baillon''s crake':0.1,Pukeko)");
        assert_eq!(parser.parse_label(delimiters).unwrap(), "Baillon's crake");
        assert_eq!(parser.next_byte(), Some(b':'));
        assert_eq!(parser.parse_unquoted_label(b","), "0.1");
        assert!(parser.consume_if(b','));
        assert_eq!(parser.parse_label(delimiters).unwrap(), "Pukeko");
        assert_eq!(parser.peek(), Some(b')'));
    }

    #[test]
    fn test_non_ascii_labels() {
        let mut parser = ByteParser::for_str("protéine:1,'Gänsegeier''s':2");
        assert_eq!(parser.parse_label(b",:").unwrap(), "protéine");
        assert!(parser.consume_if(b':'));
        assert_eq!(parser.parse_unquoted_label(b","), "1");
        assert!(parser.consume_if(b','));
        assert_eq!(parser.parse_label(b",:").unwrap(), "Gänsegeier's");
    }

    #[test]
    fn test_unterminated_quoted_label() {
        let mut parser = ByteParser::for_str("'open ended");
        assert!(parser.parse_label(b",").is_err());
    }
}
