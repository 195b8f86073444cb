//! Explicit read cursor shared by every stage that consumes the primary file.
//!
//! The SCI format mixes two reading styles: most sections are line
//! oriented, while the cell widths are a free token stream. [`LineCursor`]
//! supports both and tracks the 1-based number of the last line it read so
//! errors can point at it.

use crate::error::{Result, SciError};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

pub struct LineCursor<R> {
    reader: R,
    line: usize,
    pending: VecDeque<String>,
}

impl LineCursor<BufReader<File>> {
    /// Opens `path` for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| SciError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            pending: VecDeque::new(),
        }
    }

    /// Number of the last line read (0 before the first read).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads the next physical line, dropping any unread tokens of the
    /// current one. Returns `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.pending.clear();
        let mut buf = String::new();
        let n = self
            .reader
            .read_line(&mut buf)
            .map_err(|source| SciError::Io {
                line: self.line + 1,
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    /// Like [`next_line`](Self::next_line) but skips lines holding only
    /// whitespace.
    pub fn next_nonblank_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.next_line()? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    /// Next whitespace-separated token, crossing line boundaries.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let Some(line) = self.next_line()? else {
                return Ok(None);
            };
            self.pending = line.split_whitespace().map(str::to_owned).collect();
        }
    }

    /// Forgets whatever is left of the line the last token came from.
    pub fn discard_rest_of_line(&mut self) {
        self.pending.clear();
    }
}

/// Why a positional field of a line could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("missing field {position} ({what})")]
    Missing { position: usize, what: &'static str },
    #[error("field {position} ({what}) is not a valid {expected}: {token:?}")]
    Invalid {
        position: usize,
        what: &'static str,
        expected: &'static str,
        token: String,
    },
}

/// Positional reader over the whitespace-separated fields of one line.
///
/// Tokens past the last requested one are ignored.
pub struct LineFields<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> LineFields<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace(),
            position: 0,
        }
    }

    fn next(&mut self, what: &'static str) -> std::result::Result<&'a str, FieldError> {
        self.position += 1;
        self.tokens.next().ok_or(FieldError::Missing {
            position: self.position,
            what,
        })
    }

    pub fn text(&mut self, what: &'static str) -> std::result::Result<&'a str, FieldError> {
        self.next(what)
    }

    pub fn int(&mut self, what: &'static str) -> std::result::Result<i32, FieldError> {
        let token = self.next(what)?;
        token.parse().map_err(|_| FieldError::Invalid {
            position: self.position,
            what,
            expected: "integer",
            token: token.to_owned(),
        })
    }

    pub fn real(&mut self, what: &'static str) -> std::result::Result<f64, FieldError> {
        let token = self.next(what)?;
        token.parse().map_err(|_| FieldError::Invalid {
            position: self.position,
            what,
            expected: "real number",
            token: token.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lines_and_tokens_share_position() {
        let mut cursor = LineCursor::new(Cursor::new("a b\r\nc\n\n  \nd e f\n"));
        assert_eq!(cursor.next_token().unwrap().as_deref(), Some("a"));
        assert_eq!(cursor.line(), 1);
        // Pending "b" is dropped by a line read.
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("c"));
        assert_eq!(cursor.next_nonblank_line().unwrap().as_deref(), Some("d e f"));
        assert_eq!(cursor.line(), 5);
        assert_eq!(cursor.next_line().unwrap(), None);
        assert_eq!(cursor.next_token().unwrap(), None);
    }

    #[test]
    fn test_tokens_skip_blank_lines() {
        let mut cursor = LineCursor::new(Cursor::new("\n\n 1 \n2"));
        assert_eq!(cursor.next_token().unwrap().as_deref(), Some("1"));
        assert_eq!(cursor.line(), 3);
        assert_eq!(cursor.next_token().unwrap().as_deref(), Some("2"));
        assert_eq!(cursor.line(), 4);
    }

    #[test]
    fn test_open_missing_file() {
        let err = match LineCursor::open(Path::new("/definitely/not/here.cfd")) {
            Ok(_) => panic!("opened a missing file"),
            Err(e) => e,
        };
        assert!(matches!(err, SciError::FileNotFound { .. }));
    }

    #[test]
    fn test_line_fields() {
        let mut f = LineFields::new("inlet1 3 x 2.5");
        assert_eq!(f.text("name").unwrap(), "inlet1");
        assert_eq!(f.int("SI").unwrap(), 3);
        assert_eq!(
            f.int("SJ").unwrap_err(),
            FieldError::Invalid {
                position: 3,
                what: "SJ",
                expected: "integer",
                token: "x".into()
            }
        );
        assert_eq!(f.real("T").unwrap(), 2.5);
        assert_eq!(
            f.real("U").unwrap_err(),
            FieldError::Missing {
                position: 5,
                what: "U"
            }
        );
    }
}
