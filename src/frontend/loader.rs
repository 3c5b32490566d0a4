use std::fs;
use std::path::Path;

use tracing::debug;

use super::parse_error::ParseError;

/// An Intcode program as loaded from text.
///
/// The program is immutable once parsed; each machine copies it into its
/// own memory, so one `Program` can seed any number of instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    words: Vec<i64>,
}

impl Program {
    pub fn new(words: Vec<i64>) -> Self {
        Self { words }
    }

    /// Parse a single line of comma-separated signed integers.
    ///
    /// Surrounding whitespace (including the trailing newline most input
    /// files carry) is ignored, as is whitespace around each token.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let line = text.trim();
        if line.is_empty() {
            return Err(ParseError::new("empty program", 0, 1));
        }

        let mut words = Vec::new();
        let mut col = 1;

        for (index, raw) in line.split(',').enumerate() {
            let token = raw.trim();
            let token_col = col + (raw.len() - raw.trim_start().len());

            if token.is_empty() {
                return Err(ParseError::new("empty token", index, token_col));
            }

            let value = token.parse::<i64>().map_err(|e| {
                ParseError::new(format!("invalid integer '{}': {}", token, e), index, token_col)
            })?;
            words.push(value);

            // +1 for the separator
            col += raw.len() + 1;
        }

        debug!(words = words.len(), "program parsed");
        Ok(Self { words })
    }

    /// Read a program file. Only the first line is significant.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let first = source.lines().next().unwrap_or_default();
        Ok(Self::parse(first)?)
    }

    pub fn words(&self) -> &[i64] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl std::str::FromStr for Program {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::parse(s)
    }
}

/// Failure to obtain a program from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed program: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let program = Program::parse("1,0,0,0,99").unwrap();
        assert_eq!(program.words(), &[1, 0, 0, 0, 99]);
    }

    #[test]
    fn test_parse_negative_and_whitespace() {
        let program = Program::parse(" 1101, 100,-1 ,4,0\n").unwrap();
        assert_eq!(program.words(), &[1101, 100, -1, 4, 0]);
    }

    #[test]
    fn test_parse_large_values() {
        let program = Program::parse("104,1125899906842624,99").unwrap();
        assert_eq!(program.words()[1], 1125899906842624);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = Program::parse("1,0,x,0,99").unwrap_err();
        assert_eq!(err.token, 2);
        assert_eq!(err.col, 5);
        assert!(err.message.contains("'x'"));
    }

    #[test]
    fn test_parse_rejects_empty_token() {
        let err = Program::parse("1,,99").unwrap_err();
        assert_eq!(err.token, 1);
        assert_eq!(err.message, "empty token");
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(Program::parse("   \n").is_err());
    }

    #[test]
    fn test_from_str() {
        let program: Program = "99".parse().unwrap();
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn test_from_file_reads_first_line() {
        let name = format!("intcode-loader-{}.txt", std::process::id());
        let path = std::env::temp_dir().join(name);
        fs::write(&path, "3,0,4,0,99\nignored\n").unwrap();
        let program = Program::from_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(program.words(), &[3, 0, 4, 0, 99]);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Program::from_file(Path::new("/nonexistent/intcode.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
