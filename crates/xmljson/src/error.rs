//! Error types for xmljson

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Line/column position inside an input document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Resolve a byte offset into line and column (both 1-based)
    pub fn from_offset(source: &[u8], offset: usize) -> Self {
        let end = offset.min(source.len());
        let mut line = 1u32;
        let mut col = 1u32;
        for &b in source.iter().take(end) {
            if b == b'\n' {
                line = line.saturating_add(1);
                col = 1;
            } else {
                col = col.saturating_add(1);
            }
        }
        Self { offset, line, col }
    }

    /// Resolve a 1-based line and column back into a byte offset, clamped to
    /// the end of `source`
    pub fn from_line_col(source: &[u8], line: u32, col: u32) -> Self {
        let mut line_start = 0usize;
        let mut newlines = line.saturating_sub(1);
        for (i, &b) in source.iter().enumerate() {
            if newlines == 0 {
                break;
            }
            if b == b'\n' {
                newlines = newlines.saturating_sub(1);
                line_start = i.saturating_add(1);
            }
        }
        let col_offset = usize::try_from(col.saturating_sub(1)).unwrap_or(usize::MAX);
        let offset = line_start.saturating_add(col_offset).min(source.len());
        Self { offset, line, col }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound { path: PathBuf },
    Unreadable { path: PathBuf },
    WriteFailure { path: PathBuf },
    XmlLoad,
    JsonParse,
    InvalidShape { found: &'static str },
    MaxDepthExceeded { max: u16 },
    Serialize,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::Unreadable { path } => write!(f, "cannot read {}", path.display()),
            Self::WriteFailure { path } => write!(f, "cannot write {}", path.display()),
            Self::XmlLoad => write!(f, "invalid xml"),
            Self::JsonParse => write!(f, "invalid json"),
            Self::InvalidShape { found } => {
                write!(f, "expected object or array, found {found}")
            }
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::Serialize => write!(f, "serialization failed"),
        }
    }
}

/// Main error type for xmljson
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pos: Option<Pos>,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            pos: None,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            pos: None,
            message: message.into(),
        }
    }

    /// Attach the position the error was detected at
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Map a failed read of `path` onto the matching kind
    pub fn read(path: &Path, err: &std::io::Error) -> Self {
        let path = path.to_path_buf();
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound { path },
            _ => ErrorKind::Unreadable { path },
        };
        let message = format!("{kind}: {err}");
        Self::with_message(kind, message)
    }

    pub fn write(path: &Path, err: &std::io::Error) -> Self {
        let kind = ErrorKind::WriteFailure {
            path: path.to_path_buf(),
        };
        let message = format!("{kind}: {err}");
        Self::with_message(kind, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "error at {pos}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Result type alias for xmljson
pub type Result<T> = std::result::Result<T, Error>;
