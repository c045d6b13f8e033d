//! Extraction errors

use std::fmt;
use std::path::{Path, PathBuf};

/// The kind of extraction error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input Markdown file missing or unreadable
    InputNotFound,
    /// An include directive names a file that cannot be opened
    IncludeNotFound,
    /// Output script cannot be created or written
    OutputUnwritable,
    /// Other IO failure while reading input or an include source
    Io,
}

/// An extraction error with document/line context
#[derive(Debug)]
pub struct ExtractError {
    pub kind: ErrorKind,
    pub message: String,
    /// Markdown document being processed
    pub file: Option<String>,
    /// 1-based line in the document
    pub line: Option<usize>,
    /// The path the failing operation was acting on
    pub path: Option<PathBuf>,
}

impl ExtractError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            line: None,
            path: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn input(path: &Path, err: std::io::Error) -> Self {
        Self::new(ErrorKind::InputNotFound, format!("cannot read {}: {}", path.display(), err))
            .with_path(path)
    }

    pub fn include(path: &Path, err: std::io::Error) -> Self {
        Self::new(ErrorKind::IncludeNotFound, format!("cannot open include {}: {}", path.display(), err))
            .with_path(path)
    }

    pub fn output(path: Option<&Path>, err: std::io::Error) -> Self {
        match path {
            Some(p) => Self::new(ErrorKind::OutputUnwritable, format!("cannot write {}: {}", p.display(), err))
                .with_path(p),
            None => Self::new(ErrorKind::OutputUnwritable, format!("cannot write output: {}", err)),
        }
    }

    /// Fill in the output path for errors raised by the streaming layer,
    /// which only sees an opaque writer.
    pub(crate) fn or_output_path(mut self, path: &Path) -> Self {
        if self.kind == ErrorKind::OutputUnwritable && self.path.is_none() {
            self.message = self.message.replacen("output", &path.display().to_string(), 1);
            self.path = Some(path.to_path_buf());
        }
        self
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:", file)?;
        }
        if let Some(line) = self.line {
            write!(f, "{}:", line)?;
        }
        if self.file.is_some() || self.line.is_some() {
            write!(f, " ")?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string())
    }
}
