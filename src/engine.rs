//! Extraction engine
//!
//! The Extractor streams a Markdown document into a shell script. It holds
//! only configuration (fence syntax, preamble, include base directory); all
//! per-run state lives on the stack of [`Extractor::extract`].

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{ErrorKind, ExtractError};
use crate::parser::{parse_directives, Bound, IncludeDirective};
use crate::state::{resolve_include, FenceConfig, LineKind, ScanState};

/// Strict-mode header written once at the top of every generated script.
pub const PREAMBLE: &str = "#!/bin/bash\n\nset -e\nset -x\nset -u\n\n";

/// Counters collected during one extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Shell blocks extracted
    pub blocks: usize,
    /// Shell blocks skipped because of the ignore marker
    pub ignored_blocks: usize,
    /// Block lines copied verbatim
    pub lines: usize,
    /// Include directives expanded
    pub includes: usize,
    /// Lines spliced in from include sources
    pub included_lines: usize,
}

impl ExtractStats {
    /// Format a summary line
    pub fn summary(&self) -> String {
        format!(
            "{} block(s), {} ignored, {} line(s), {} include(s) adding {} line(s)",
            self.blocks, self.ignored_blocks, self.lines, self.includes, self.included_lines,
        )
    }
}

/// Turns Markdown into a shell script
#[derive(Debug, Clone)]
pub struct Extractor {
    fence: FenceConfig,
    preamble: String,
    base_dir: PathBuf,
}

impl Extractor {
    /// Create an extractor resolving relative includes against `base_dir`,
    /// normally the directory holding the input document.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            fence: FenceConfig::default(),
            preamble: PREAMBLE.into(),
            base_dir: base_dir.into(),
        }
    }

    pub fn with_fence(mut self, fence: FenceConfig) -> Self {
        self.fence = fence;
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Write the preamble, then every shell block of `input`, to `out`.
    ///
    /// Errors carry the document line they occurred on; the caller adds the
    /// document name.
    pub fn extract<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> Result<ExtractStats, ExtractError> {
        let mut stats = ExtractStats::default();
        let mut state = ScanState::Outside;
        let mut line = Vec::new();
        let mut line_number = 0;

        write_out(out, self.preamble.as_bytes())?;

        loop {
            line.clear();
            let read = input
                .read_until(b'\n', &mut line)
                .map_err(|e| ExtractError::new(ErrorKind::Io, format!("read error: {}", e)).with_line(line_number + 1))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let (next, kind) = state.step(&line, &self.fence);
            state = next;

            match kind {
                LineKind::Prose => {}
                LineKind::Open => {
                    stats.blocks += 1;
                    debug!("line {}: shell block opened", line_number);
                }
                LineKind::Ignored => {
                    stats.ignored_blocks += 1;
                    debug!("line {}: ignored shell block", line_number);
                }
                LineKind::Close => debug!("line {}: shell block closed", line_number),
                LineKind::Body => {
                    self.emit_line(&line, out, &mut stats)
                        .map_err(|e| e.with_line(line_number))?;
                }
            }
        }

        if state == ScanState::InsideShellBlock {
            debug!("input ended inside an unterminated shell block");
        }

        out.flush().map_err(|e| ExtractError::output(None, e))?;
        Ok(stats)
    }

    /// Emit one block line, expanding any include directives on it.
    fn emit_line<W: Write>(&self, line: &[u8], out: &mut W, stats: &mut ExtractStats) -> Result<(), ExtractError> {
        let directives = parse_directives(line);
        if directives.is_empty() {
            stats.lines += 1;
            return write_out(out, line);
        }

        // The line is rebuilt from expansions and trailing text only
        for directive in &directives {
            let copied = self.expand(directive, out)?;
            write_out(out, &directive.trailing)?;
            stats.includes += 1;
            stats.included_lines += copied;
        }
        Ok(())
    }

    /// Copy the directive's line range of its source file to `out`.
    /// Returns the number of lines copied.
    fn expand<W: Write>(&self, directive: &IncludeDirective, out: &mut W) -> Result<usize, ExtractError> {
        for (name, bound) in [("first", &directive.first), ("last", &directive.last)] {
            if let Bound::Malformed(text) = bound {
                warn!("include {}: ignoring malformed {} line {:?}", directive.path, name, text);
            }
        }

        let path = resolve_include(&self.base_dir, &directive.path);
        let first = directive.first_line();
        let last = directive.last_line();
        debug!(
            "include {} -> {} lines {}..{}",
            directive.path,
            path.display(),
            first,
            last.map_or_else(|| "EOF".to_string(), |n| n.to_string()),
        );

        let file = File::open(&path).map_err(|e| ExtractError::include(&path, e))?;
        copy_lines(BufReader::new(file), first, last, out).map_err(|e| match e.kind {
            ErrorKind::Io => ExtractError::new(
                ErrorKind::Io,
                format!("cannot read include {}: {}", path.display(), e.message),
            )
            .with_path(&path),
            _ => e,
        })
    }
}

/// Copy lines `first..=last` (1-based) of `reader` to `out`, terminators
/// included.
fn copy_lines<R: BufRead, W: Write>(
    mut reader: R,
    first: usize,
    last: Option<usize>,
    out: &mut W,
) -> Result<usize, ExtractError> {
    let mut buf = Vec::new();
    let mut n = 0;
    let mut copied = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        n += 1;
        if n < first {
            continue;
        }
        if last.map_or(false, |last| n > last) {
            break;
        }
        write_out(out, &buf)?;
        copied += 1;
    }

    Ok(copied)
}

fn write_out<W: Write>(out: &mut W, bytes: &[u8]) -> Result<(), ExtractError> {
    out.write_all(bytes).map_err(|e| ExtractError::output(None, e))
}
