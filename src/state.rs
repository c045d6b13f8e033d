//! Scan state
//!
//! The extractor is a two-state machine over the document's lines. Each line
//! is classified by [`ScanState::step`] without any IO, so fence handling can
//! be exercised on its own.

use std::path::{Path, PathBuf};

/// Fence syntax recognized by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceConfig {
    /// Fence delimiter; any line starting with it closes an open block
    pub marker: String,
    /// Language label that opens an extracted block (`marker` + `language`)
    pub language: String,
    /// Token on an opening fence line that suppresses the block
    pub ignore_marker: String,
}

impl Default for FenceConfig {
    fn default() -> Self {
        Self {
            marker: "```".into(),
            language: "shell".into(),
            ignore_marker: "ignore".into(),
        }
    }
}

impl FenceConfig {
    fn is_fence(&self, line: &[u8]) -> bool {
        line.starts_with(self.marker.as_bytes())
    }

    fn opens_block(&self, line: &[u8]) -> bool {
        self.is_fence(line) && line[self.marker.len()..].starts_with(self.language.as_bytes())
    }

    /// An empty marker ignores nothing
    fn is_ignored(&self, line: &[u8]) -> bool {
        contains(line, self.ignore_marker.as_bytes())
    }
}

/// Where the scanner is relative to shell blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Outside,
    InsideShellBlock,
}

/// What a single line means to the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Markdown outside any shell block; discarded
    Prose,
    /// Opening fence of an extracted shell block
    Open,
    /// Opening shell fence carrying the ignore marker; the block is skipped
    Ignored,
    /// Content of a shell block; emitted (with includes expanded)
    Body,
    /// Fence ending the current block; not emitted
    Close,
}

impl ScanState {
    /// Classify one raw line (terminator included) and return the next state.
    pub fn step(self, line: &[u8], fence: &FenceConfig) -> (ScanState, LineKind) {
        match self {
            ScanState::Outside => {
                if !fence.opens_block(line) {
                    (ScanState::Outside, LineKind::Prose)
                } else if fence.is_ignored(line) {
                    (ScanState::Outside, LineKind::Ignored)
                } else {
                    (ScanState::InsideShellBlock, LineKind::Open)
                }
            }
            ScanState::InsideShellBlock => {
                if fence.is_fence(line) {
                    (ScanState::Outside, LineKind::Close)
                } else {
                    (ScanState::InsideShellBlock, LineKind::Body)
                }
            }
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Resolve an include path against the document's directory.
///
/// Absolute paths are kept; relative ones are joined onto `base_dir`. `..`
/// is left for the filesystem to follow, so symlinked directories resolve
/// the way the OS sees them.
pub fn resolve_include(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
