//! emx-mdscript: turn the shell examples of a Markdown document into a script
//!
//! Documentation-driven testing: every ```` ```shell ```` block of a tutorial
//! is concatenated, in document order, into one executable script that can
//! be run in CI.
//!
//! # Document Syntax
//!
//! ````text
//! Some prose, skipped.
//!
//! ```shell
//! echo "extracted"
//! {{#include ./snippets/setup.sh:2:10}} # trailing text is kept
//! ```
//!
//! ```shell ignore
//! echo "skipped: the opening fence says ignore"
//! ```
//! ````
//!
//! # Rules
//!
//! | Input | Effect |
//! |-------|--------|
//! | ```` ```shell ```` | Opens an extracted block |
//! | `ignore` on the opening fence | Block is skipped |
//! | ```` ``` ```` (any label) | Closes the block |
//! | `{{#include F}}` | Splices all of `F` |
//! | `{{#include F:N}}` | Splices `F` from line `N` to the end |
//! | `{{#include F:N:M}}` | Splices lines `N..=M` of `F` |
//!
//! Relative include paths resolve from the directory of the Markdown file.
//! The generated script starts with [`PREAMBLE`] (`set -e`, `set -x`, `set -u`).

mod engine;
mod state;
mod parser;
mod runner;
mod error;

pub use engine::{Extractor, ExtractStats, PREAMBLE};
pub use state::{ScanState, LineKind, FenceConfig, resolve_include};
pub use parser::{IncludeDirective, Bound, parse_directives};
pub use runner::{Runner, RunConfig, RunnerBuilder};
pub use error::{ExtractError, ErrorKind};

// Convenience entry point
pub use runner::extract;
