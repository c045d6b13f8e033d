//! Extraction runner
//!
//! Orchestrates one file-to-file extraction: opens the Markdown input, works
//! out where relative includes resolve from, creates the output script and
//! streams the document through an [`Extractor`].

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::info;

use crate::engine::{ExtractStats, Extractor, PREAMBLE};
use crate::error::{ErrorKind, ExtractError};
use crate::state::FenceConfig;

/// Configuration for one extraction run
///
/// `input` and `output` default to empty paths and must be set before
/// running.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Markdown document to read
    pub input: PathBuf,
    /// Shell script to create or overwrite
    pub output: PathBuf,
    /// Header written before any extracted content
    pub preamble: String,
    /// Fence syntax
    pub fence: FenceConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            preamble: PREAMBLE.into(),
            fence: FenceConfig::default(),
        }
    }
}

/// The extraction runner
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    /// Create a new runner with the given config
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the extraction.
    ///
    /// The input is opened before the output is created, so a missing input
    /// leaves no output file behind. Any later failure leaves a partial output.
    pub fn run(&self) -> Result<ExtractStats, ExtractError> {
        let input = &self.config.input;
        let output = &self.config.output;
        let doc_name = input.display().to_string();

        let reader = File::open(input).map_err(|e| ExtractError::input(input, e))?;
        let base_dir = include_base_dir(input)?;

        let writer = File::create(output).map_err(|e| ExtractError::output(Some(output.as_path()), e))?;
        let mut writer = BufWriter::new(writer);

        let extractor = Extractor::new(base_dir)
            .with_preamble(self.config.preamble.clone())
            .with_fence(self.config.fence.clone());

        let stats = extractor
            .extract(BufReader::new(reader), &mut writer)
            .map_err(|e| e.or_output_path(output).with_file(doc_name.clone()))?;

        info!("{} -> {}: {}", doc_name, output.display(), stats.summary());
        Ok(stats)
    }
}

/// Absolute directory that relative include paths in `input` resolve against.
fn include_base_dir(input: &Path) -> Result<PathBuf, ExtractError> {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| {
        ExtractError::new(ErrorKind::Io, format!("cannot determine working directory: {}", e))
    })?;
    Ok(cwd.join(dir))
}

/// Builder API for convenient runner construction
pub struct RunnerBuilder {
    config: RunConfig,
}

impl RunnerBuilder {
    /// Start building a run from `input` to `output`
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            config: RunConfig {
                input: input.into(),
                output: output.into(),
                ..Default::default()
            },
        }
    }

    /// Replace the script header
    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.config.preamble = preamble.into();
        self
    }

    /// Set the fence label that opens an extracted block
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.fence.language = language.into();
        self
    }

    /// Set the token that suppresses a block
    pub fn ignore_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.fence.ignore_marker = marker.into();
        self
    }

    /// Build and return the runner
    pub fn build(self) -> Runner {
        Runner::new(self.config)
    }

    /// Build and run
    pub fn run(self) -> Result<ExtractStats, ExtractError> {
        self.build().run()
    }
}

/// Convenience function: create a runner builder for one document
pub fn extract(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> RunnerBuilder {
    RunnerBuilder::new(input, output)
}
