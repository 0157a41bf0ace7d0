//! Analysis configuration
//!
//! The CLI layer builds an [`AnalysisConfig`] from its arguments and hands
//! it to the engine only after [`AnalysisConfig::validate`] and
//! [`validate_source_dir`] succeed. Neither error type ever originates in
//! the analysis core.

use std::io;
use std::path::{Path, PathBuf};

/// Largest pid or block size accepted; the capture tool stores them in a C `int`
pub const MAX_ARGUMENT: u64 = i32::MAX as u64;

/// How the report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Column-aligned plain-text table
    #[default]
    Table,
    /// Pretty-printed JSON document
    Json,
}

/// Minimum average block size a segment must reach to be reported
///
/// Always a non-zero power of two no larger than [`MAX_ARGUMENT`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockSize(u64);

impl BlockSize {
    /// Block size given in bytes
    pub fn from_bytes(bytes: u64) -> Result<Self, ConfigError> {
        if bytes > MAX_ARGUMENT {
            return Err(ConfigError::BlockSizeTooLarge(bytes));
        }
        if !bytes.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(bytes));
        }
        Ok(BlockSize(bytes))
    }

    /// Block size given in kilobytes
    pub fn from_kilobytes(kilobytes: u64) -> Result<Self, ConfigError> {
        let bytes = kilobytes
            .checked_mul(1024)
            .ok_or(ConfigError::BlockSizeTooLarge(kilobytes))?;
        Self::from_bytes(bytes)
    }

    /// Size in bytes
    pub fn bytes(&self) -> u64 {
        self.0
    }
}

/// Which segment rows make it into the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayPolicy {
    /// Keep segments whose diffs contain no set bits at all
    pub show_unchanged: bool,
    /// Drop segments whose average diff size per transition is smaller
    pub min_average_block_size: Option<BlockSize>,
}

impl DisplayPolicy {
    /// Report every segment with data, including unchanged ones
    pub fn show_unchanged() -> Self {
        DisplayPolicy {
            show_unchanged: true,
            min_average_block_size: None,
        }
    }

    /// Report changed segments averaging at least `block_size` bytes
    pub fn with_min_block_size(block_size: BlockSize) -> Self {
        DisplayPolicy {
            show_unchanged: false,
            min_average_block_size: Some(block_size),
        }
    }

    /// Check the two filters are not combined
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.show_unchanged && self.min_average_block_size.is_some() {
            return Err(ConfigError::UnchangedWithBlockSize);
        }
        Ok(())
    }
}

/// Everything the analysis core needs for one run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Process whose memdiff files are examined
    pub pid: u32,
    /// Directory holding the memdiff files
    pub source_dir: PathBuf,
    /// Row filtering
    pub display: DisplayPolicy,
    /// Suppress informational messages
    pub quiet: bool,
    /// Report rendering
    pub output: OutputMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pid: 0,
            source_dir: PathBuf::from("."),
            display: DisplayPolicy::default(),
            quiet: false,
            output: OutputMode::Table,
        }
    }
}

impl AnalysisConfig {
    /// Config for `pid` in the current directory
    pub fn for_pid(pid: u32) -> Self {
        AnalysisConfig {
            pid,
            ..Default::default()
        }
    }

    /// Set the source directory
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Set the display policy
    pub fn with_display(mut self, display: DisplayPolicy) -> Self {
        self.display = display;
        self
    }

    /// Set quiet mode
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the output mode
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if u64::from(self.pid) > MAX_ARGUMENT {
            return Err(ConfigError::PidOutOfRange(self.pid));
        }
        self.display.validate()
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No pid was supplied
    #[error("Option -p must be specified")]
    MissingPid,

    /// Pid does not fit in the capture tool's pid type
    #[error("pid {0} is out of range, should be a pid to look for memdiff files from")]
    PidOutOfRange(u32),

    /// Block size is zero or not a power of two
    #[error("block size {0} must be a power of two")]
    BlockSizeNotPowerOfTwo(u64),

    /// Block size exceeds the supported maximum
    #[error("block size {0} is too large")]
    BlockSizeTooLarge(u64),

    /// `show_unchanged` combined with a block-size threshold
    #[error("listing unchanged segments cannot be combined with a block size")]
    UnchangedWithBlockSize,
}

/// Source directory validation errors
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Nothing exists at the path
    #[error("Invalid memdiff path: {}", .path.display())]
    NotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// The path exists but is not a directory
    #[error("{} is not a directory", .path.display())]
    NotADirectory {
        /// Path that was checked
        path: PathBuf,
    },

    /// The path could not be examined
    #[error("Error parsing path to memdiffs: {source}")]
    Inaccessible {
        /// Path that was checked
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },
}

/// Check that `path` names an existing directory
pub fn validate_source_dir(path: &Path) -> Result<(), PathError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PathError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PathError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(PathError::Inaccessible {
            path: path.to_path_buf(),
            source,
        }),
    }
}
