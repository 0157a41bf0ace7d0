//! ArgMatches → AnalysisConfig conversion.

use std::path::PathBuf;

use clap::ArgMatches;
use memxamine_engine::{AnalysisConfig, BlockSize, ConfigError, DisplayPolicy, OutputMode};

/// A validated request to analyze one pid.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Configuration handed to the engine.
    pub config: AnalysisConfig,
    /// Whether a path was given on the command line.
    pub path_given: bool,
}

/// Translate parsed arguments into an [`Invocation`].
pub fn matches_to_invocation(matches: &ArgMatches) -> Result<Invocation, ConfigError> {
    let pid = matches
        .get_one::<u32>("pid")
        .copied()
        .ok_or(ConfigError::MissingPid)?;

    let block_size = match (
        matches.get_one::<u64>("block-size"),
        matches.get_one::<u64>("block-size-kb"),
    ) {
        (Some(&bytes), _) => Some(BlockSize::from_bytes(bytes)?),
        (None, Some(&kilobytes)) => Some(BlockSize::from_kilobytes(kilobytes)?),
        (None, None) => None,
    };

    let display = DisplayPolicy {
        show_unchanged: matches.get_flag("unchanged"),
        min_average_block_size: block_size,
    };

    let output = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Table
    };

    let path = matches.get_one::<String>("path");
    let mut config = AnalysisConfig::for_pid(pid)
        .with_display(display)
        .with_quiet(matches.get_flag("quiet"))
        .with_output(output);
    if let Some(path) = path {
        config = config.with_source_dir(PathBuf::from(path));
    }
    config.validate()?;

    Ok(Invocation {
        config,
        path_given: path.is_some(),
    })
}
