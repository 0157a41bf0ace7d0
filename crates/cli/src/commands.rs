//! Clap command definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the memxamine command line.
pub fn build_cli() -> Command {
    Command::new("memxamine")
        .about("Summarize bit-level changes recorded in memdiff files")
        .override_usage("memxamine <options> -p <pid> [memdiffs path]")
        .arg(
            Arg::new("pid")
                .short('p')
                .long("pid")
                .value_name("PID")
                .help("Look for memdiff files from pid <PID>")
                .required(true)
                .value_parser(value_parser!(u32).range(0..=i64::from(i32::MAX))),
        )
        .arg(
            Arg::new("block-size")
                .short('b')
                .long("block-size")
                .value_name("SIZE")
                .help("Assume a blocksize of <SIZE> bytes")
                .value_parser(value_parser!(u64))
                .conflicts_with_all(["block-size-kb", "unchanged"]),
        )
        .arg(
            Arg::new("block-size-kb")
                .short('k')
                .long("block-size-kb")
                .value_name("SIZE")
                .help("Assume a blocksize of <SIZE> kilobytes")
                .value_parser(value_parser!(u64))
                .conflicts_with("unchanged"),
        )
        .arg(
            Arg::new("unchanged")
                .short('u')
                .long("unchanged")
                .help("List unchanged segments")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Quieter output: squelch unnecessary messages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output instead of a table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("path")
                .value_name("MEMDIFFS_PATH")
                .help("Directory holding the memdiff files (default: current directory)"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        build_cli().debug_assert();
    }
}
