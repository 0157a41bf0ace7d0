//! memxamine — summarize the bits that changed between memory snapshots.
//!
//! Reads the `pid<PID>_snap<A>_snap<B>_seg<SEG>.memdiff` files written by the
//! capture tool and prints, per memory segment, how many bits changed in
//! each snapshot transition.
//!
//! Exit status is 0 on success (including when no files match) and 1 on any
//! configuration, path or I/O failure.

mod commands;
mod logging;
mod parse;

use std::process;

use memxamine_engine::{progress_line, validate_source_dir, Analyzer, OutputMode};

use commands::build_cli;
use parse::{matches_to_invocation, Invocation};

fn main() {
    let matches = build_cli().get_matches();

    let invocation = match matches_to_invocation(&matches) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("memxamine: {}", e);
            process::exit(1);
        }
    };
    logging::init(invocation.config.quiet);

    if let Err(e) = check_source(&invocation) {
        eprintln!("{}", e);
        process::exit(1);
    }

    process::exit(run(&invocation));
}

fn check_source(invocation: &Invocation) -> Result<(), memxamine_engine::PathError> {
    if invocation.path_given {
        return validate_source_dir(&invocation.config.source_dir);
    }
    if announces(invocation) {
        println!("No path given, searching current directory.");
    }
    Ok(())
}

/// Informational lines go to stdout, so JSON output suppresses them.
fn announces(invocation: &Invocation) -> bool {
    !invocation.config.quiet && invocation.config.output == OutputMode::Table
}

fn run(invocation: &Invocation) -> i32 {
    let config = &invocation.config;
    tracing::debug!(?config, "Starting analysis");
    let announce = announces(invocation);

    let mut analyzer = Analyzer::new(config.clone());
    let result = analyzer.run_with(|catalog| {
        if announce {
            println!(
                "{}",
                progress_line(catalog.len(), catalog.pid(), catalog.extents())
            );
        }
    });

    match result {
        Ok(analysis) => {
            let rendered = analysis.report.render(config.output);
            if rendered.ends_with('\n') {
                print!("{}", rendered);
            } else {
                println!("{}", rendered);
            }
            0
        }
        Err(e) => {
            eprintln!("memxamine: {}", e);
            1
        }
    }
}
