//! memxamine - change reports over process memory snapshot diffs
//!
//! An external capture tool writes one memdiff file per memory segment and
//! consecutive snapshot pair. memxamine counts the set bits in each file and
//! reports, per segment, how much of it changed in every transition.
//!
//! # Quick Start
//!
//! ```no_run
//! use memxamine::{AnalysisConfig, Analyzer};
//!
//! let config = AnalysisConfig::for_pid(100).with_source_dir("/tmp/memdiffs");
//! let analysis = Analyzer::new(config).run()?;
//! print!("{}", analysis.report.render_table());
//! # Ok::<(), memxamine::Error>(())
//! ```
//!
//! # Architecture
//!
//! The pipeline lives in [`memxamine_engine`]; the data model, naming
//! convention and population count live in [`memxamine_core`]. Both are
//! re-exported here.

pub use memxamine_core::{count_set_bits_bytewise, naming, popcount, pid_prefix};
pub use memxamine_engine::*;
