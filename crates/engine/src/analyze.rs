//! End-to-end analysis pipeline
//!
//! Discovery, ordering, matrix build and report run strictly in sequence on
//! the calling thread. The first fatal error aborts the run; whatever was
//! acquired so far is dropped on the way out.

use memxamine_core::Result;

use crate::catalog::Catalog;
use crate::config::AnalysisConfig;
use crate::matrix::{build_matrix_with, DiffFileSource, DiffMatrix, MmapFileSource};
use crate::report::{progress_line, Report};

/// Outcome of one analysis run
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Discovered files and extents
    pub catalog: Catalog,
    /// Populated statistics matrix
    pub matrix: DiffMatrix,
    /// Filtered report
    pub report: Report,
}

impl Analysis {
    /// Informational line describing what was read
    pub fn progress_line(&self) -> String {
        progress_line(
            self.catalog.len(),
            self.catalog.pid(),
            self.catalog.extents(),
        )
    }
}

/// Runs the pipeline for one configuration
pub struct Analyzer<S = MmapFileSource> {
    config: AnalysisConfig,
    source: S,
}

impl Analyzer<MmapFileSource> {
    /// Analyzer reading diff files through memory maps
    pub fn new(config: AnalysisConfig) -> Self {
        Analyzer {
            config,
            source: MmapFileSource,
        }
    }
}

impl<S: DiffFileSource> Analyzer<S> {
    /// Analyzer reading diff files through `source`
    pub fn with_source(config: AnalysisConfig, source: S) -> Self {
        Analyzer { config, source }
    }

    /// Configuration the analyzer runs with
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Scan, build and report
    ///
    /// # Errors
    /// Any directory listing, open, stat, map or allocation failure.
    pub fn run(&mut self) -> Result<Analysis> {
        self.run_with(|_| {})
    }

    /// Like [`Analyzer::run`], calling `on_scanned` once discovery is done
    /// and before any diff file is read
    pub fn run_with<F>(&mut self, on_scanned: F) -> Result<Analysis>
    where
        F: FnOnce(&Catalog),
    {
        let catalog = Catalog::scan(&self.config.source_dir, self.config.pid)?;
        tracing::info!(
            pid = catalog.pid(),
            files = catalog.len(),
            segments = catalog.extents().max_segment,
            transitions = catalog.extents().max_snapshot,
            "Scanned memdiff directory"
        );
        on_scanned(&catalog);

        let matrix = build_matrix_with(
            catalog.dir(),
            catalog.pid(),
            catalog.extents(),
            catalog.descriptors(),
            &mut self.source,
        )?;
        let report = Report::build(&matrix, &self.config.display);

        Ok(Analysis {
            catalog,
            matrix,
            report,
        })
    }
}
