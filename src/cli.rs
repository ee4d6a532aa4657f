//! Command-line surface: positional input files, the recognized control
//! flags, and the parallel-processing/config additions layered on top
//! (`--with-graphs`, `--config`, `--jobs`). Unrecognized flags are
//! captured verbatim as compiler-option passthrough hints.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cstructinfo")]
#[command(about = "Declaration and flowchart extractor for C/C++ translation units")]
#[command(version)]
pub struct Cli {
    /// Source files to process. Validated as non-empty by
    /// `commands::extract::run` (a `CliError::NoInputFiles`, not a bare
    /// clap usage error) so "no input files" surfaces through this
    /// crate's own error hierarchy and exit-code mapping.
    pub files: Vec<PathBuf>,

    /// Restrict extraction to declarations located in the primary input
    /// file (per file, not just the first positional argument).
    #[arg(long = "main-only")]
    pub main_only: bool,

    /// Omit function extraction.
    #[arg(long = "no-functions")]
    pub no_functions: bool,

    /// Omit struct extraction.
    #[arg(long = "no-structs")]
    pub no_structs: bool,

    /// Omit `builtin` bit-size annotations on fields.
    #[arg(long = "no-sizes")]
    pub no_sizes: bool,

    /// Include verbatim `source` text per declaration.
    #[arg(long = "with-source")]
    pub with_source: bool,

    /// Attach each function's flowchart graph to the output document.
    #[arg(long = "with-graphs")]
    pub with_graphs: bool,

    /// Worker count for multi-file parallel processing; 0 = all cores.
    #[arg(long, default_value_t = 0)]
    pub jobs: usize,

    /// Explicit config file path, bypassing ancestor directory search.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Arbitrary compiler-option hints (after `--`), passed through to the
    /// parser's language-standard/include-path selection where it exposes
    /// one.
    #[arg(last = true)]
    pub passthrough: Vec<String>,
}

impl Cli {
    /// `--jobs 0` (the default) defers thread-count selection to
    /// `rayon`'s own default (number of logical CPUs); an explicit value
    /// is passed straight through.
    pub fn worker_count(&self) -> Option<usize> {
        (self.jobs != 0).then_some(self.jobs)
    }
}
