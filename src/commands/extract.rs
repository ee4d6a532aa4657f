//! The `extract` command: the only command this CLI exposes. Wires CLI
//! args, config-file defaults, parallel per-file extraction, and output
//! assembly into one pipeline.

use crate::ast::decl::declarations_in;
use crate::ast::parser;
use crate::ast::{DeclKind, Scope};
use crate::cli::Cli;
use crate::config::Config;
use crate::core::Document;
use crate::error::{AppError, CliError, ParseError};
use crate::extraction::{extract_function, extract_struct};
use crate::graph::builder::collect_user_function_names;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const RECOGNIZED_EXTENSIONS: &[&str] = &["c", "h", "cpp", "cc", "cxx", "hpp", "hh"];

/// Rejects empty input and files whose extension isn't one this crate's
/// `tree-sitter` grammar selection (§4.1) knows how to dispatch — a
/// `CliError` (exit code 2), diagnosed before any file is even opened.
fn validate_args(files: &[PathBuf]) -> Result<(), CliError> {
    if files.is_empty() {
        return Err(CliError::NoInputFiles);
    }
    for path in files {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !RECOGNIZED_EXTENSIONS.contains(&ext) {
            return Err(CliError::InvalidArgument(format!(
                "unrecognized file extension in {}: expected one of {:?}",
                path.display(),
                RECOGNIZED_EXTENSIONS
            )));
        }
    }
    Ok(())
}

/// The flags that actually reach the extractors, after folding CLI
/// overrides onto config-file defaults (explicit flags always win).
#[derive(Debug, Clone, Copy)]
struct Options {
    with_source: bool,
    with_graphs: bool,
    with_sizes: bool,
    main_only: bool,
    no_functions: bool,
    no_structs: bool,
}

fn merge_options(cli: &Cli, config: &Config) -> Options {
    let no_sizes = cli.no_sizes || config.no_sizes.unwrap_or(false);
    Options {
        with_source: cli.with_source || config.with_source.unwrap_or(false),
        with_graphs: cli.with_graphs || config.with_graphs.unwrap_or(false),
        with_sizes: !no_sizes,
        main_only: cli.main_only || config.main_only.unwrap_or(false),
        no_functions: cli.no_functions,
        no_structs: cli.no_structs,
    }
}

fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => crate::config::load_explicit(path),
        None => {
            let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            crate::config::load_from_ancestors(&start)
        }
    }
}

/// Fails fast on the first input path that can't even be read, before any
/// extraction work starts or any output is written — an unreadable input
/// file is fatal, diagnosed before output.
fn check_inputs_readable(files: &[PathBuf]) -> Result<(), ParseError> {
    for path in files {
        std::fs::metadata(path).map_err(|source| ParseError::UnreadableFile {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

fn extract_one_file(path: &Path, options: Options) -> Result<Document, ParseError> {
    let tu = parser::parse(path)?;
    // `collect_user_function_names` needs every declaration the file
    // contains, including ones `--main-only` will go on to drop, so the
    // graph builder can still recognize calls to them as user functions.
    let all_decls = declarations_in(&tu, Scope::NonSystem);
    let user_functions = collect_user_function_names(&all_decls);
    let scope = if options.main_only {
        Scope::MainFile
    } else {
        Scope::NonSystem
    };
    let decls: Vec<_> = all_decls
        .into_iter()
        .filter(|d| scope.includes(&tu, d.node))
        .collect();

    let mut document = Document::default();
    for decl in decls {
        match decl.kind {
            DeclKind::Struct if !options.no_structs => {
                document.structs.push(extract_struct(
                    &decl,
                    options.with_sizes,
                    options.with_source,
                    options.with_graphs,
                    &user_functions,
                ));
            }
            DeclKind::Function if !options.no_functions => {
                document.functions.push(extract_function(
                    &decl,
                    options.with_source,
                    options.with_graphs,
                    &user_functions,
                ));
            }
            _ => {}
        }
    }
    Ok(document)
}

/// Runs the full pipeline and returns the assembled document in
/// command-line file order, or the first fatal [`AppError`].
pub fn run(cli: &Cli) -> Result<Document, AppError> {
    validate_args(&cli.files)?;
    check_inputs_readable(&cli.files)?;

    let config = load_config(cli);
    if !config.default_args.is_empty() || !cli.passthrough.is_empty() {
        tracing::debug!(
            "compiler-option hints recorded (no real preprocessor to apply them to): {:?} {:?}",
            config.default_args,
            cli.passthrough
        );
    }
    let options = merge_options(cli, &config);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.worker_count().unwrap_or(0))
        .build()
        .map_err(|err| AppError::Extract(crate::error::ExtractError::Failed(err.to_string())))?;

    let results: Vec<(PathBuf, Option<Document>)> = pool.install(|| {
        cli.files
            .par_iter()
            .map(|path| {
                let fragment = match extract_one_file(path, options) {
                    Ok(document) => Some(document),
                    Err(err) => {
                        tracing::warn!("skipping {}: {err}", path.display());
                        None
                    }
                };
                (path.clone(), fragment)
            })
            .collect()
    });

    let mut fragments = Vec::with_capacity(results.len());
    let mut any_succeeded = false;
    for (path, fragment) in results {
        match fragment {
            Some(document) => {
                any_succeeded = true;
                fragments.push(document);
            }
            None => {
                let _ = path;
            }
        }
    }

    if !any_succeeded && !cli.files.is_empty() {
        return Err(AppError::Extract(crate::error::ExtractError::Failed(
            "no input file produced output".to_string(),
        )));
    }

    Ok(crate::output::assemble(fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("cstructinfo-extractcmd-test-{name}.c"));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn no_input_files_is_a_cli_usage_error() {
        let cli = Cli::parse_from(["cstructinfo"]);
        let err = run(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unrecognized_extension_is_a_cli_usage_error() {
        let cli = Cli::parse_from(["cstructinfo", "a.rs"]);
        let err = run(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_input_file_is_fatal_before_any_output() {
        let cli = Cli::parse_from(["cstructinfo", "/no/such/file.c"]);
        let err = run(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn extracts_structs_and_functions_from_real_files() {
        let path = write_temp(
            "basic",
            "struct Point { int x; int y; };\nint add(int a, int b) { return a + b; }\n",
        );
        let cli = Cli::parse_from(["cstructinfo", path.to_str().unwrap()]);
        let document = run(&cli).unwrap();
        assert_eq!(document.structs.len(), 1);
        assert_eq!(document.functions.len(), 1);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn no_functions_flag_omits_function_extraction() {
        let path = write_temp("nofuncs", "int add(int a, int b) { return a + b; }\n");
        let cli = Cli::parse_from(["cstructinfo", path.to_str().unwrap(), "--no-functions"]);
        let document = run(&cli).unwrap();
        assert!(document.functions.is_empty());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn multiple_files_preserve_command_line_order() {
        let a = write_temp("order-a", "int a_fn(void) { return 1; }\n");
        let b = write_temp("order-b", "int b_fn(void) { return 2; }\n");
        let cli = Cli::parse_from(["cstructinfo", a.to_str().unwrap(), b.to_str().unwrap()]);
        let document = run(&cli).unwrap();
        assert_eq!(document.functions[0].name, "a_fn");
        assert_eq!(document.functions[1].name, "b_fn");
        let _ = fs::remove_file(a);
        let _ = fs::remove_file(b);
    }
}
