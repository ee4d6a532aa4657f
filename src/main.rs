use clap::Parser;
use colored::Colorize;
use cstructinfo::cli::Cli;
use cstructinfo::commands::extract;
use cstructinfo::observability::init_tracing;
use cstructinfo::output::write_json;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match extract::run(&cli) {
        Ok(document) => {
            if write_json(&document, &mut std::io::stdout()).is_err() {
                eprintln!("{} failed to write output", "error:".red().bold());
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            std::process::exit(err.exit_code());
        }
    }
}
