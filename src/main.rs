use clap::Parser;
use macrosig::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
