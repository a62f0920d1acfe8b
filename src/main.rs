use clap::Parser;
use momentum_screener::cli::{init_logging, run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    run(cli)
}
