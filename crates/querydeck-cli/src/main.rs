use std::process::ExitCode;

use clap::Parser;
use querydeck_cli::{dispatch, output, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    querydeck::logging::init(cli.verbose);

    match dispatch(&cli).await {
        Ok(out) => match output::emit(&mut std::io::stdout().lock(), &out) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: failed to write output: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
