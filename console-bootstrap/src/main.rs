use std::process::ExitCode;

use clap::Parser;
use console_interfaces_cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(config) = &cli.config {
        std::env::set_var(console_infrastructure::CONFIG_ENV, config);
    }

    match console_bootstrap::run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(70)
        }
    }
}
