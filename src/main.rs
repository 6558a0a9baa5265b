use clap::Parser;

use progmon::cli;
use progmon::cli::Args;
use progmon::error::Result;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    cli::run(args).await?;
    Ok(())
}
