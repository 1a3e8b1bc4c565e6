use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => taskboard::tui::run(cli.api_url.as_deref()).await,
        Some(_) => handlers::dispatch(cli).await,
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
