// Network monitor CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.

mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "netmon")]
#[command(about = "Network monitor CLI - Log and query connectivity events")]
#[command(version)]
pub struct Cli {
    /// API base URL (include any API_PREFIX the server uses)
    #[arg(long, env = "NETMON_API_URL", default_value = "http://localhost:9000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log and query connectivity events
    Events {
        #[command(subcommand)]
        command: commands::events::EventsCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = client::Client::new(&cli.api_url);
    let output_format = output::OutputFormat::parse(&cli.output);

    match cli.command {
        Commands::Events { command } => {
            commands::events::run(command, &client, output_format, cli.quiet).await
        }
    }
}
