//! medis-cli: interactive client.
//!
//! Reads one command per line from stdin, forwards it to the server and
//! prints the raw reply. `exit` and `quit` end the session without being sent.

use clap::Parser;
use medis::client;
use medis::config::CliConfig;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "medis> ";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut client = client::connect(config.address()).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        let line = line.trim();
        if line == "exit" || line == "quit" {
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }

        let reply = client.run_command(line).await?;
        println!("{}", reply);
    }
}
