use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use twine_logger::MessageTape;

/// Inspect a twine message tape captured by the recorder.
#[derive(Parser)]
#[command(name = "twine-logger", version, about)]
struct Cli {
    /// Path to a tape file (JSONL)
    tape: PathBuf,

    /// Show outbound messages only
    #[arg(long, conflicts_with = "received")]
    sent: bool,

    /// Show inbound messages only
    #[arg(long)]
    received: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut tape = MessageTape::read_jsonl_from_path(&cli.tape)?;
    if cli.sent {
        tape.entries.retain(|e| e.message.is_sent);
    } else if cli.received {
        tape.entries.retain(|e| !e.message.is_sent);
    }

    print!("{}", tape.table().render());
    Ok(())
}
