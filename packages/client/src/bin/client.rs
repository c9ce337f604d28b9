//! Terminal chat client.
//!
//! Connects to a Hanashi server as the given user id, prints the
//! conversation and sends every typed line as a chat message.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hanashi-client -- --id 1
//! ```

use clap::Parser;
use hanashi_client::{
    ClientConfig, domain::UserId, run_client, session::NoReconnect, ui::ConsoleSink,
};
use hanashi_shared::logger::setup_logger;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Line typed to leave the chat
const QUIT_COMMAND: &str = "/quit";

#[derive(Parser, Debug)]
#[command(name = "hanashi-client")]
#[command(version, about = "Terminal client for the Hanashi chat server")]
struct Args {
    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Your user id (must be known to the server)
    #[arg(long)]
    id: i64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ClientConfig::new(args.host, args.port, UserId::new(args.id)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    spawn_input_reader(input_tx);

    match run_client(config, ConsoleSink::new(), input_rx, NoReconnect).await {
        Ok(reason) if reason.is_error() => {
            tracing::warn!("Client finished: {}", reason);
            std::process::exit(1);
        }
        Ok(reason) => tracing::debug!("Client finished: {}", reason),
        Err(e) => {
            tracing::error!("Client error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Read lines on a dedicated thread; dropping `tx` tells the runner to leave.
///
/// The thread is never joined: a blocked read must not keep the process alive.
fn spawn_input_reader(tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to initialize line editor: {}", e);
                return;
            }
        };

        loop {
            match editor.readline("") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == QUIT_COMMAND {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Err(e) = editor.add_history_entry(trimmed) {
                        tracing::debug!("History not updated: {}", e);
                    }
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
}
