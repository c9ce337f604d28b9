//! Hanashi hub server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hanashi-server -- --user 1:Alice --user 2:Bob
//! ```

use clap::Parser;
use hanashi_server::{
    ServerConfig,
    domain::{UserId, UserName, UserTable, ValueObjectError},
};
use hanashi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hanashi-server")]
#[command(about = "WebSocket hub for the Hanashi chat client", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Registered user as `<id>:<name>`; repeat for more users
    #[arg(short = 'u', long = "user", value_parser = parse_user)]
    users: Vec<(UserId, UserName)>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_user(entry: &str) -> Result<(UserId, UserName), ValueObjectError> {
    UserTable::parse_entry(entry)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let users = if args.users.is_empty() {
        UserTable::with_defaults()
    } else {
        UserTable::new(args.users)
    };
    let config = ServerConfig::new(args.host, args.port, users);

    // Run the server
    if let Err(e) = hanashi_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
