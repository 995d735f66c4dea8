//! Hiroba chat room server.
//!
//! Serves one shared chat room over WebSocket at `/ws`, a small JSON API
//! under `/api`, and static files for everything else.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server -- --data-file room.json
//! ```

use clap::Parser;
use hiroba_server::ServerArgs;
use hiroba_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = hiroba_server::run_server(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
