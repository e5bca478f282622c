use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use wire_http::server::Server;

use crate::routes::Routes;

mod routes;

#[derive(Parser, Debug)]
#[command(name = "httpserver")]
#[command(about = "Demo HTTP/1.1 server with an httpbin pass-through", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:42069")]
    address: String,

    /// Base URL that `/httpbin/*` requests are relayed to
    #[arg(short, long, default_value = "http://httpbin.org")]
    upstream: String,

    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(args.log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        std::process::exit(1);
    }

    let server = match Server::builder().address(args.address).handler(Routes::new(args.upstream)).build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };

    let handle = match server.start().await {
        Ok(handle) => handle,
        Err(e) => {
            error!(cause = %e, "error starting server");
            std::process::exit(1);
        }
    };
    info!(address = %handle.local_addr(), "server started");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "failed to listen for shutdown signal");
    }

    handle.stop().await;
    info!("server gracefully stopped");
}
