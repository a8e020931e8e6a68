use std::sync::Arc;

use clap::Parser;
use coi_serve::config::{AppState, CliArgs, Config};
use coi_serve::{logger, server};
use tokio::sync::Notify;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let cfg = Config::load(&args)?;
    logger::init(&cfg)?;

    // Create the Tokio runtime, sized by the workers setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    match cfg.server.workers {
        Some(0) => return Err("server.workers must be at least 1".into()),
        Some(workers) => {
            runtime_builder.worker_threads(workers);
        }
        None => {}
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(cfg)?);

    let listener =
        server::create_listener(addr).map_err(|e| format!("Failed to bind {addr}: {e}"))?;
    let bound_addr = listener.local_addr()?;

    logger::log_serving_banner(&bound_addr, &state);
    logger::log_server_start(&bound_addr, &state.config);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));
    server::run_server_loop(listener, state, shutdown).await;

    Ok(())
}
