mod config;
mod wiring;

use std::error::Error;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = config::Config::from_env()?;
    configure_sim_pool(config.sim_threads)?;

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        addr = %config.listen_addr,
        sim_threads = rayon::current_num_threads(),
        max_simulations = config.max_simulations,
        "gambler's ruin server listening"
    );

    axum::serve(listener, wiring::build_app(&config)).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn configure_sim_pool(threads: Option<usize>) -> Result<(), rayon::ThreadPoolBuildError> {
    match threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("ruin-sim-{index}"))
            .build_global(),
        None => Ok(()),
    }
}
