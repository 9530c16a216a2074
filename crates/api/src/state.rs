use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

pub const DEFAULT_MAX_SIMULATIONS: u64 = 10_000_000;

/// Service limits handed to the router by the server binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    pub max_simulations: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_simulations: DEFAULT_MAX_SIMULATIONS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    config: ApiConfig,
    next_run_id: Arc<AtomicU64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            next_run_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Numbers runs for log correlation. Wraps instead of failing.
    pub fn next_run_id(&self) -> u64 {
        self.next_run_id
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1)
    }
}
