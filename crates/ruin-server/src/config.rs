use std::{
    env,
    net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr},
};

use api::state::DEFAULT_MAX_SIMULATIONS;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000);

const ENV_ADDR_KEY: &str = "RUIN_SERVER_ADDR";
const ENV_THREADS_KEY: &str = "RUIN_SIM_THREADS";
const ENV_MAX_SIMULATIONS_KEY: &str = "RUIN_MAX_SIMULATIONS";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Size of the rayon pool used for trials. `None` keeps rayon's default.
    pub sim_threads: Option<usize>,
    pub max_simulations: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RUIN_SERVER_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("RUIN_SIM_THREADS must be a positive integer")]
    InvalidSimThreads,
    #[error("RUIN_MAX_SIMULATIONS must be a positive integer")]
    InvalidMaxSimulations,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR_KEY)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR,
        };

        let sim_threads = match read_env(ENV_THREADS_KEY)? {
            Some(value) => Some(
                parse_positive::<usize>(&value).ok_or(ConfigError::InvalidSimThreads)?,
            ),
            None => None,
        };

        let max_simulations = match read_env(ENV_MAX_SIMULATIONS_KEY)? {
            Some(value) => {
                parse_positive::<u64>(&value).ok_or(ConfigError::InvalidMaxSimulations)?
            }
            None => DEFAULT_MAX_SIMULATIONS,
        };

        Ok(Self {
            listen_addr,
            sim_threads,
            max_simulations,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_positive<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|parsed| *parsed > T::default())
}
