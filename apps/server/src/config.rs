use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use giveaway_core::campaigns::CampaignLimits;
use giveaway_core::constants::{
    MINIMUM_PARTICIPANTS, MINIMUM_PER_PERSON, MINIMUM_TOTAL_AMOUNT, RANDOM_PARTICIPANT_MULTIPLIER,
};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub limits: CampaignLimits,
    /// Makes random winner selection reproducible when set.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("GIVEAWAY_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid GIVEAWAY_LISTEN_ADDR")?;
        let db_path = std::env::var("GIVEAWAY_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("GIVEAWAY_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("GIVEAWAY_REQUEST_TIMEOUT_MS", 30000)?;

        let limits = CampaignLimits {
            min_total_amount: env_or("GIVEAWAY_MIN_TOTAL_AMOUNT", MINIMUM_TOTAL_AMOUNT)?,
            min_per_person: env_or("GIVEAWAY_MIN_PER_PERSON", MINIMUM_PER_PERSON)?,
            min_participants: MINIMUM_PARTICIPANTS,
            random_multiplier: env_or(
                "GIVEAWAY_RANDOM_MULTIPLIER",
                RANDOM_PARTICIPANT_MULTIPLIER,
            )?,
        };
        if limits.min_per_person <= 0 || limits.random_multiplier <= 0 {
            anyhow::bail!(
                "GIVEAWAY_MIN_PER_PERSON and GIVEAWAY_RANDOM_MULTIPLIER must be positive"
            );
        }

        let rng_seed = match std::env::var("GIVEAWAY_RNG_SEED") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .context("Invalid GIVEAWAY_RNG_SEED")?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            limits,
            rng_seed,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_var(key, std::env::var(key).ok(), default)
}

fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", key)),
        None => Ok(default),
    }
}
