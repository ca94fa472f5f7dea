use std::sync::Arc;

use crate::config::Config;
use giveaway_core::{
    campaigns::{CampaignService, CampaignServiceTrait},
    participation::{ParticipationService, ParticipationServiceTrait},
    settlement::{RandomSource, SeededRandomSource, ThreadRandomSource},
    users::{UserService, UserServiceTrait},
};
use giveaway_storage_sqlite::{
    db, CampaignRepository, ParticipationRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub campaign_service: Arc<dyn CampaignServiceTrait>,
    pub participation_service: Arc<dyn ParticipationServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
}

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded through the subscriber's `tracing-log` bridge.
pub fn init_tracing() {
    let log_format = std::env::var("GIVEAWAY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(&pool)?;

    let random: Arc<dyn RandomSource> = match config.rng_seed {
        Some(seed) => {
            tracing::warn!("Random winner selection is seeded ({}); draws are reproducible", seed);
            Arc::new(SeededRandomSource::new(seed))
        }
        None => Arc::new(ThreadRandomSource),
    };

    let campaign_repository = Arc::new(CampaignRepository::new(pool.clone(), writer.clone()));
    let participation_repository =
        Arc::new(ParticipationRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));

    let campaign_service = Arc::new(CampaignService::new(
        campaign_repository.clone(),
        participation_repository.clone(),
        config.limits,
    ));
    let participation_service = Arc::new(ParticipationService::new(
        participation_repository,
        campaign_repository,
        random,
    ));
    let user_service = Arc::new(UserService::new(user_repository));

    Ok(Arc::new(AppState {
        campaign_service,
        participation_service,
        user_service,
    }))
}
