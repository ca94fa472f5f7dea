use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use giveaway_core::campaigns::{
    Campaign, CampaignDraft, CampaignRepositoryTrait, CampaignStatus, CampaignSummary,
};
use giveaway_core::errors::{Error, Result};
use giveaway_core::participation::ParticipationError;

use super::model::CampaignDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{campaigns, participations};

/// Loads one campaign on the given connection.
pub(crate) fn load_campaign(
    conn: &mut SqliteConnection,
    campaign_id: &str,
) -> Result<Option<Campaign>> {
    campaigns::table
        .find(campaign_id)
        .select(CampaignDB::as_select())
        .first::<CampaignDB>(conn)
        .optional()
        .into_core()?
        .map(Campaign::try_from)
        .transpose()
}

/// `UPDATE campaigns SET status = to WHERE id = ? AND status = from`.
///
/// Returns whether a row changed, so only one caller can win a given
/// transition.
pub(crate) fn transition_status(
    conn: &mut SqliteConnection,
    campaign_id: &str,
    from: CampaignStatus,
    to: CampaignStatus,
) -> Result<bool> {
    let changed = diesel::update(
        campaigns::table
            .filter(campaigns::id.eq(campaign_id))
            .filter(campaigns::status.eq(from.as_str())),
    )
    .set((
        campaigns::status.eq(to.as_str()),
        campaigns::updated_at.eq(chrono::Utc::now().naive_utc()),
    ))
    .execute(conn)
    .into_core()?;
    Ok(changed == 1)
}

/// Repository for managing campaign data in the database
pub struct CampaignRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CampaignRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CampaignRepositoryTrait for CampaignRepository {
    async fn create(&self, draft: CampaignDraft) -> Result<Campaign> {
        self.writer
            .exec(move |conn| -> Result<Campaign> {
                let campaign_db = CampaignDB::from_draft(Uuid::new_v4().to_string(), draft)?;
                diesel::insert_into(campaigns::table)
                    .values(&campaign_db)
                    .execute(conn)
                    .into_core()?;
                Campaign::try_from(campaign_db)
            })
            .await
    }

    fn get_by_id(&self, campaign_id: &str) -> Result<Campaign> {
        let mut conn = get_connection(&self.pool)?;
        load_campaign(&mut conn, campaign_id)?.ok_or_else(|| Error::campaign_not_found(campaign_id))
    }

    fn get_summary(&self, campaign_id: &str) -> Result<CampaignSummary> {
        let mut conn = get_connection(&self.pool)?;
        // Both reads share one read transaction and therefore one WAL snapshot.
        conn.transaction::<_, StorageError, _>(|c| {
            let campaign = load_campaign(c, campaign_id)?
                .ok_or_else(|| Error::campaign_not_found(campaign_id))?;
            let current_participants = participations::table
                .filter(participations::campaign_id.eq(campaign_id))
                .count()
                .get_result::<i64>(c)?;
            Ok(CampaignSummary {
                campaign,
                current_participants,
            })
        })
        .map_err(Error::from)
    }

    fn list(&self, creator_id: Option<&str>) -> Result<Vec<Campaign>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = campaigns::table.into_boxed();
        if let Some(creator) = creator_id {
            query = query.filter(campaigns::creator_id.eq(creator));
        }

        query
            .select(CampaignDB::as_select())
            .order((campaigns::created_at.desc(), campaigns::id.asc()))
            .load::<CampaignDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Campaign::try_from)
            .collect()
    }

    async fn cancel(&self, campaign_id: &str) -> Result<Campaign> {
        let campaign_id = campaign_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Campaign> {
                let campaign = load_campaign(conn, &campaign_id)?
                    .ok_or_else(|| Error::campaign_not_found(&campaign_id))?;
                if !transition_status(
                    conn,
                    &campaign_id,
                    CampaignStatus::Active,
                    CampaignStatus::Cancelled,
                )? {
                    debug!("Refusing to cancel {} campaign {}", campaign.status, campaign_id);
                    return Err(ParticipationError::CampaignNotActive {
                        campaign_id,
                        status: campaign.status.to_string(),
                    }
                    .into());
                }
                load_campaign(conn, &campaign_id)?
                    .ok_or_else(|| Error::campaign_not_found(&campaign_id))
            })
            .await
    }
}
