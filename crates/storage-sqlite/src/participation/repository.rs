use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use giveaway_core::errors::Result;
use giveaway_core::participation::{
    join_within, settle_within, JoinOutcome, JoinRequest, Participation,
    ParticipationRepositoryTrait,
};
use giveaway_core::settlement::{RandomSource, Settlement};

use super::ledger::SqliteLedger;
use super::model::{ParticipationDB, SettlementDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{participations, settlements};

/// Repository for the participation ledger.
///
/// Joins and settlements run on the writer actor so that each one is a single
/// IMMEDIATE transaction; reads use pooled connections and see committed rows
/// only.
pub struct ParticipationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ParticipationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ParticipationRepositoryTrait for ParticipationRepository {
    async fn join(
        &self,
        request: JoinRequest,
        random: Arc<dyn RandomSource>,
    ) -> Result<JoinOutcome> {
        self.writer
            .exec(move |conn| {
                let mut ledger = SqliteLedger::new(conn);
                join_within(&mut ledger, &request, random.as_ref())
            })
            .await
    }

    async fn settle(
        &self,
        campaign_id: &str,
        random: Arc<dyn RandomSource>,
    ) -> Result<Settlement> {
        let campaign_id = campaign_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut ledger = SqliteLedger::new(conn);
                settle_within(&mut ledger, &campaign_id, random.as_ref())
            })
            .await
    }

    fn count_joined(&self, campaign_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        participations::table
            .filter(participations::campaign_id.eq(campaign_id))
            .count()
            .get_result(&mut conn)
            .into_core()
    }

    fn has_joined(&self, user_id: &str, campaign_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = participations::table
            .filter(participations::campaign_id.eq(campaign_id))
            .filter(participations::user_id.eq(user_id))
            .select(participations::id)
            .first::<String>(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.is_some())
    }

    fn list_joined(&self, campaign_id: &str) -> Result<Vec<Participation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = participations::table
            .filter(participations::campaign_id.eq(campaign_id))
            .order(participations::join_position.asc())
            .select(ParticipationDB::as_select())
            .load::<ParticipationDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Participation::from).collect())
    }

    fn get_settlement(&self, campaign_id: &str) -> Result<Option<Settlement>> {
        let mut conn = get_connection(&self.pool)?;
        settlements::table
            .find(campaign_id)
            .select(SettlementDB::as_select())
            .first::<SettlementDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Settlement::try_from)
            .transpose()
    }
}
