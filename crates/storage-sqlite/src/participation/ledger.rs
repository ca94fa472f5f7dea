//! `LedgerTransaction` over a connection that is already inside the writer's
//! IMMEDIATE transaction.

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::error;
use uuid::Uuid;

use giveaway_core::campaigns::{Campaign, CampaignStatus};
use giveaway_core::errors::{Error, Result};
use giveaway_core::participation::{
    LedgerTransaction, NewParticipation, Participation, ParticipationError, PayoutDetails,
};
use giveaway_core::settlement::Settlement;

use super::model::{ParticipationDB, SettlementDB};
use crate::campaigns::{load_campaign, transition_status};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::{participations, settlements, users};

pub struct SqliteLedger<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteLedger<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl LedgerTransaction for SqliteLedger<'_> {
    fn find_campaign(&mut self, campaign_id: &str) -> Result<Option<Campaign>> {
        load_campaign(self.conn, campaign_id)
    }

    fn user_exists(&mut self, user_id: &str) -> Result<bool> {
        let found = users::table
            .find(user_id)
            .select(users::id)
            .first::<String>(self.conn)
            .optional()
            .into_core()?;
        Ok(found.is_some())
    }

    fn count_joined(&mut self, campaign_id: &str) -> Result<i64> {
        participations::table
            .filter(participations::campaign_id.eq(campaign_id))
            .count()
            .get_result(self.conn)
            .into_core()
    }

    fn has_joined(&mut self, user_id: &str, campaign_id: &str) -> Result<bool> {
        let found = participations::table
            .filter(participations::campaign_id.eq(campaign_id))
            .filter(participations::user_id.eq(user_id))
            .select(participations::id)
            .first::<String>(self.conn)
            .optional()
            .into_core()?;
        Ok(found.is_some())
    }

    fn record_join(&mut self, entry: NewParticipation) -> Result<Participation> {
        let (user_id, campaign_id) = (entry.user_id.clone(), entry.campaign_id.clone());
        let row = ParticipationDB::new(Uuid::new_v4().to_string(), entry);
        match diesel::insert_into(participations::table)
            .values(&row)
            .execute(self.conn)
        {
            Ok(_) => Ok(row.into()),
            // (campaign_id, user_id) is unique; a position clash cannot happen
            // while writes are serialised.
            Err(e) if is_unique_violation(&e) => Err(ParticipationError::DuplicateJoin {
                user_id,
                campaign_id,
            }
            .into()),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    fn save_payout_profile(&mut self, user_id: &str, details: &PayoutDetails) -> Result<()> {
        diesel::update(users::table.find(user_id))
            .set((
                users::full_name.eq(&details.full_name),
                users::phone_number.eq(&details.phone_number),
                users::bank_name.eq(&details.bank_name),
                users::account_number.eq(&details.account_number),
                users::account_name.eq(&details.account_name),
                users::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(self.conn)
            .into_core()?;
        Ok(())
    }

    fn list_joined(&mut self, campaign_id: &str) -> Result<Vec<Participation>> {
        let rows = participations::table
            .filter(participations::campaign_id.eq(campaign_id))
            .order(participations::join_position.asc())
            .select(ParticipationDB::as_select())
            .load::<ParticipationDB>(self.conn)
            .into_core()?;
        Ok(rows.into_iter().map(Participation::from).collect())
    }

    fn transition_status(
        &mut self,
        campaign_id: &str,
        from: CampaignStatus,
        to: CampaignStatus,
    ) -> Result<bool> {
        transition_status(self.conn, campaign_id, from, to)
    }

    fn credit_balance(&mut self, user_id: &str, amount: i64) -> Result<()> {
        let changed = diesel::update(users::table.find(user_id))
            .set((
                users::balance.eq(users::balance + amount),
                users::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(self.conn)
            .into_core()?;
        if changed != 1 {
            return Err(Error::user_not_found(user_id));
        }
        Ok(())
    }

    fn record_payout(&mut self, participation_id: &str, amount: i64) -> Result<()> {
        let changed = diesel::update(participations::table.find(participation_id))
            .set(participations::amount_received.eq(amount))
            .execute(self.conn)
            .into_core()?;
        if changed != 1 {
            return Err(Error::NotFound(format!(
                "Participation {} not found",
                participation_id
            )));
        }
        Ok(())
    }

    fn record_settlement(&mut self, settlement: &Settlement) -> Result<()> {
        let row = SettlementDB::try_from(settlement)?;
        diesel::insert_into(settlements::table)
            .values(&row)
            .execute(self.conn)
            .into_core()?;
        Ok(())
    }

    fn savepoint<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        // Nested inside the writer's transaction this issues SAVEPOINT /
        // RELEASE / ROLLBACK TO.
        AnsiTransactionManager::begin_transaction(self.conn).into_core()?;
        match f(self) {
            Ok(value) => {
                AnsiTransactionManager::commit_transaction(self.conn).into_core()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = AnsiTransactionManager::rollback_transaction(self.conn) {
                    error!("Failed to roll back savepoint: {}", rollback);
                    return Err(StorageError::from(rollback).into());
                }
                Err(err)
            }
        }
    }
}
