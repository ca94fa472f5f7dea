use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use giveaway_core::campaigns::Campaign;
use giveaway_core::errors::{Error, Result, ValidationError};
use giveaway_core::users::{JoinedCampaign, NewUser, User, UserRepositoryTrait};

use super::model::UserDB;
use crate::campaigns::CampaignDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::{campaigns, participations, users};

/// Repository for participant accounts and balances
pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn| -> Result<User> {
                let user_db = UserDB::new(Uuid::new_v4().to_string(), new_user);
                match diesel::insert_into(users::table)
                    .values(&user_db)
                    .execute(conn)
                {
                    Ok(_) => Ok(user_db.into()),
                    Err(e) if is_unique_violation(&e) => Err(ValidationError::invalid_field(
                        "email",
                        format!("{} is already registered", user_db.email),
                    )
                    .into()),
                    Err(e) => Err(StorageError::from(e).into()),
                }
            })
            .await
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(User::from)
            .ok_or_else(|| Error::user_not_found(user_id))
    }

    fn list_joined_campaigns(&self, user_id: &str) -> Result<Vec<JoinedCampaign>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = participations::table
            .inner_join(campaigns::table)
            .filter(participations::user_id.eq(user_id))
            .order(participations::joined_at.desc())
            .select((
                CampaignDB::as_select(),
                participations::join_position,
                participations::amount_received,
                participations::joined_at,
            ))
            .load::<(CampaignDB, i64, i64, chrono::NaiveDateTime)>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|(campaign_db, join_position, amount_received, joined_at)| {
                Ok(JoinedCampaign {
                    campaign: Campaign::try_from(campaign_db)?,
                    join_position,
                    amount_received,
                    joined_at,
                })
            })
            .collect()
    }
}
