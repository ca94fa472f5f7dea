//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use giveaway_core::users::{NewUser, User};

/// Database model for users
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserDB {
    pub fn new(id: String, new_user: NewUser) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
            full_name: None,
            phone_number: None,
            bank_name: None,
            account_number: None,
            account_name: None,
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            full_name: db.full_name,
            phone_number: db.phone_number,
            bank_name: db.bank_name,
            account_number: db.account_number,
            account_name: db.account_name,
            balance: db.balance,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
