

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use crate::schema::sessions;


/* an opaque login session, the token is the primary key */
#[derive(Queryable, Selectable, Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name=sessions)]
pub struct Session{
    pub token: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session{

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool{
        now >= self.expires_at
    }

}
