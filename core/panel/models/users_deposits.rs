

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use crate::schema::users_deposits;
use super::funding::{FundingRequest, NewFundingRequest, RequestKind, RequestStatus};


/*

    diesel migration generate users_deposits ---> create users_deposits migration sql files
    diesel migration run                     ---> apply sql files to db
    diesel migration redo                    ---> drop tables

*/

#[derive(Identifiable, Selectable, Queryable, Clone, Debug, PartialEq)]
#[diesel(table_name=users_deposits)]
pub struct UserDeposit{ /* note that the ordering of fields must be the same as the table fields in up.sql */
    pub id: i32,
    pub user_id: i32,
    pub amount: i64,
    pub coin: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name=users_deposits)]
pub struct NewUserDeposit{
    pub user_id: i32,
    pub amount: i64,
    pub coin: String,
}

impl From<UserDeposit> for FundingRequest{
    fn from(deposit: UserDeposit) -> Self{
        FundingRequest{
            id: deposit.id,
            user_id: deposit.user_id,
            kind: RequestKind::Deposit,
            amount: deposit.amount,
            destination: deposit.coin,
            status: deposit.status,
            created_at: deposit.created_at,
            decided_at: deposit.decided_at,
        }
    }
}

impl From<&NewFundingRequest> for NewUserDeposit{
    fn from(request: &NewFundingRequest) -> Self{
        NewUserDeposit{
            user_id: request.user_id,
            amount: request.amount,
            coin: request.destination.clone(),
        }
    }
}
