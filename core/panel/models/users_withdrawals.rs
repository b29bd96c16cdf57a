

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use crate::schema::users_withdrawals;
use super::funding::{FundingRequest, NewFundingRequest, RequestKind, RequestStatus};


/*

    diesel migration generate users_withdrawals ---> create users_withdrawals migration sql files
    diesel migration run                        ---> apply sql files to db
    diesel migration redo                       ---> drop tables

*/

#[derive(Identifiable, Selectable, Queryable, Clone, Debug, PartialEq)]
#[diesel(table_name=users_withdrawals)]
pub struct UserWithdrawal{ /* note that the ordering of fields must be the same as the table fields in up.sql */
    pub id: i32,
    pub user_id: i32,
    pub amount: i64,
    pub wallet_address: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name=users_withdrawals)]
pub struct NewUserWithdrawal{
    pub user_id: i32,
    pub amount: i64,
    pub wallet_address: String,
}

impl From<UserWithdrawal> for FundingRequest{
    fn from(withdrawal: UserWithdrawal) -> Self{
        FundingRequest{
            id: withdrawal.id,
            user_id: withdrawal.user_id,
            kind: RequestKind::Withdrawal,
            amount: withdrawal.amount,
            destination: withdrawal.wallet_address,
            status: withdrawal.status,
            created_at: withdrawal.created_at,
            decided_at: withdrawal.decided_at,
        }
    }
}

impl From<&NewFundingRequest> for NewUserWithdrawal{
    fn from(request: &NewFundingRequest) -> Self{
        NewUserWithdrawal{
            user_id: request.user_id,
            amount: request.amount,
            wallet_address: request.destination.clone(),
        }
    }
}
