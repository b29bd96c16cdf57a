

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use crate::misc::format_amount;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Requeststatus"]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus{
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind{
    Deposit,
    Withdrawal,
}

/* an admin decision over a pending request */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision{
    Approve,
    Reject,
}

/*
    deposits and withdrawals are structurally the same thing, the
    destination is the coin of a deposit or the wallet address of
    a withdrawal
*/
#[derive(Clone, Debug, PartialEq)]
pub struct FundingRequest{
    pub id: i32,
    pub user_id: i32,
    pub kind: RequestKind,
    pub amount: i64,
    pub destination: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewFundingRequest{
    pub user_id: i32,
    pub kind: RequestKind,
    pub amount: i64,
    pub destination: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepositRequest{
    pub amount: String,
    pub coin: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WithdrawalRequest{
    pub amount: String,
    pub wallet: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FundingRequestData{
    pub id: i32,
    pub user_id: i32,
    pub kind: RequestKind,
    pub amount: String,
    pub destination: String,
    pub status: RequestStatus,
    pub created_at: String,
    pub decided_at: Option<String>,
}

impl From<&FundingRequest> for FundingRequestData{
    fn from(request: &FundingRequest) -> Self{
        FundingRequestData{
            id: request.id,
            user_id: request.user_id,
            kind: request.kind,
            amount: format_amount(request.amount),
            destination: request.destination.clone(),
            status: request.status,
            created_at: request.created_at.to_rfc3339(),
            decided_at: request.decided_at.map(|d| d.to_rfc3339()),
        }
    }
}

impl RequestKind{

    pub fn label(&self) -> &'static str{
        match self{
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
        }
    }

    /* how an approval moves the owner balance */
    pub fn signed(&self, amount: i64) -> i64{
        match self{
            Self::Deposit => amount,
            Self::Withdrawal => -amount,
        }
    }

}

impl Decision{

    pub fn status(&self) -> RequestStatus{
        match self{
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }

}
