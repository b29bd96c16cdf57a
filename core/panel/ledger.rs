


/*  > ---------------------------------------------------------------------------------------------
    | everything that moves a balance lives in here, each component holds
    | a handle to the shared store and nothing else:
    |
    |   catalog      ---> the fixed investment tiers, seeded once
    |   accrual      ---> daily roi credits of every running subscription
    |   subscription ---> opening a subscription against a plan
    |   queue        ---> deposits and withdrawals waiting for an admin decision
    |
*/

pub mod catalog;
pub mod accrual;
pub mod subscription;
pub mod queue;

pub use catalog::PlanCatalog;
pub use accrual::{AccrualEngine, AccrualReport};
pub use subscription::SubscriptionManager;
pub use queue::RequestQueue;


#[cfg(test)]
pub(crate) mod fixtures{

    use std::sync::Arc;
    use chrono::{DateTime, TimeZone, Utc};
    use crate::models::plans::Plan;
    use crate::models::users::{NewUser, User, UserRole};
    use crate::storage::{MemStore, Store};
    use super::PlanCatalog;

    /* 10:00 utc, far from any midnight */
    pub fn t0() -> DateTime<Utc>{
        Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("fixed instant is ambiguous"))
    }

    pub fn seeded_store() -> Arc<MemStore>{
        let store = Arc::new(MemStore::new());
        PlanCatalog::new(store.clone()).ensure_seeded().unwrap();
        store
    }

    pub fn basic_plan(store: &Arc<MemStore>) -> Plan{
        store.find_plan(1).unwrap().unwrap()
    }

    pub fn user_with_balance(store: &Arc<MemStore>, mail: &str, balance: i64) -> User{
        store.insert_user(NewUser{
            mail: mail.to_string(),
            pswd: "hash".to_string(),
            country: Some("NL".to_string()),
            balance,
            is_verified: true,
            user_role: UserRole::User,
            verification_token: None,
        }).unwrap()
    }

    pub fn balance_of(store: &Arc<MemStore>, user_id: i32) -> i64{
        store.find_user_by_id(user_id).unwrap().unwrap().balance
    }

}
