


use std::sync::Arc;
use chrono::{DateTime, Utc};
use log::{info, warn};
use crate::constants::{MIN_DEPOSIT, MIN_WITHDRAWAL};
use crate::error::PanelError;
use crate::misc::format_amount;
use crate::models::funding::{Decision, FundingRequest, NewFundingRequest, RequestKind, RequestStatus};
use crate::models::users::User;
use crate::storage::Store;


/*
    deposits and withdrawals only ever get queued in here, the balance
    moves once an admin approves them
*/
pub struct RequestQueue{
    store: Arc<dyn Store>,
}

impl RequestQueue{

    pub fn new(store: Arc<dyn Store>) -> Self{
        Self{ store }
    }

    pub fn request_deposit(&self, user: &User, amount: i64, coin: &str) -> Result<FundingRequest, PanelError>{

        if amount < MIN_DEPOSIT{
            return Err(PanelError::BelowMinimum{ minimum: format_amount(MIN_DEPOSIT) });
        }
        let coin = coin.trim();
        if coin.is_empty(){
            return Err(PanelError::MissingField("coin"));
        }

        let request = self.store.insert_request(NewFundingRequest{
            user_id: user.id,
            kind: RequestKind::Deposit,
            amount,
            destination: coin.to_string(),
        })?;
        info!("➔ 📥 user [{}] requested a deposit of {} {}", user.id, format_amount(amount), coin);

        Ok(request)
    }

    pub fn request_withdrawal(&self, user: &User, amount: i64, wallet: &str) -> Result<FundingRequest, PanelError>{

        if amount < MIN_WITHDRAWAL{
            return Err(PanelError::BelowMinimum{ minimum: format_amount(MIN_WITHDRAWAL) });
        }
        if amount > user.balance{
            return Err(PanelError::InsufficientBalance);
        }
        let wallet = wallet.trim();
        if wallet.is_empty(){
            return Err(PanelError::MissingField("wallet"));
        }

        let request = self.store.insert_request(NewFundingRequest{
            user_id: user.id,
            kind: RequestKind::Withdrawal,
            amount,
            destination: wallet.to_string(),
        })?;
        info!("➔ 📤 user [{}] requested a withdrawal of {} to {}", user.id, format_amount(amount), wallet);

        Ok(request)
    }

    pub fn decide(&self, kind: RequestKind, request_id: i32, decision: Decision, now: DateTime<Utc>) -> Result<FundingRequest, PanelError>{

        let settled = self.store.settle_request(kind, request_id, decision, now)?;
        info!(
            "➔ 🧾 {} [{}] of user [{}] for {} got {:?}",
            kind.label(), settled.id, settled.user_id, format_amount(settled.amount), settled.status
        );

        /* the balance is only checked when the withdrawal gets requested */
        if kind == RequestKind::Withdrawal && decision == Decision::Approve{
            if let Some(owner) = self.store.find_user_by_id(settled.user_id)?{
                if owner.balance < 0{
                    warn!("🥲 user [{}] balance went negative ({}) after withdrawal [{}]", owner.id, format_amount(owner.balance), settled.id);
                }
            }
        }

        Ok(settled)
    }

    pub fn pending(&self, kind: RequestKind) -> Result<Vec<FundingRequest>, PanelError>{
        self.store.get_requests_by_status(kind, RequestStatus::Pending)
    }

    pub fn history(&self, kind: RequestKind, user_id: i32) -> Result<Vec<FundingRequest>, PanelError>{
        self.store.get_user_requests(kind, user_id)
    }

}


#[cfg(test)]
mod tests{

    use crate::ledger::fixtures::*;
    use super::*;

    #[test]
    fn approved_deposit_credits_once(){
        let store = seeded_store();
        let user = user_with_balance(&store, "jane@profitbliss.com", 0);
        let queue = RequestQueue::new(store.clone());

        let request = queue.request_deposit(&user, 100_00, "USDT").unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(balance_of(&store, user.id), 0);

        let approved = queue.decide(RequestKind::Deposit, request.id, Decision::Approve, t0()).unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.decided_at, Some(t0()));
        assert_eq!(balance_of(&store, user.id), 100_00);

        assert!(matches!(
            queue.decide(RequestKind::Deposit, request.id, Decision::Reject, t0()),
            Err(PanelError::NotPending)
        ));
        assert!(matches!(
            queue.decide(RequestKind::Deposit, request.id, Decision::Approve, t0()),
            Err(PanelError::NotPending)
        ));
        assert_eq!(balance_of(&store, user.id), 100_00);
        assert_eq!(
            store.find_request(RequestKind::Deposit, request.id).unwrap().unwrap().status,
            RequestStatus::Approved
        );
    }

    #[test]
    fn rejected_withdrawal_keeps_the_balance(){
        let store = seeded_store();
        let user = user_with_balance(&store, "jane@profitbliss.com", 80_00);
        let queue = RequestQueue::new(store.clone());

        let request = queue.request_withdrawal(&user, 75_00, "TX9wallet").unwrap();
        queue.decide(RequestKind::Withdrawal, request.id, Decision::Reject, t0()).unwrap();
        assert_eq!(balance_of(&store, user.id), 80_00);
        assert!(queue.pending(RequestKind::Withdrawal).unwrap().is_empty());
    }

    #[test]
    fn approved_withdrawal_may_go_negative(){
        let store = seeded_store();
        let user = user_with_balance(&store, "jane@profitbliss.com", 80_00);
        let queue = RequestQueue::new(store.clone());

        let first = queue.request_withdrawal(&user, 75_00, "TX9wallet").unwrap();
        let second = queue.request_withdrawal(&user, 75_00, "TX9wallet").unwrap();
        queue.decide(RequestKind::Withdrawal, first.id, Decision::Approve, t0()).unwrap();
        queue.decide(RequestKind::Withdrawal, second.id, Decision::Approve, t0()).unwrap();
        assert_eq!(balance_of(&store, user.id), -70_00);
    }

    #[test]
    fn minimums_and_balance_are_checked(){
        let store = seeded_store();
        let user = user_with_balance(&store, "jane@profitbliss.com", 100_00);
        let queue = RequestQueue::new(store.clone());

        assert!(matches!(
            queue.request_deposit(&user, 49_99, "USDT"),
            Err(PanelError::BelowMinimum{ minimum }) if minimum == "50.00"
        ));
        assert!(matches!(
            queue.request_withdrawal(&user, 69_99, "TX9wallet"),
            Err(PanelError::BelowMinimum{ minimum }) if minimum == "70.00"
        ));
        assert!(matches!(
            queue.request_withdrawal(&user, 100_01, "TX9wallet"),
            Err(PanelError::InsufficientBalance)
        ));
        assert!(matches!(queue.request_deposit(&user, 50_00, "  "), Err(PanelError::MissingField("coin"))));
        assert!(matches!(queue.request_withdrawal(&user, 70_00, ""), Err(PanelError::MissingField("wallet"))));

        assert!(queue.request_deposit(&user, 50_00, "BTC").is_ok());
        assert!(queue.request_withdrawal(&user, 100_00, "TX9wallet").is_ok());
    }

    #[test]
    fn pending_is_oldest_first_and_history_newest_first(){
        let store = seeded_store();
        let jane = user_with_balance(&store, "jane@profitbliss.com", 0);
        let john = user_with_balance(&store, "john@profitbliss.com", 0);
        let queue = RequestQueue::new(store.clone());

        let a = queue.request_deposit(&jane, 50_00, "USDT").unwrap();
        let b = queue.request_deposit(&john, 60_00, "USDT").unwrap();
        let c = queue.request_deposit(&jane, 70_00, "BTC").unwrap();

        let pending = queue.pending(RequestKind::Deposit).unwrap();
        assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), [a.id, b.id, c.id]);

        let history = queue.history(RequestKind::Deposit, jane.id).unwrap();
        assert_eq!(history.iter().map(|r| r.id).collect::<Vec<_>>(), [c.id, a.id]);
        assert!(queue.history(RequestKind::Withdrawal, jane.id).unwrap().is_empty());
    }

    #[test]
    fn unknown_request_is_not_found(){
        let store = seeded_store();
        let queue = RequestQueue::new(store.clone());
        assert!(matches!(
            queue.decide(RequestKind::Deposit, 42, Decision::Approve, t0()),
            Err(PanelError::NotFound("Deposit"))
        ));
    }

}
