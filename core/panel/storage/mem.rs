


use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use chrono::{DateTime, Utc};
use crate::error::PanelError;
use crate::models::active_plans::{ActivePlan, NewActivePlan};
use crate::models::funding::{Decision, FundingRequest, NewFundingRequest, RequestKind, RequestStatus};
use crate::models::plans::{NewPlan, Plan};
use crate::models::sessions::Session;
use crate::models::users::{NewUser, User};
use super::{CreditOutcome, Store};


#[derive(Default)]
struct MemState{
    users: Vec<User>,
    plans: Vec<Plan>,
    active_plans: Vec<ActivePlan>,
    deposits: Vec<FundingRequest>,
    withdrawals: Vec<FundingRequest>,
    sessions: HashMap<String, Session>,
}

impl MemState{

    fn user_mut(&mut self, user_id: i32) -> Option<&mut User>{
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    fn requests(&self, kind: RequestKind) -> &Vec<FundingRequest>{
        match kind{
            RequestKind::Deposit => &self.deposits,
            RequestKind::Withdrawal => &self.withdrawals,
        }
    }

    fn requests_mut(&mut self, kind: RequestKind) -> &mut Vec<FundingRequest>{
        match kind{
            RequestKind::Deposit => &mut self.deposits,
            RequestKind::Withdrawal => &mut self.withdrawals,
        }
    }

}

/*
    the whole state sits behind one mutex so every method is
    atomic exactly like a transaction in the pg store; ids are
    serial and rows are never removed, apart from sessions
*/
#[derive(Default)]
pub struct MemStore{
    state: Mutex<MemState>,
}

impl MemStore{

    pub fn new() -> Self{
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemState>{
        /* a panicking holder can't leave a half applied method behind, the state is still consistent */
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn drop_user(&self, user_id: i32){
        self.lock().users.retain(|u| u.id != user_id);
    }

    #[cfg(test)]
    pub(crate) fn set_balance(&self, user_id: i32, balance: i64){
        if let Some(user) = self.lock().user_mut(user_id){
            user.balance = balance;
        }
    }

}

impl Store for MemStore{

    fn seed_plans(&self, new_plans: &[NewPlan]) -> Result<usize, PanelError>{

        let mut state = self.lock();
        if !state.plans.is_empty(){
            return Ok(0);
        }

        let now = Utc::now();
        for new_plan in new_plans{
            if state.plans.iter().any(|p| p.name == new_plan.name){
                continue;
            }
            let id = state.plans.len() as i32 + 1;
            state.plans.push(Plan{
                id,
                name: new_plan.name.clone(),
                stake: new_plan.stake,
                daily_roi: new_plan.daily_roi,
                duration: new_plan.duration,
                created_at: now,
            });
        }

        Ok(state.plans.len())
    }

    fn get_plans(&self) -> Result<Vec<Plan>, PanelError>{
        Ok(self.lock().plans.clone())
    }

    fn find_plan(&self, plan_id: i32) -> Result<Option<Plan>, PanelError>{
        Ok(self.lock().plans.iter().find(|p| p.id == plan_id).cloned())
    }

    fn insert_user(&self, new_user: NewUser) -> Result<User, PanelError>{

        let mut state = self.lock();
        if state.users.iter().any(|u| u.mail == new_user.mail){
            return Err(PanelError::DuplicateEmail);
        }

        let now = Utc::now();
        /* users may be dropped in tests, keep ids growing */
        let id = state.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User{
            id,
            mail: new_user.mail,
            pswd: new_user.pswd,
            country: new_user.country,
            balance: new_user.balance,
            is_verified: new_user.is_verified,
            user_role: new_user.user_role,
            verification_token: new_user.verification_token,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());

        Ok(user)
    }

    fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, PanelError>{
        Ok(self.lock().users.iter().find(|u| u.id == user_id).cloned())
    }

    fn find_user_by_mail(&self, mail: &str) -> Result<Option<User>, PanelError>{
        Ok(self.lock().users.iter().find(|u| u.mail == mail).cloned())
    }

    fn verify_user(&self, token: &str) -> Result<Option<User>, PanelError>{

        let mut state = self.lock();
        let user = state.users
            .iter_mut()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .map(|user| {
                user.is_verified = true;
                user.verification_token = None;
                user.updated_at = Utc::now();
                user.clone()
            });

        Ok(user)
    }

    fn open_subscription(&self, user_id: i32, plan: &Plan, now: DateTime<Utc>) -> Result<ActivePlan, PanelError>{

        let mut state = self.lock();
        let user = state.user_mut(user_id).ok_or(PanelError::NotFound("User"))?;
        if user.balance < plan.stake{
            return Err(PanelError::InsufficientBalance);
        }
        user.balance -= plan.stake;
        user.updated_at = now;

        let new_active_plan = NewActivePlan::starting(user_id, plan, now);
        let active_plan = ActivePlan{
            id: state.active_plans.len() as i32 + 1,
            user_id: new_active_plan.user_id,
            plan_id: new_active_plan.plan_id,
            start_date: new_active_plan.start_date,
            end_date: new_active_plan.end_date,
            last_roi_date: new_active_plan.last_roi_date,
        };
        state.active_plans.push(active_plan.clone());

        Ok(active_plan)
    }

    fn get_accruable(&self, now: DateTime<Utc>) -> Result<Vec<(ActivePlan, Plan)>, PanelError>{

        let state = self.lock();
        let accruable = state.active_plans
            .iter()
            .filter(|ap| ap.end_date >= now)
            .filter_map(|ap| {
                state.plans
                    .iter()
                    .find(|p| p.id == ap.plan_id)
                    .map(|p| (ap.clone(), p.clone()))
            })
            .collect();

        Ok(accruable)
    }

    fn get_user_active_plans(&self, user_id: i32) -> Result<Vec<(ActivePlan, Plan)>, PanelError>{

        let state = self.lock();
        let user_active_plans = state.active_plans
            .iter()
            .rev()
            .filter(|ap| ap.user_id == user_id)
            .filter_map(|ap| {
                state.plans
                    .iter()
                    .find(|p| p.id == ap.plan_id)
                    .map(|p| (ap.clone(), p.clone()))
            })
            .collect();

        Ok(user_active_plans)
    }

    fn credit_roi(&self, active_plan: &ActivePlan, credit: i64, now: DateTime<Utc>) -> Result<CreditOutcome, PanelError>{

        let mut state = self.lock();
        let swappable = state.active_plans
            .iter()
            .position(|ap| {
                ap.id == active_plan.id
                    && ap.end_date >= now
                    && ap.last_roi_date == active_plan.last_roi_date
            });

        let Some(position) = swappable else{
            return Ok(CreditOutcome::AlreadyCredited);
        };

        let Some(owner) = state.user_mut(active_plan.user_id) else{
            return Ok(CreditOutcome::OwnerMissing);
        };
        owner.balance = owner.balance
            .checked_add(credit)
            .ok_or(PanelError::BalanceOverflow)?;
        owner.updated_at = now;
        state.active_plans[position].last_roi_date = Some(now);

        Ok(CreditOutcome::Credited)
    }

    fn insert_request(&self, new_request: NewFundingRequest) -> Result<FundingRequest, PanelError>{

        let mut state = self.lock();
        let requests = state.requests_mut(new_request.kind);
        let request = FundingRequest{
            id: requests.len() as i32 + 1,
            user_id: new_request.user_id,
            kind: new_request.kind,
            amount: new_request.amount,
            destination: new_request.destination,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        };
        requests.push(request.clone());

        Ok(request)
    }

    fn find_request(&self, kind: RequestKind, request_id: i32) -> Result<Option<FundingRequest>, PanelError>{
        Ok(self.lock().requests(kind).iter().find(|r| r.id == request_id).cloned())
    }

    fn get_requests_by_status(&self, kind: RequestKind, status: RequestStatus) -> Result<Vec<FundingRequest>, PanelError>{

        let state = self.lock();
        let requests = state.requests(kind)
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();

        Ok(requests)
    }

    fn get_user_requests(&self, kind: RequestKind, user_id: i32) -> Result<Vec<FundingRequest>, PanelError>{

        let state = self.lock();
        let requests = state.requests(kind)
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();

        Ok(requests)
    }

    fn settle_request(&self, kind: RequestKind, request_id: i32, decision: Decision, now: DateTime<Utc>) -> Result<FundingRequest, PanelError>{

        let mut state = self.lock();
        let request = state.requests(kind)
            .iter()
            .find(|r| r.id == request_id)
            .cloned()
            .ok_or(PanelError::NotFound(kind.label()))?;

        if request.status != RequestStatus::Pending{
            return Err(PanelError::NotPending);
        }

        /* the balance move goes first so a missing owner leaves the request untouched */
        if decision == Decision::Approve{
            let owner = state.user_mut(request.user_id).ok_or(PanelError::NotFound("User"))?;
            owner.balance = owner.balance
                .checked_add(kind.signed(request.amount))
                .ok_or(PanelError::BalanceOverflow)?;
            owner.updated_at = now;
        }

        let settled = FundingRequest{
            status: decision.status(),
            decided_at: Some(now),
            ..request
        };
        if let Some(stored) = state.requests_mut(kind).iter_mut().find(|r| r.id == request_id){
            *stored = settled.clone();
        }

        Ok(settled)
    }

    fn insert_session(&self, session: Session) -> Result<Session, PanelError>{
        self.lock().sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    fn find_session(&self, token: &str) -> Result<Option<Session>, PanelError>{
        Ok(self.lock().sessions.get(token).cloned())
    }

    fn delete_session(&self, token: &str) -> Result<(), PanelError>{
        self.lock().sessions.remove(token);
        Ok(())
    }

    fn purge_sessions(&self, now: DateTime<Utc>) -> Result<usize, PanelError>{
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - state.sessions.len())
    }

}
