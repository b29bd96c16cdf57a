


use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::info;
use crate::error::PanelError;
use crate::models::active_plans::{ActivePlan, NewActivePlan};
use crate::models::funding::{Decision, FundingRequest, NewFundingRequest, RequestKind, RequestStatus};
use crate::models::plans::{NewPlan, Plan};
use crate::models::sessions::Session;
use crate::models::users::{NewUser, User};
use crate::models::users_deposits::{NewUserDeposit, UserDeposit};
use crate::models::users_withdrawals::{NewUserWithdrawal, UserWithdrawal};
use crate::schema::{active_plans, plans, sessions, users, users_deposits, users_withdrawals};
use super::{CreditOutcome, Store};


pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbPoolConnection = PooledConnection<ConnectionManager<PgConnection>>;


#[derive(Clone)]
pub struct PgStore{
    pool: DbPool,
}

impl PgStore{

    pub fn connect(database_url: &str, pool_size: u32) -> Result<Self, PanelError>{
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)?;
        info!("➔ 🛢️ postgres pool is ready with {} connections", pool_size);
        Ok(Self{ pool })
    }

    fn connection(&self) -> Result<DbPoolConnection, PanelError>{
        Ok(self.pool.get()?)
    }

}

/*
    moves the balance by `delta` as long as it stays inside the bigint
    range, a refused move is told apart from a missing owner
*/
fn move_balance(conn: &mut DbPoolConnection, user_id: i32, delta: i64) -> Result<(), PanelError>{

    let moved = if delta >= 0{
        diesel::update(users::table.find(user_id).filter(users::balance.le(i64::MAX - delta)))
            .set(users::balance.eq(users::balance + delta))
            .execute(conn)?
    } else{
        diesel::update(users::table.find(user_id).filter(users::balance.ge(i64::MIN - delta)))
            .set(users::balance.eq(users::balance + delta))
            .execute(conn)?
    };

    if moved == 0{
        let owner_exists = diesel::select(diesel::dsl::exists(users::table.find(user_id)))
            .get_result::<bool>(conn)?;
        return Err(
            if owner_exists{ PanelError::BalanceOverflow } else{ PanelError::NotFound("User") }
        );
    }

    Ok(())
}

impl Store for PgStore{

    fn seed_plans(&self, new_plans: &[NewPlan]) -> Result<usize, PanelError>{

        let connection = &mut self.connection()?;
        connection.transaction::<_, PanelError, _>(|conn| {

            let existing = plans::table
                .count()
                .get_result::<i64>(conn)?;
            if existing > 0{
                return Ok(0);
            }

            /* a concurrent seeder hits the unique name index and inserts nothing */
            let inserted = diesel::insert_into(plans::table)
                .values(new_plans)
                .on_conflict_do_nothing()
                .execute(conn)?;

            Ok(inserted)
        })
    }

    fn get_plans(&self) -> Result<Vec<Plan>, PanelError>{

        let connection = &mut self.connection()?;
        let all_plans = plans::table
            .order(plans::id.asc())
            .select(Plan::as_select())
            .load::<Plan>(connection)?;

        Ok(all_plans)
    }

    fn find_plan(&self, plan_id: i32) -> Result<Option<Plan>, PanelError>{

        let connection = &mut self.connection()?;
        let plan = plans::table
            .find(plan_id)
            .select(Plan::as_select())
            .first::<Plan>(connection)
            .optional()?;

        Ok(plan)
    }

    fn insert_user(&self, new_user: NewUser) -> Result<User, PanelError>{

        let connection = &mut self.connection()?;
        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result::<User>(connection)
            .map_err(|e| match e{
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => PanelError::DuplicateEmail,
                e => PanelError::from(e),
            })
    }

    fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, PanelError>{

        let connection = &mut self.connection()?;
        let user = users::table
            .find(user_id)
            .select(User::as_select())
            .first::<User>(connection)
            .optional()?;

        Ok(user)
    }

    fn find_user_by_mail(&self, mail: &str) -> Result<Option<User>, PanelError>{

        let connection = &mut self.connection()?;
        let user = users::table
            .filter(users::mail.eq(mail))
            .select(User::as_select())
            .first::<User>(connection)
            .optional()?;

        Ok(user)
    }

    fn verify_user(&self, token: &str) -> Result<Option<User>, PanelError>{

        let connection = &mut self.connection()?;
        let user = diesel::update(users::table.filter(users::verification_token.eq(token)))
            .set((
                users::is_verified.eq(true),
                users::verification_token.eq(None::<String>),
            ))
            .returning(User::as_returning())
            .get_result::<User>(connection)
            .optional()?;

        Ok(user)
    }

    fn open_subscription(&self, user_id: i32, plan: &Plan, now: DateTime<Utc>) -> Result<ActivePlan, PanelError>{

        let connection = &mut self.connection()?;
        connection.transaction::<_, PanelError, _>(|conn| {

            let debited = diesel::update(
                    users::table
                        .find(user_id)
                        .filter(users::balance.ge(plan.stake))
                )
                .set(users::balance.eq(users::balance - plan.stake))
                .execute(conn)?;

            if debited == 0{
                let owner_exists = diesel::select(diesel::dsl::exists(users::table.find(user_id)))
                    .get_result::<bool>(conn)?;
                return Err(
                    if owner_exists{ PanelError::InsufficientBalance } else{ PanelError::NotFound("User") }
                );
            }

            let active_plan = diesel::insert_into(active_plans::table)
                .values(&NewActivePlan::starting(user_id, plan, now))
                .returning(ActivePlan::as_returning())
                .get_result::<ActivePlan>(conn)?;

            Ok(active_plan)
        })
    }

    fn get_accruable(&self, now: DateTime<Utc>) -> Result<Vec<(ActivePlan, Plan)>, PanelError>{

        let connection = &mut self.connection()?;
        let accruable = active_plans::table
            .inner_join(plans::table)
            .filter(active_plans::end_date.ge(now))
            .order(active_plans::id.asc())
            .select((ActivePlan::as_select(), Plan::as_select()))
            .load::<(ActivePlan, Plan)>(connection)?;

        Ok(accruable)
    }

    fn get_user_active_plans(&self, user_id: i32) -> Result<Vec<(ActivePlan, Plan)>, PanelError>{

        let connection = &mut self.connection()?;
        let user_active_plans = active_plans::table
            .inner_join(plans::table)
            .filter(active_plans::user_id.eq(user_id))
            .order(active_plans::id.desc())
            .select((ActivePlan::as_select(), Plan::as_select()))
            .load::<(ActivePlan, Plan)>(connection)?;

        Ok(user_active_plans)
    }

    fn credit_roi(&self, active_plan: &ActivePlan, credit: i64, now: DateTime<Utc>) -> Result<CreditOutcome, PanelError>{

        let connection = &mut self.connection()?;
        let outcome = connection.transaction::<_, PanelError, _>(|conn| {

            let target = active_plans::table
                .find(active_plan.id)
                .filter(active_plans::end_date.ge(now));

            let moved = match active_plan.last_roi_date{
                Some(seen) => diesel::update(target.filter(active_plans::last_roi_date.eq(Some(seen))))
                    .set(active_plans::last_roi_date.eq(Some(now)))
                    .execute(conn)?,
                None => diesel::update(target.filter(active_plans::last_roi_date.is_null()))
                    .set(active_plans::last_roi_date.eq(Some(now)))
                    .execute(conn)?,
            };

            if moved == 0{
                return Ok(CreditOutcome::AlreadyCredited);
            }

            /* an error rolls the swap back */
            move_balance(conn, active_plan.user_id, credit)?;

            Ok(CreditOutcome::Credited)
        });

        match outcome{
            Err(PanelError::NotFound(_)) => Ok(CreditOutcome::OwnerMissing),
            other => other,
        }
    }

    fn insert_request(&self, new_request: NewFundingRequest) -> Result<FundingRequest, PanelError>{

        let connection = &mut self.connection()?;
        let request: FundingRequest = match new_request.kind{
            RequestKind::Deposit => diesel::insert_into(users_deposits::table)
                .values(&NewUserDeposit::from(&new_request))
                .returning(UserDeposit::as_returning())
                .get_result::<UserDeposit>(connection)?
                .into(),
            RequestKind::Withdrawal => diesel::insert_into(users_withdrawals::table)
                .values(&NewUserWithdrawal::from(&new_request))
                .returning(UserWithdrawal::as_returning())
                .get_result::<UserWithdrawal>(connection)?
                .into(),
        };

        Ok(request)
    }

    fn find_request(&self, kind: RequestKind, request_id: i32) -> Result<Option<FundingRequest>, PanelError>{

        let connection = &mut self.connection()?;
        let request = match kind{
            RequestKind::Deposit => users_deposits::table
                .find(request_id)
                .select(UserDeposit::as_select())
                .first::<UserDeposit>(connection)
                .optional()?
                .map(FundingRequest::from),
            RequestKind::Withdrawal => users_withdrawals::table
                .find(request_id)
                .select(UserWithdrawal::as_select())
                .first::<UserWithdrawal>(connection)
                .optional()?
                .map(FundingRequest::from),
        };

        Ok(request)
    }

    fn get_requests_by_status(&self, kind: RequestKind, status: RequestStatus) -> Result<Vec<FundingRequest>, PanelError>{

        let connection = &mut self.connection()?;
        let requests = match kind{
            RequestKind::Deposit => users_deposits::table
                .filter(users_deposits::status.eq(status))
                .order(users_deposits::id.asc())
                .select(UserDeposit::as_select())
                .load::<UserDeposit>(connection)?
                .into_iter()
                .map(FundingRequest::from)
                .collect(),
            RequestKind::Withdrawal => users_withdrawals::table
                .filter(users_withdrawals::status.eq(status))
                .order(users_withdrawals::id.asc())
                .select(UserWithdrawal::as_select())
                .load::<UserWithdrawal>(connection)?
                .into_iter()
                .map(FundingRequest::from)
                .collect(),
        };

        Ok(requests)
    }

    fn get_user_requests(&self, kind: RequestKind, user_id: i32) -> Result<Vec<FundingRequest>, PanelError>{

        let connection = &mut self.connection()?;
        let requests = match kind{
            RequestKind::Deposit => users_deposits::table
                .filter(users_deposits::user_id.eq(user_id))
                .order(users_deposits::id.desc())
                .select(UserDeposit::as_select())
                .load::<UserDeposit>(connection)?
                .into_iter()
                .map(FundingRequest::from)
                .collect(),
            RequestKind::Withdrawal => users_withdrawals::table
                .filter(users_withdrawals::user_id.eq(user_id))
                .order(users_withdrawals::id.desc())
                .select(UserWithdrawal::as_select())
                .load::<UserWithdrawal>(connection)?
                .into_iter()
                .map(FundingRequest::from)
                .collect(),
        };

        Ok(requests)
    }

    fn settle_request(&self, kind: RequestKind, request_id: i32, decision: Decision, now: DateTime<Utc>) -> Result<FundingRequest, PanelError>{

        let connection = &mut self.connection()?;
        connection.transaction::<_, PanelError, _>(|conn| {

            /* only a pending row can be moved, a second decision updates nothing */
            let settled = match kind{
                RequestKind::Deposit => diesel::update(
                        users_deposits::table
                            .find(request_id)
                            .filter(users_deposits::status.eq(RequestStatus::Pending))
                    )
                    .set((
                        users_deposits::status.eq(decision.status()),
                        users_deposits::decided_at.eq(Some(now)),
                    ))
                    .returning(UserDeposit::as_returning())
                    .get_result::<UserDeposit>(conn)
                    .optional()?
                    .map(FundingRequest::from),
                RequestKind::Withdrawal => diesel::update(
                        users_withdrawals::table
                            .find(request_id)
                            .filter(users_withdrawals::status.eq(RequestStatus::Pending))
                    )
                    .set((
                        users_withdrawals::status.eq(decision.status()),
                        users_withdrawals::decided_at.eq(Some(now)),
                    ))
                    .returning(UserWithdrawal::as_returning())
                    .get_result::<UserWithdrawal>(conn)
                    .optional()?
                    .map(FundingRequest::from),
            };

            let Some(settled) = settled else{
                let exists = match kind{
                    RequestKind::Deposit => diesel::select(diesel::dsl::exists(users_deposits::table.find(request_id)))
                        .get_result::<bool>(conn)?,
                    RequestKind::Withdrawal => diesel::select(diesel::dsl::exists(users_withdrawals::table.find(request_id)))
                        .get_result::<bool>(conn)?,
                };
                return Err(
                    if exists{ PanelError::NotPending } else{ PanelError::NotFound(kind.label()) }
                );
            };

            if decision == Decision::Approve{
                move_balance(conn, settled.user_id, kind.signed(settled.amount))?;
            }

            Ok(settled)
        })
    }

    fn insert_session(&self, session: Session) -> Result<Session, PanelError>{

        let connection = &mut self.connection()?;
        let session = diesel::insert_into(sessions::table)
            .values(&session)
            .returning(Session::as_returning())
            .get_result::<Session>(connection)?;

        Ok(session)
    }

    fn find_session(&self, token: &str) -> Result<Option<Session>, PanelError>{

        let connection = &mut self.connection()?;
        let session = sessions::table
            .find(token)
            .select(Session::as_select())
            .first::<Session>(connection)
            .optional()?;

        Ok(session)
    }

    fn delete_session(&self, token: &str) -> Result<(), PanelError>{

        let connection = &mut self.connection()?;
        diesel::delete(sessions::table.find(token))
            .execute(connection)?;

        Ok(())
    }

    fn purge_sessions(&self, now: DateTime<Utc>) -> Result<usize, PanelError>{

        let connection = &mut self.connection()?;
        let purged = diesel::delete(sessions::table.filter(sessions::expires_at.le(now)))
            .execute(connection)?;

        Ok(purged)
    }

}


/*
    these need a migrated postgres behind DATABASE_URL, run them with
    `cargo test -- --ignored`; every run registers fresh users so the
    database doesn't have to be empty
*/
#[cfg(test)]
mod tests{

    use chrono::Duration;
    use crate::ledger::PlanCatalog;
    use crate::misc::gen_random_token;
    use crate::models::users::UserRole;
    use super::*;

    fn store() -> Option<PgStore>{
        let database_url = std::env::var("DATABASE_URL").ok()?;
        let store = PgStore::connect(&database_url, 2).unwrap();
        store.seed_plans(&PlanCatalog::default_tiers()).unwrap();
        Some(store)
    }

    fn fresh_user(store: &PgStore, balance: i64) -> User{
        store.insert_user(NewUser{
            mail: format!("{}@profitbliss.com", gen_random_token(12).to_lowercase()),
            pswd: "hash".to_string(),
            country: None,
            balance,
            is_verified: true,
            user_role: UserRole::User,
            verification_token: None,
        }).unwrap()
    }

    fn balance_of(store: &PgStore, user_id: i32) -> i64{
        store.find_user_by_id(user_id).unwrap().unwrap().balance
    }

    #[test]
    #[ignore]
    fn guarded_debit_and_roi_swap(){
        let Some(store) = store() else{ return };
        let plan = store.get_plans().unwrap().remove(0);
        let poor = fresh_user(&store, plan.stake - 1);
        let user = fresh_user(&store, plan.stake);
        let start = Utc::now();

        assert!(matches!(store.open_subscription(poor.id, &plan, start), Err(PanelError::InsufficientBalance)));
        assert!(matches!(store.open_subscription(i32::MAX, &plan, start), Err(PanelError::NotFound("User"))));
        assert_eq!(balance_of(&store, poor.id), plan.stake - 1);

        let active_plan = store.open_subscription(user.id, &plan, start).unwrap();
        assert_eq!(balance_of(&store, user.id), 0);

        let tomorrow = start + Duration::days(1);
        assert_eq!(store.credit_roi(&active_plan, 10_00, tomorrow).unwrap(), CreditOutcome::Credited);
        /* the snapshot is stale now */
        assert_eq!(store.credit_roi(&active_plan, 10_00, tomorrow).unwrap(), CreditOutcome::AlreadyCredited);
        assert_eq!(balance_of(&store, user.id), 10_00);
    }

    #[test]
    #[ignore]
    fn settle_swaps_status_once_and_guards_the_range(){
        let Some(store) = store() else{ return };
        let user = fresh_user(&store, i64::MAX - 10_00);
        let deposit = |amount| store.insert_request(NewFundingRequest{
            user_id: user.id,
            kind: RequestKind::Deposit,
            amount,
            destination: "USDT".to_string(),
        }).unwrap();

        let small = deposit(10_00);
        let settled = store.settle_request(RequestKind::Deposit, small.id, Decision::Approve, Utc::now()).unwrap();
        assert_eq!(settled.status, RequestStatus::Approved);
        assert!(matches!(
            store.settle_request(RequestKind::Deposit, small.id, Decision::Reject, Utc::now()),
            Err(PanelError::NotPending)
        ));
        assert_eq!(balance_of(&store, user.id), i64::MAX);

        /* the refused move rolls the status back to pending */
        let overflowing = deposit(1);
        assert!(matches!(
            store.settle_request(RequestKind::Deposit, overflowing.id, Decision::Approve, Utc::now()),
            Err(PanelError::BalanceOverflow)
        ));
        let still_pending = store.find_request(RequestKind::Deposit, overflowing.id).unwrap().unwrap();
        assert_eq!(still_pending.status, RequestStatus::Pending);
        assert_eq!(balance_of(&store, user.id), i64::MAX);
    }

    #[test]
    #[ignore]
    fn expired_sessions_are_purged(){
        let Some(store) = store() else{ return };
        let user = fresh_user(&store, 0);
        let now = Utc::now();
        let session = store.insert_session(Session{
            token: gen_random_token(32),
            user_id: user.id,
            created_at: now - Duration::days(8),
            expires_at: now - Duration::days(1),
        }).unwrap();

        assert!(store.purge_sessions(now).unwrap() >= 1);
        assert!(store.find_session(&session.token).unwrap().is_none());
    }

}
