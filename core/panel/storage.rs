


/*  > ---------------------------------------------------------------------------------------------
    | the repository every ledger component talks to, each method is one
    | atomic unit against the store:
    |
    |   pg  ---> diesel over an r2d2 postgres pool, multi step methods run in a transaction
    |   mem ---> everything behind a single mutex, used for the memory engine and tests
    |
*/

use chrono::{DateTime, Utc};
use crate::error::PanelError;
use crate::models::active_plans::ActivePlan;
use crate::models::funding::{Decision, FundingRequest, NewFundingRequest, RequestKind, RequestStatus};
use crate::models::plans::{NewPlan, Plan};
use crate::models::sessions::Session;
use crate::models::users::{NewUser, User};

pub mod pg;
pub mod mem;

pub use mem::MemStore;
pub use pg::PgStore;


/* what happened to a single accrual credit attempt */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreditOutcome{
    Credited,
    /* someone else moved last_roi_date first, nothing was applied */
    AlreadyCredited,
    /* the owner row is gone, nothing was applied */
    OwnerMissing,
}

pub trait Store: Send + Sync{

    /* inserts the tiers only when the catalog is empty, returns the inserted rows count */
    fn seed_plans(&self, new_plans: &[NewPlan]) -> Result<usize, PanelError>;
    /* all plans in insertion order */
    fn get_plans(&self) -> Result<Vec<Plan>, PanelError>;
    fn find_plan(&self, plan_id: i32) -> Result<Option<Plan>, PanelError>;

    /* fails with DuplicateEmail if the mail is taken */
    fn insert_user(&self, new_user: NewUser) -> Result<User, PanelError>;
    fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, PanelError>;
    fn find_user_by_mail(&self, mail: &str) -> Result<Option<User>, PanelError>;
    /* flags the token owner as verified and burns the token */
    fn verify_user(&self, token: &str) -> Result<Option<User>, PanelError>;

    /*
        debits the stake, guarded by balance >= stake, and inserts the
        active plan in one unit; InsufficientBalance if the guard fails
    */
    fn open_subscription(&self, user_id: i32, plan: &Plan, now: DateTime<Utc>) -> Result<ActivePlan, PanelError>;
    /* active plans with end_date >= now, joined with their plan, oldest first */
    fn get_accruable(&self, now: DateTime<Utc>) -> Result<Vec<(ActivePlan, Plan)>, PanelError>;
    /* every active plan of the user, newest first */
    fn get_user_active_plans(&self, user_id: i32) -> Result<Vec<(ActivePlan, Plan)>, PanelError>;
    /*
        compare and swap on last_roi_date: only if it still holds the value
        seen in `active_plan` it's moved to `now` and the owner gets `credit`
    */
    fn credit_roi(&self, active_plan: &ActivePlan, credit: i64, now: DateTime<Utc>) -> Result<CreditOutcome, PanelError>;

    fn insert_request(&self, new_request: NewFundingRequest) -> Result<FundingRequest, PanelError>;
    fn find_request(&self, kind: RequestKind, request_id: i32) -> Result<Option<FundingRequest>, PanelError>;
    /* oldest first */
    fn get_requests_by_status(&self, kind: RequestKind, status: RequestStatus) -> Result<Vec<FundingRequest>, PanelError>;
    /* newest first */
    fn get_user_requests(&self, kind: RequestKind, user_id: i32) -> Result<Vec<FundingRequest>, PanelError>;
    /*
        compare and swap on status pending -> decided together with the
        balance change of an approval; NotPending if already decided
    */
    fn settle_request(&self, kind: RequestKind, request_id: i32, decision: Decision, now: DateTime<Utc>) -> Result<FundingRequest, PanelError>;

    fn insert_session(&self, session: Session) -> Result<Session, PanelError>;
    fn find_session(&self, token: &str) -> Result<Option<Session>, PanelError>;
    fn delete_session(&self, token: &str) -> Result<(), PanelError>;
    /* drops every session expired at `now`, returns how many */
    fn purge_sessions(&self, now: DateTime<Utc>) -> Result<usize, PanelError>;

}
