


use actix_web::{get, post, route, web, HttpRequest, http::StatusCode, cookie::Cookie};
use chrono::Utc;
use serde::{Serialize, Deserialize};
use crate::constants::*;
use crate::error::PanelError;
use crate::ledger::AccrualReport;
use crate::misc::{format_amount, parse_amount};
use crate::models::active_plans::ActivePlanData;
use crate::models::funding::{DepositRequest, FundingRequestData, RequestKind, WithdrawalRequest};
use crate::models::plans::PlanData;
use crate::models::users::UserData;
use crate::resp;
use crate::server::AppState;


#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Dashboard{
    pub user: UserData,
    pub plans: Vec<PlanData>,
    pub active_plans: Vec<ActivePlanData>,
    pub accrual: AccrualReport,
}

/* what the deposit and withdraw pages show before a submission */
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FundingOverview{
    pub minimum: String,
    pub balance: String,
    pub requests: Vec<FundingRequestData>,
}


/*
    every dashboard view runs the accrual sweep over all running
    subscriptions before the balance gets loaded
*/
#[get("/dashboard")]
async fn dashboard(
        req: HttpRequest,
        app_state: web::Data<AppState>
    ) -> PanelHttpResponse{

    let user = app_state.passport(&req, false).await?;
    let state = app_state.get_ref().clone();
    let dashboard = web::block(move || -> Result<Dashboard, PanelError>{
        let now = Utc::now();
        let accrual = state.accrual().accrue_all(now)?;
        let user = state.accounts().reload(user.id)?;
        let plans = state.catalog().list_plans()?;
        Ok(Dashboard{
            user: UserData::from(&user),
            plans: plans.iter().map(PlanData::from).collect(),
            active_plans: state.subscriptions().subscriptions_of(user.id, now)?,
            accrual,
        })
    }).await??;

    resp!{
        Dashboard, // the data type
        dashboard, // response data
        FETCHED, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[route("/subscribe/{plan_id}", method="GET", method="POST")]
async fn subscribe(
        req: HttpRequest,
        app_state: web::Data<AppState>,
        plan_id: web::Path<i32>
    ) -> PanelHttpResponse{

    let user = app_state.passport(&req, false).await?;
    let state = app_state.get_ref().clone();
    let plan_id = plan_id.into_inner();
    let active_plan = web::block(move || -> Result<ActivePlanData, PanelError>{
        let now = Utc::now();
        let plan = state.catalog().find_plan(plan_id)?;
        let active_plan = state.subscriptions().subscribe(&user, &plan, now)?;
        Ok(active_plan.to_data(&plan, now))
    }).await??;

    resp!{
        ActivePlanData, // the data type
        active_plan, // response data
        SUBSCRIBED, // response message
        StatusCode::CREATED, // status code
        None::<Cookie<'_>>, // cookie
    }

}

async fn funding_overview(
        req: HttpRequest,
        app_state: web::Data<AppState>,
        kind: RequestKind,
        minimum: i64
    ) -> Result<FundingOverview, actix_web::Error>{

    let user = app_state.passport(&req, false).await?;
    let state = app_state.get_ref().clone();
    let requests = web::block(move || state.queue().history(kind, user.id)).await??;

    Ok(FundingOverview{
        minimum: format_amount(minimum),
        balance: format_amount(user.balance),
        requests: requests.iter().map(FundingRequestData::from).collect(),
    })
}

#[get("/deposit")]
async fn deposit_history(
        req: HttpRequest,
        app_state: web::Data<AppState>
    ) -> PanelHttpResponse{

    let overview = funding_overview(req, app_state, RequestKind::Deposit, MIN_DEPOSIT).await?;

    resp!{
        FundingOverview, // the data type
        overview, // response data
        FETCHED, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[post("/deposit")]
async fn deposit(
        req: HttpRequest,
        app_state: web::Data<AppState>,
        deposit_info: web::Form<DepositRequest>
    ) -> PanelHttpResponse{

    let user = app_state.passport(&req, false).await?;
    let amount = parse_amount(&deposit_info.amount)?;
    let state = app_state.get_ref().clone();
    let deposit_info = deposit_info.into_inner();
    let request = web::block(move || state.queue().request_deposit(&user, amount, &deposit_info.coin)).await??;

    resp!{
        FundingRequestData, // the data type
        FundingRequestData::from(&request), // response data
        DEPOSIT_SUBMITTED, // response message
        StatusCode::CREATED, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[get("/withdraw")]
async fn withdrawal_history(
        req: HttpRequest,
        app_state: web::Data<AppState>
    ) -> PanelHttpResponse{

    let overview = funding_overview(req, app_state, RequestKind::Withdrawal, MIN_WITHDRAWAL).await?;

    resp!{
        FundingOverview, // the data type
        overview, // response data
        FETCHED, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[post("/withdraw")]
async fn withdraw(
        req: HttpRequest,
        app_state: web::Data<AppState>,
        withdrawal_info: web::Form<WithdrawalRequest>
    ) -> PanelHttpResponse{

    let user = app_state.passport(&req, false).await?;
    let amount = parse_amount(&withdrawal_info.amount)?;
    let state = app_state.get_ref().clone();
    let withdrawal_info = withdrawal_info.into_inner();
    let request = web::block(move || state.queue().request_withdrawal(&user, amount, &withdrawal_info.wallet)).await??;

    resp!{
        FundingRequestData, // the data type
        FundingRequestData::from(&request), // response data
        WITHDRAWAL_SUBMITTED, // response message
        StatusCode::CREATED, // status code
        None::<Cookie<'_>>, // cookie
    }

}


pub mod exports{
    pub use super::dashboard;
    pub use super::subscribe;
    pub use super::deposit_history;
    pub use super::deposit;
    pub use super::withdrawal_history;
    pub use super::withdraw;
}
