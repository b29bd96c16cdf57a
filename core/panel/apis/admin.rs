


use actix_web::{get, route, web, HttpRequest, http::StatusCode, cookie::Cookie};
use chrono::Utc;
use serde::{Serialize, Deserialize};
use crate::constants::*;
use crate::error::PanelError;
use crate::models::funding::{Decision, FundingRequestData, RequestKind};
use crate::resp;
use crate::server::AppState;


#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PendingRequests{
    pub deposits: Vec<FundingRequestData>,
    pub withdrawals: Vec<FundingRequestData>,
}


#[get("")]
async fn index(
        req: HttpRequest,
        app_state: web::Data<AppState>
    ) -> PanelHttpResponse{

    app_state.passport(&req, true).await?;
    let state = app_state.get_ref().clone();
    let pending = web::block(move || -> Result<PendingRequests, PanelError>{
        let queue = state.queue();
        Ok(PendingRequests{
            deposits: queue.pending(RequestKind::Deposit)?.iter().map(FundingRequestData::from).collect(),
            withdrawals: queue.pending(RequestKind::Withdrawal)?.iter().map(FundingRequestData::from).collect(),
        })
    }).await??;

    resp!{
        PendingRequests, // the data type
        pending, // response data
        PENDING_REQUESTS, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

/* /admin/{approve|reject}/{deposit|withdraw}/{id} */
#[route("/{decision}/{kind}/{request_id}", method="GET", method="POST")]
async fn decide(
        req: HttpRequest,
        app_state: web::Data<AppState>,
        path: web::Path<(String, String, i32)>
    ) -> PanelHttpResponse{

    app_state.passport(&req, true).await?;

    let (decision, kind, request_id) = path.into_inner();
    let decision = match decision.as_str(){
        "approve" => Decision::Approve,
        "reject" => Decision::Reject,
        _ => return Err(PanelError::NotFound("Decision").into()),
    };
    let kind = match kind.as_str(){
        "deposit" => RequestKind::Deposit,
        "withdraw" => RequestKind::Withdrawal,
        _ => return Err(PanelError::NotFound("Request Kind").into()),
    };

    let state = app_state.get_ref().clone();
    let settled = web::block(move || state.queue().decide(kind, request_id, decision, Utc::now())).await??;
    let message = match decision{
        Decision::Approve => REQUEST_APPROVED,
        Decision::Reject => REQUEST_REJECTED,
    };

    resp!{
        FundingRequestData, // the data type
        FundingRequestData::from(&settled), // response data
        message, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}


pub mod exports{
    pub use super::index;
    pub use super::decide;
}
