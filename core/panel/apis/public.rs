


use actix_web::{get, post, web, HttpRequest, http::StatusCode, cookie::Cookie};
use chrono::Utc;
use log::error;
use serde::{Serialize, Deserialize};
use crate::constants::*;
use crate::error::PanelError;
use crate::models::plans::PlanData;
use crate::models::users::{LoginRequest, SignupRequest, UserData};
use crate::passport::{removal_cookie, session_cookie, Passport};
use crate::resp;
use crate::server::AppState;


static SIGNUP_FIELDS: &[&str] = &["email", "password", "country", "referral"];
static LOGIN_FIELDS: &[&str] = &["email", "password"];

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginData{
    pub user: UserData,
    pub token: String,
    pub expires_at: String,
}


#[get("/")]
async fn index(
        app_state: web::Data<AppState>
    ) -> PanelHttpResponse{

    let state = app_state.get_ref().clone();
    let plans = web::block(move || state.catalog().list_plans()).await??;
    let plans = plans.iter().map(PlanData::from).collect::<Vec<_>>();

    resp!{
        Vec<PlanData>, // the data type
        plans, // response data
        WELCOME, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[get("/signup")]
async fn signup_form() -> PanelHttpResponse{

    resp!{
        &[&str], // the data type
        SIGNUP_FIELDS, // response data
        SIGNUP_FORM, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[post("/signup")]
async fn signup(
        app_state: web::Data<AppState>,
        signup_info: web::Form<SignupRequest>
    ) -> PanelHttpResponse{

    let state = app_state.get_ref().clone();
    let signup_info = signup_info.into_inner();
    let registration = web::block(move || state.accounts().register(&signup_info)).await??;

    /* the account is there already, a lost mail only costs the user a new signup attempt */
    let link = app_state.config.verification_link(&registration.verification_token);
    if let Err(e) = app_state.mailer.send_verification(&registration.user.mail, &link).await{
        error!("😕 can't send the verification mail to [{}] - {}", registration.user.mail, e);
    }

    resp!{
        UserData, // the data type
        UserData::from(&registration.user), // response data
        CHECK_MAIL_TO_VERIFY, // response message
        StatusCode::CREATED, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[get("/verify/{token}")]
async fn verify(
        app_state: web::Data<AppState>,
        token: web::Path<String>
    ) -> PanelHttpResponse{

    let state = app_state.get_ref().clone();
    let token = token.into_inner();
    let user = web::block(move || state.accounts().verify(&token)).await??;

    resp!{
        UserData, // the data type
        UserData::from(&user), // response data
        MAIL_VERIFIED, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[get("/login")]
async fn login_form() -> PanelHttpResponse{

    resp!{
        &[&str], // the data type
        LOGIN_FIELDS, // response data
        LOGIN_FORM, // response message
        StatusCode::OK, // status code
        None::<Cookie<'_>>, // cookie
    }

}

#[post("/login")]
async fn login(
        app_state: web::Data<AppState>,
        login_info: web::Form<LoginRequest>
    ) -> PanelHttpResponse{

    let state = app_state.get_ref().clone();
    let login_info = login_info.into_inner();
    let (user, session) = web::block(move || -> Result<_, PanelError>{
        let accounts = state.accounts();
        let user = accounts.authenticate(&login_info.email, &login_info.password)?;
        let session = accounts.open_session(&user, Utc::now())?;
        Ok((user, session))
    }).await??;

    let cookie = session_cookie(&session.token, app_state.config.session_expiration_days);
    let login_data = LoginData{
        user: UserData::from(&user),
        token: session.token,
        expires_at: session.expires_at.to_rfc3339(),
    };

    resp!{
        LoginData, // the data type
        login_data, // response data
        LOGGEDIN, // response message
        StatusCode::OK, // status code
        Some(cookie), // cookie
    }

}

#[get("/logout")]
async fn logout(
        req: HttpRequest,
        app_state: web::Data<AppState>
    ) -> PanelHttpResponse{

    if let Some(token) = req.session_token(){
        let state = app_state.get_ref().clone();
        web::block(move || state.accounts().close_session(&token)).await??;
    }

    resp!{
        &[u8], // the data type
        &[], // response data
        LOGOUT, // response message
        StatusCode::OK, // status code
        Some(removal_cookie()), // cookie
    }

}


pub mod exports{
    pub use super::index;
    pub use super::signup_form;
    pub use super::signup;
    pub use super::verify;
    pub use super::login_form;
    pub use super::login;
    pub use super::logout;
}
