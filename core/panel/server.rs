


use std::sync::Arc;
use chrono::Utc;
use actix_cors::Cors;
use actix_web::{web::Data, App, HttpRequest, HttpServer};
use actix_web::middleware::Logger;
use log::{info, warn};
use crate::accounts::Accounts;
use crate::config::{AppConfig, ConfigError, DbEngine};
use crate::constants::APP_NAME;
use crate::error::PanelError;
use crate::ledger::{AccrualEngine, PlanCatalog, RequestQueue, SubscriptionManager};
use crate::mailer::{LogMailer, Mailer, SmtpMailer};
use crate::models::users::User;
use crate::passport::Passport;
use crate::services;
use crate::storage::{MemStore, PgStore, Store};


/*
    the shared state every actix worker gets a handle of, the
    ledger components are cheap wrappers around the store thus
    they're built per request
*/
#[derive(Clone)]
pub struct AppState{
    pub store: Arc<dyn Store>,
    pub mailer: Arc<dyn Mailer>,
    pub config: AppConfig,
}

impl AppState{

    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, config: AppConfig) -> Self{
        Self{ store, mailer, config }
    }

    pub fn accounts(&self) -> Accounts{
        Accounts::new(
            self.store.clone(),
            &self.config.secret_key,
            &self.config.referral_code,
            self.config.session_expiration_days
        )
    }

    pub fn catalog(&self) -> PlanCatalog{
        PlanCatalog::new(self.store.clone())
    }

    pub fn accrual(&self) -> AccrualEngine{
        AccrualEngine::new(self.store.clone())
    }

    pub fn subscriptions(&self) -> SubscriptionManager{
        SubscriptionManager::new(self.store.clone())
    }

    pub fn queue(&self) -> RequestQueue{
        RequestQueue::new(self.store.clone())
    }

    /*
        resolves the caller out of its session token, it blocks on the
        store thus it must be called inside web::block; when `admin` is
        set only admins get through
    */
    pub fn authorize(&self, token: Option<String>, admin: bool) -> Result<User, PanelError>{
        let token = token.ok_or(PanelError::SessionRequired)?;
        let user = self.accounts().resolve_session(&token, Utc::now())?;
        if admin && !user.is_admin(){
            return Err(PanelError::Unauthorized);
        }
        Ok(user)
    }

    /* async flavour of `authorize` for handlers */
    pub async fn passport(&self, req: &HttpRequest, admin: bool) -> Result<User, actix_web::Error>{
        let state = self.clone();
        let token = req.session_token();
        let user = actix_web::web::block(move || state.authorize(token, admin)).await??;
        Ok(user)
    }

}

/* builds the store and the mailer, seeds the catalog and the admin account */
pub fn bootstrap(config: AppConfig) -> Result<AppState, PanelError>{

    let store: Arc<dyn Store> = match config.db_engine{
        DbEngine::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            Arc::new(PgStore::connect(database_url, config.db_pool_size)?)
        },
        DbEngine::Memory => {
            warn!("🥲 running on the memory engine, nothing survives a restart");
            Arc::new(MemStore::new())
        },
    };

    let mailer: Arc<dyn Mailer> = match config.smtp.clone(){
        Some(smtp) => {
            info!("➔ 📧 verification mails go through {}:{}", smtp.server, smtp.port);
            Arc::new(SmtpMailer::new(smtp))
        },
        None => Arc::new(LogMailer),
    };

    let state = AppState::new(store, mailer, config);
    state.catalog().ensure_seeded()?;

    match state.config.admin_password.as_deref(){
        Some(password) => {
            state.accounts().ensure_admin(&state.config.admin_mail, password)?;
        },
        None => warn!("🥲 no ADMIN_PASSWORD variable set, skipping the admin seed"),
    }

    Ok(state)
}


/*
    each worker of the HttpServer gets its own App built by the
    factory closure, they all share the same AppState behind Data
*/
pub async fn run(state: AppState) -> std::io::Result<()>{

    let host = state.config.host.clone();
    let port = state.config.port;
    let workers = state.config.workers;
    let shared_state = Data::new(state);

    info!("➔ 🚀 {} panel server has launched from [{}:{}] at {}", APP_NAME, host, port, chrono::Local::now().naive_local());
    HttpServer::new(move ||{
            App::new()
                .app_data(Data::clone(&shared_state))
                .wrap(Cors::permissive())
                .wrap(Logger::default())
                .configure(services::configure)
        })
        .workers(workers)
        .bind((host.as_str(), port))?
        .run()
        .await
}


#[cfg(test)]
mod tests{

    use super::*;

    #[test]
    fn memory_bootstrap_seeds_everything(){
        let state = bootstrap(AppConfig::for_tests()).unwrap();
        assert_eq!(state.catalog().list_plans().unwrap().len(), 4);

        let admin = state.accounts().authenticate("admin@profitbliss.com", "admin-pass").unwrap();
        assert!(admin.is_admin());

        /* a second bootstrap over the same store adds nothing */
        assert_eq!(state.catalog().ensure_seeded().unwrap(), 0);
    }

    #[test]
    fn authorize_checks_session_and_role(){
        let state = bootstrap(AppConfig::for_tests()).unwrap();
        let accounts = state.accounts();
        let admin = accounts.authenticate("admin@profitbliss.com", "admin-pass").unwrap();
        let session = accounts.open_session(&admin, Utc::now()).unwrap();

        assert!(matches!(state.authorize(None, false), Err(PanelError::SessionRequired)));
        assert!(matches!(state.authorize(Some("junk".to_string()), false), Err(PanelError::SessionRequired)));
        assert_eq!(state.authorize(Some(session.token.clone()), true).unwrap().id, admin.id);

        let registration = accounts.register(&crate::models::users::SignupRequest{
            email: "jane@profitbliss.com".to_string(),
            password: "hunter22".to_string(),
            country: String::new(),
            referral: String::new(),
        }).unwrap();
        let session = accounts.open_session(&registration.user, Utc::now()).unwrap();
        assert!(matches!(state.authorize(Some(session.token), true), Err(PanelError::Unauthorized)));
    }

}
