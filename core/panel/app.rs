


/*

    diesel migration run    ---> apply the sql files under migrations/ to the db
    cargo run --bin panel   ---> run the panel server

*/

use std::time::Duration;
use dotenv::dotenv;
use env_logger::Env;
use log::error;
use profitbliss::config::AppConfig;
use profitbliss::ledger::AccrualEngine;
use profitbliss::server;


#[actix_web::main]
async fn main() -> std::io::Result<()>{

    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("😕 can't load the panel config - {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let state = server::bootstrap(config).map_err(|e| {
        error!("😕 can't bootstrap the panel - {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    if let Some(secs) = state.config.accrual_interval_secs{
        AccrualEngine::spawn_sweeper(state.store.clone(), Duration::from_secs(secs));
    }

    server::run(state).await
}
