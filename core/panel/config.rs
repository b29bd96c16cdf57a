


use mailreq::SmtpInfo;
use crate::constants::{DEFAULT_REFERRAL_CODE, MAX_SESSION_EXPIRATION_DAYS};


#[derive(Debug, thiserror::Error)]
pub enum ConfigError{
    #[error("⚠️ no {0} variable set")]
    Missing(&'static str),
    #[error("⚠️ invalid {key} variable: {value}")]
    Invalid{ key: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine{
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct AppConfig{
    pub host: String,
    pub port: u16,
    pub db_engine: DbEngine,
    pub database_url: Option<String>,
    pub db_pool_size: u32,
    pub secret_key: String,
    pub smtp: Option<SmtpInfo>,
    pub public_url: String,
    pub referral_code: String,
    pub admin_mail: String,
    pub admin_password: Option<String>,
    pub session_expiration_days: i64,
    pub accrual_interval_secs: Option<u64>,
    pub workers: usize,
}

/* a value that must parse if it's set, falls back to the default otherwise */
fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T
) -> Result<T, ConfigError>{
    match lookup(key){
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid{ key, value }),
        None => Ok(default),
    }
}

impl AppConfig{

    pub fn from_env() -> Result<Self, ConfigError>{
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError>{

        let db_engine = match lookup("DB_ENGINE").as_deref(){
            None | Some("postgres") => DbEngine::Postgres,
            Some("memory") => DbEngine::Memory,
            Some(other) => return Err(ConfigError::Invalid{ key: "DB_ENGINE", value: other.to_string() }),
        };

        let database_url = lookup("DATABASE_URL");
        if db_engine == DbEngine::Postgres && database_url.is_none(){
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let secret_key = lookup("SECRET_KEY").ok_or(ConfigError::Missing("SECRET_KEY"))?;

        /* mails are only relayed when the whole smtp triple is there */
        let smtp = match (lookup("SMTP_SERVER"), lookup("SMTP_USERNAME"), lookup("SMTP_PASSWORD")){
            (Some(server), Some(username), Some(password)) => Some(SmtpInfo{
                server,
                port: parsed(&lookup, "SMTP_PORT", 587u16)?,
                username,
                password,
            }),
            _ => None,
        };

        let accrual_interval_secs = match lookup("ACCRUAL_INTERVAL_SECS"){
            Some(value) => match value.trim().parse::<u64>(){
                Ok(secs) if secs > 0 => Some(secs),
                _ => return Err(ConfigError::Invalid{ key: "ACCRUAL_INTERVAL_SECS", value }),
            },
            None => None,
        };

        let session_expiration_days = parsed(&lookup, "SESSION_EXPIRATION_DAYS", 7i64)?;
        if !(1..=MAX_SESSION_EXPIRATION_DAYS).contains(&session_expiration_days){
            return Err(ConfigError::Invalid{ key: "SESSION_EXPIRATION_DAYS", value: session_expiration_days.to_string() });
        }

        Ok(AppConfig{
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PANEL_PORT", 7442u16)?,
            db_engine,
            database_url,
            db_pool_size: parsed(&lookup, "DB_POOL_SIZE", 10u32)?,
            secret_key,
            smtp,
            public_url: lookup("PUBLIC_URL")
                .unwrap_or_else(|| "http://127.0.0.1:7442".to_string())
                .trim_end_matches('/')
                .to_string(),
            referral_code: lookup("REFERRAL_CODE").unwrap_or_else(|| DEFAULT_REFERRAL_CODE.to_string()),
            admin_mail: lookup("ADMIN_MAIL").unwrap_or_else(|| "admin@profitbliss.com".to_string()),
            admin_password: lookup("ADMIN_PASSWORD"),
            session_expiration_days,
            accrual_interval_secs,
            workers: parsed(&lookup, "WORKERS", 10usize)?,
        })
    }

    pub fn verification_link(&self, token: &str) -> String{
        format!("{}/verify/{}", self.public_url, token)
    }

    /* a config good enough for tests, backed by the memory engine */
    #[cfg(test)]
    pub fn for_tests() -> Self{
        Self::from_lookup(|key| match key{
            "DB_ENGINE" => Some("memory".to_string()),
            "SECRET_KEY" => Some("test-secret".to_string()),
            "ADMIN_PASSWORD" => Some("admin-pass".to_string()),
            _ => None,
        }).unwrap_or_else(|e| panic!("test config is broken: {}", e))
    }

}
