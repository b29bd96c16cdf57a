


/*
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=
        PROFIT BLISS PANEL CUSTOM ERROR HANDLER
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=
*/


use std::io::Write;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use crate::constants::{LOGS_FOLDER_ERROR_KIND, SERVER_IO_ERROR_CODE, STORAGE_IO_ERROR_CODE};
use crate::misc::Response;


#[derive(Debug, thiserror::Error)]
pub enum PanelError{

    /* ------ domain errors, recovered at the boundary ------ */
    #[error("Mail Is Already Registered")]
    DuplicateEmail,
    #[error("Invalid Referral Code")]
    InvalidReferral,
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Please Verify Your Email First")]
    NotVerified,
    #[error("Insufficient Balance")]
    InsufficientBalance,
    #[error("Minimum Amount Is {minimum}")]
    BelowMinimum{ minimum: String },
    #[error("Request Has Already Been Decided")]
    NotPending,
    #[error("{0} Not Found")]
    NotFound(&'static str),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Login Required")]
    SessionRequired,
    #[error("Invalid Amount: {0}")]
    InvalidAmount(String),
    #[error("Balance Would Go Out Of Range")]
    BalanceOverflow,
    #[error("Field `{0}` Can't Be Empty")]
    MissingField(&'static str),

    /* ------ infrastructure errors ------ */
    #[error("Storage Error: {0}")]
    Storage(#[from] diesel::result::Error),
    #[error("Storage Pool Error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("Password Hashing Error: {0}")]
    Hash(#[from] argon2::Error),
    #[error("Mail Error: {0}")]
    Mail(#[from] mailreq::MailError),
    #[error("Config Error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl PanelError{

    pub fn is_internal(&self) -> bool{
        matches!(self, Self::Storage(_) | Self::Pool(_) | Self::Hash(_) | Self::Mail(_) | Self::Config(_))
    }

    fn code(&self) -> u16{
        match self{
            Self::Storage(_) | Self::Pool(_) => *STORAGE_IO_ERROR_CODE,
            _ => *SERVER_IO_ERROR_CODE,
        }
    }

    /* appends the error into the error-kind log file, failures to log are only reported */
    pub fn write_sync(&self){

        let filepath = format!("{}/panel-error.log", LOGS_FOLDER_ERROR_KIND);
        let error_log_content = format!(
            "code: {} | message: {} | due to: {:?} | time: {}\n",
            self.code(), self, self, chrono::Local::now().timestamp_millis()
        );

        let written = std::fs::create_dir_all(LOGS_FOLDER_ERROR_KIND)
            .and_then(|_| {
                std::fs::OpenOptions::new()
                    .append(true)
                    .create(true)
                    .open(&filepath)
            })
            .and_then(|mut file| file.write_all(error_log_content.as_bytes()));

        if let Err(e) = written{
            error!("😕 can't write into {} - {}", filepath, e);
        }
    }

}

impl ResponseError for PanelError{

    fn status_code(&self) -> StatusCode{
        match self{
            Self::DuplicateEmail | Self::NotPending => StatusCode::CONFLICT,
            Self::InvalidReferral
                | Self::InsufficientBalance
                | Self::BelowMinimum{..}
                | Self::InvalidAmount(_)
                | Self::BalanceOverflow
                | Self::MissingField(_) => StatusCode::NOT_ACCEPTABLE,
            Self::InvalidCredentials | Self::SessionRequired => StatusCode::UNAUTHORIZED,
            Self::NotVerified | Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_)
                | Self::Pool(_)
                | Self::Hash(_)
                | Self::Mail(_)
                | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse{

        if self.is_internal(){
            error!("😕 internal panel error - {}", self);
            self.write_sync();
        }

        let status = self.status_code();
        let message = self.to_string();
        let resp = Response::<&[u8]>{
            data: Some(&[]),
            message: &message,
            status: status.as_u16(),
            is_error: true
        };
        HttpResponse::build(status).json(resp)
    }
}


#[cfg(test)]
mod tests{

    use super::*;

    #[test]
    fn domain_errors_keep_their_status(){
        assert_eq!(PanelError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(PanelError::NotPending.status_code(), StatusCode::CONFLICT);
        assert_eq!(PanelError::InvalidReferral.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(PanelError::BelowMinimum{ minimum: "50.00".to_string() }.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(PanelError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PanelError::SessionRequired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PanelError::NotVerified.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(PanelError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(PanelError::NotFound("Plan").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(PanelError::BalanceOverflow.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert!(!PanelError::InsufficientBalance.is_internal());
    }

    #[test]
    fn storage_errors_are_internal(){
        let e = PanelError::from(diesel::result::Error::NotFound);
        assert!(e.is_internal());
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_read_well(){
        assert_eq!(PanelError::NotFound("Deposit").to_string(), "Deposit Not Found");
        assert_eq!(PanelError::BelowMinimum{ minimum: "70.00".to_string() }.to_string(), "Minimum Amount Is 70.00");
    }

}
