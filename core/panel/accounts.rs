


use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use uuid::Uuid;
use crate::constants::{MAX_SESSION_EXPIRATION_DAYS, VERIFICATION_TOKEN_LEN};
use crate::error::PanelError;
use crate::misc::gen_random_token;
use crate::models::sessions::Session;
use crate::models::users::{NewUser, SignupRequest, User, UserRole};
use crate::storage::Store;


/* a freshly registered account along with the token its verification link carries */
#[derive(Clone, Debug)]
pub struct Registration{
    pub user: User,
    pub verification_token: String,
}

pub struct Accounts{
    store: Arc<dyn Store>,
    secret: String,
    referral_code: String,
    session_ttl: Duration,
}

fn normalize_mail(mail: &str) -> String{
    mail.trim().to_lowercase()
}

impl Accounts{

    pub fn new(store: Arc<dyn Store>, secret: &str, referral_code: &str, session_ttl_days: i64) -> Self{
        Self{
            store,
            secret: secret.to_string(),
            referral_code: referral_code.to_string(),
            session_ttl: Duration::days(session_ttl_days.clamp(1, MAX_SESSION_EXPIRATION_DAYS)),
        }
    }

    pub fn register(&self, signup: &SignupRequest) -> Result<Registration, PanelError>{

        let referral = signup.referral.trim();
        if !referral.is_empty() && referral != self.referral_code{
            return Err(PanelError::InvalidReferral);
        }

        let mail = normalize_mail(&signup.email);
        if mail.is_empty(){
            return Err(PanelError::MissingField("email"));
        }
        if signup.password.is_empty(){
            return Err(PanelError::MissingField("password"));
        }
        if self.store.find_user_by_mail(&mail)?.is_some(){
            return Err(PanelError::DuplicateEmail);
        }

        let verification_token = gen_random_token(VERIFICATION_TOKEN_LEN);
        let country = signup.country.trim();
        let user = self.store.insert_user(NewUser{
            mail,
            pswd: User::hash_pswd(&signup.password, &self.secret)?,
            country: (!country.is_empty()).then(|| country.to_string()),
            balance: 0,
            is_verified: false,
            user_role: UserRole::User,
            verification_token: Some(verification_token.clone()),
        })?;
        info!("➔ 🙋 new user [{}] registered with mail {}", user.id, user.mail);

        Ok(Registration{ user, verification_token })
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, PanelError>{

        let Some(user) = self.store.find_user_by_mail(&normalize_mail(email))? else{
            return Err(PanelError::InvalidCredentials);
        };
        if !user.verify_pswd(password, &self.secret)?{
            return Err(PanelError::InvalidCredentials);
        }
        if !user.is_verified{
            return Err(PanelError::NotVerified);
        }

        Ok(user)
    }

    pub fn verify(&self, token: &str) -> Result<User, PanelError>{

        if token.is_empty(){
            return Err(PanelError::NotFound("Verification Token"));
        }
        let user = self.store
            .verify_user(token)?
            .ok_or(PanelError::NotFound("Verification Token"))?;
        info!("➔ ✅ user [{}] verified its mail", user.id);

        Ok(user)
    }

    /* every login also sweeps the expired sessions of everyone */
    pub fn open_session(&self, user: &User, now: DateTime<Utc>) -> Result<Session, PanelError>{

        let purged = self.store.purge_sessions(now)?;
        if purged > 0{
            debug!("➔ purged {} expired sessions", purged);
        }

        let session = self.store.insert_session(Session{
            token: Uuid::new_v4().simple().to_string(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.session_ttl,
        })?;
        info!("➔ 🔑 user [{}] logged in, session expires at {}", user.id, session.expires_at);

        Ok(session)
    }

    /* the owner of a live session, an expired session is dropped on sight */
    pub fn resolve_session(&self, token: &str, now: DateTime<Utc>) -> Result<User, PanelError>{

        let Some(session) = self.store.find_session(token)? else{
            return Err(PanelError::SessionRequired);
        };
        if session.is_expired(now){
            self.store.delete_session(token)?;
            return Err(PanelError::SessionRequired);
        }

        self.store
            .find_user_by_id(session.user_id)?
            .ok_or(PanelError::SessionRequired)
    }

    pub fn close_session(&self, token: &str) -> Result<(), PanelError>{
        self.store.delete_session(token)
    }

    /* seeds a verified admin if the mail isn't taken yet, returns the new admin */
    pub fn ensure_admin(&self, mail: &str, password: &str) -> Result<Option<User>, PanelError>{

        let mail = normalize_mail(mail);
        if self.store.find_user_by_mail(&mail)?.is_some(){
            return Ok(None);
        }

        let inserted = self.store.insert_user(NewUser{
            mail,
            pswd: User::hash_pswd(password, &self.secret)?,
            country: None,
            balance: 0,
            is_verified: true,
            user_role: UserRole::Admin,
            verification_token: None,
        });

        match inserted{
            Ok(admin) => {
                info!("➔ 👑 admin account [{}] seeded with mail {}", admin.id, admin.mail);
                Ok(Some(admin))
            },
            /* another instance seeded it in between */
            Err(PanelError::DuplicateEmail) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn reload(&self, user_id: i32) -> Result<User, PanelError>{
        self.store
            .find_user_by_id(user_id)?
            .ok_or(PanelError::NotFound("User"))
    }

}


#[cfg(test)]
mod tests{

    use crate::storage::MemStore;
    use super::*;

    fn accounts() -> Accounts{
        Accounts::new(Arc::new(MemStore::new()), "test-secret", "tmdf28dns", 7)
    }

    fn signup(email: &str, referral: &str) -> SignupRequest{
        SignupRequest{
            email: email.to_string(),
            password: "hunter22".to_string(),
            country: "Germany".to_string(),
            referral: referral.to_string(),
        }
    }

    #[test]
    fn register_verify_then_login(){
        let accounts = accounts();
        let registration = accounts.register(&signup(" Jane@ProfitBliss.com ", "")).unwrap();
        assert_eq!(registration.user.mail, "jane@profitbliss.com");
        assert_eq!(registration.verification_token.len(), VERIFICATION_TOKEN_LEN);
        assert!(!registration.user.is_verified);

        assert!(matches!(
            accounts.authenticate("jane@profitbliss.com", "hunter22"),
            Err(PanelError::NotVerified)
        ));

        let verified = accounts.verify(&registration.verification_token).unwrap();
        assert!(verified.is_verified);
        assert!(matches!(
            accounts.verify(&registration.verification_token),
            Err(PanelError::NotFound(_))
        ));

        let user = accounts.authenticate("JANE@profitbliss.com", "hunter22").unwrap();
        assert_eq!(user.id, registration.user.id);
        assert!(matches!(
            accounts.authenticate("jane@profitbliss.com", "hunter23"),
            Err(PanelError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.authenticate("nobody@profitbliss.com", "hunter22"),
            Err(PanelError::InvalidCredentials)
        ));
    }

    #[test]
    fn referral_and_duplicates_are_refused(){
        let accounts = accounts();
        assert!(matches!(
            accounts.register(&signup("jane@profitbliss.com", "nope")),
            Err(PanelError::InvalidReferral)
        ));
        accounts.register(&signup("jane@profitbliss.com", "tmdf28dns")).unwrap();
        assert!(matches!(
            accounts.register(&signup("JANE@profitbliss.com", "")),
            Err(PanelError::DuplicateEmail)
        ));
        assert!(matches!(accounts.register(&signup("  ", "")), Err(PanelError::MissingField("email"))));
    }

    #[test]
    fn sessions_expire_and_close(){
        let accounts = accounts();
        let registration = accounts.register(&signup("jane@profitbliss.com", "")).unwrap();
        let now = Utc::now();

        let session = accounts.open_session(&registration.user, now).unwrap();
        assert_eq!(accounts.resolve_session(&session.token, now).unwrap().id, registration.user.id);

        let too_late = now + Duration::days(7);
        assert!(matches!(accounts.resolve_session(&session.token, too_late), Err(PanelError::SessionRequired)));
        /* dropped once seen expired */
        assert!(matches!(accounts.resolve_session(&session.token, now), Err(PanelError::SessionRequired)));

        let session = accounts.open_session(&registration.user, now).unwrap();
        accounts.close_session(&session.token).unwrap();
        assert!(matches!(accounts.resolve_session(&session.token, now), Err(PanelError::SessionRequired)));
    }

    #[test]
    fn login_purges_expired_sessions(){
        let store = Arc::new(MemStore::new());
        let accounts = Accounts::new(store.clone(), "test-secret", "tmdf28dns", 7);
        let registration = accounts.register(&signup("jane@profitbliss.com", "")).unwrap();
        let now = Utc::now();

        let stale = accounts.open_session(&registration.user, now).unwrap();
        let later = now + Duration::days(8);
        let fresh = accounts.open_session(&registration.user, later).unwrap();

        assert!(store.find_session(&stale.token).unwrap().is_none());
        assert!(store.find_session(&fresh.token).unwrap().is_some());
    }

    #[test]
    fn oversized_session_ttl_is_clamped(){
        let accounts = Accounts::new(Arc::new(MemStore::new()), "test-secret", "tmdf28dns", i64::MAX);
        let registration = accounts.register(&signup("jane@profitbliss.com", "")).unwrap();
        let now = Utc::now();
        let session = accounts.open_session(&registration.user, now).unwrap();
        assert_eq!(session.expires_at, now + Duration::days(MAX_SESSION_EXPIRATION_DAYS));
    }

    #[test]
    fn admin_is_seeded_once(){
        let accounts = accounts();
        let admin = accounts.ensure_admin("admin@profitbliss.com", "admin-pass").unwrap().unwrap();
        assert!(admin.is_admin());
        assert!(admin.is_verified);
        assert!(accounts.ensure_admin("admin@profitbliss.com", "admin-pass").unwrap().is_none());
        assert!(accounts.authenticate("admin@profitbliss.com", "admin-pass").unwrap().is_admin());
    }

}
