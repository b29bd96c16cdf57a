


use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpRequest;
use crate::constants::{MAX_SESSION_EXPIRATION_DAYS, SESSION_COOKIE_NAME};


/*
    pulls the opaque session token out of a request, the session
    cookie wins over an `Authorization: Bearer` header
*/
pub trait Passport{

    type Request;
    fn session_token(&self) -> Option<String>;

}

impl Passport for HttpRequest{

    type Request = HttpRequest;

    fn session_token(&self) -> Option<String>{

        let req = self as &Self::Request;

        if let Some(cookie) = req.cookie(SESSION_COOKIE_NAME){
            let token = cookie.value().trim();
            if !token.is_empty(){
                return Some(token.to_string());
            }
        }

        let authen_header = req.headers().get("Authorization")?;
        let authen_str = authen_header.to_str().ok()?;
        if authen_str.starts_with("bearer") || authen_str.starts_with("Bearer"){
            let token = authen_str[6..].trim();
            if !token.is_empty(){
                return Some(token.to_string());
            }
        }

        None
    }

}

pub fn session_cookie(token: &str, days: i64) -> Cookie<'static>{
    Cookie::build(SESSION_COOKIE_NAME, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(days.clamp(1, MAX_SESSION_EXPIRATION_DAYS)))
        .finish()
}

/* an already expired cookie so the browser drops the session one */
pub fn removal_cookie() -> Cookie<'static>{
    let mut cookie = Cookie::build(SESSION_COOKIE_NAME, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}


#[cfg(test)]
mod tests{

    use actix_web::test::TestRequest;
    use super::*;

    #[test]
    fn cookie_wins_over_the_header(){
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "from-cookie"))
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        assert_eq!(req.session_token().as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_header_is_read(){
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer  abc123 "))
            .to_http_request();
        assert_eq!(req.session_token().as_deref(), Some("abc123"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc123"))
            .to_http_request();
        assert!(req.session_token().is_none());
        assert!(TestRequest::default().to_http_request().session_token().is_none());
    }

    #[test]
    fn removal_cookie_is_expired(){
        let cookie = removal_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

}
