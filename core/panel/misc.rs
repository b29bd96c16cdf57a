


use rand::{distributions::Alphanumeric, Rng};
use serde::{Serialize, Deserialize};
use crate::constants::MAX_AMOUNT;
use crate::error::PanelError;


#[derive(Serialize, Deserialize, Debug)]
pub struct Response<'m, T>{
    pub data: Option<T>,
    pub message: &'m str, // &str are a slice of String thus they're behind a pointer and every pointer needs a valid lifetime which is 'm in here
    pub status: u16,
    pub is_error: bool
}

/*
    builds the json response of an api and returns it from
    the caller, thus it must be the last thing in a match arm
    or the body of the api
*/
#[macro_export]
macro_rules! resp {
    (
        $data_type:ty,
        $data:expr,
        $msg:expr,
        $code:expr,
        $cookie:expr,
    ) => {

        {
            use actix_web::HttpResponse;
            use $crate::misc::Response;

            let code = $code.as_u16();
            let mut res = HttpResponse::build($code);

            let response_data = Response::<$data_type>{
                data: Some($data),
                message: $msg,
                status: code,
                is_error: code >= 400
            };

            let resp = if let Some(cookie) = $cookie{
                res
                    .cookie(cookie)
                    .json(
                        response_data
                    )
            } else{
                res
                    .json(
                        response_data
                    )
            };

            return Ok(resp);
        }
    }
}


/* parses a decimal amount like `100`, `100.5` or `100.50` into cents, up to MAX_AMOUNT */
pub fn parse_amount(raw: &str) -> Result<i64, PanelError>{

    let invalid = || PanelError::InvalidAmount(raw.to_string());
    let trimmed = raw.trim();
    let (units, fraction) = match trimmed.split_once('.'){
        Some((units, fraction)) => (units, fraction),
        None => (trimmed, ""),
    };

    if units.is_empty()
        || fraction.len() > 2
        || !units.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit()){
        return Err(invalid());
    }

    let units = units.parse::<i64>().map_err(|_| invalid())?;
    let cents = match fraction.len(){
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse::<i64>().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(cents))
        .filter(|c| *c <= MAX_AMOUNT)
        .ok_or_else(invalid)
}

pub fn format_amount(cents: i64) -> String{
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

pub fn gen_random_token(len: usize) -> String{
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}


#[cfg(test)]
mod tests{

    use super::*;

    #[test]
    fn amounts_are_parsed_into_cents(){
        assert_eq!(parse_amount("100").unwrap(), 100_00);
        assert_eq!(parse_amount("100.5").unwrap(), 100_50);
        assert_eq!(parse_amount(" 49.99 ").unwrap(), 49_99);
        assert_eq!(parse_amount("0.07").unwrap(), 7);
    }

    #[test]
    fn junk_amounts_are_rejected(){
        for raw in ["", "-5", "1.234", "abc", "1.x", ".5", "99999999999999999999"]{
            assert!(matches!(parse_amount(raw), Err(PanelError::InvalidAmount(_))), "{raw}");
        }
    }

    #[test]
    fn amounts_above_the_cap_are_rejected(){
        assert_eq!(parse_amount("1000000000").unwrap(), MAX_AMOUNT);
        for raw in ["1000000000.01", "92233720368547758.07"]{
            assert!(matches!(parse_amount(raw), Err(PanelError::InvalidAmount(_))), "{raw}");
        }
    }

    #[test]
    fn amounts_are_formatted(){
        assert_eq!(format_amount(60_00), "60.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(-70_10), "-70.10");
    }

    #[test]
    fn tokens_are_random_and_sized(){
        let a = gen_random_token(40);
        let b = gen_random_token(40);
        assert_eq!(a.len(), 40);
        assert_ne!(a, b);
    }

}
