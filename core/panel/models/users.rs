


use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::misc::format_amount;
use crate::schema::users;



/*

    diesel migration generate users ---> create users migration sql files
    diesel migration run            ---> apply sql files to db
    diesel migration redo           ---> drop tables

*/


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[derive(diesel_derive_enum::DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::Userrole"]
#[serde(rename_all = "lowercase")]
pub enum UserRole{
    Admin,
    #[default] /* we've considered the User variant as the default one */
    User,
}

#[derive(Identifiable, Selectable, Queryable, Clone, Debug, PartialEq)]
#[diesel(table_name=users)]
pub struct User{ /* note that the ordering of fields must be the same as the table fields in up.sql */
    pub id: i32,
    pub mail: String,
    pub pswd: String,
    pub country: Option<String>,
    pub balance: i64,
    pub is_verified: bool,
    pub user_role: UserRole,
    pub verification_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Clone, Debug, PartialEq)]
#[diesel(table_name=users)]
pub struct NewUser{
    pub mail: String,
    pub pswd: String,
    pub country: Option<String>,
    pub balance: i64,
    pub is_verified: bool,
    pub user_role: UserRole,
    pub verification_token: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SignupRequest{
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub referral: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoginRequest{
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserData{
    pub id: i32,
    pub mail: String,
    pub country: Option<String>,
    pub balance: String,
    pub is_verified: bool,
    pub user_role: UserRole,
    pub created_at: String,
}

impl From<&User> for UserData{
    fn from(user: &User) -> Self{
        UserData{
            id: user.id,
            mail: user.mail.clone(),
            country: user.country.clone(),
            balance: format_amount(user.balance),
            is_verified: user.is_verified,
            user_role: user.user_role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

impl User{

    pub fn is_admin(&self) -> bool{
        self.user_role == UserRole::Admin
    }

    /* argon2 as the kdf, a random salt per user and the server secret as the argon2 secret */
    pub fn hash_pswd(password: &str, secret: &str) -> Result<String, argon2::Error>{
        let salt = rand::thread_rng().gen::<[u8; 16]>();
        let config = argon2::Config{
            secret: secret.as_bytes(),
            ..argon2::Config::default()
        };
        argon2::hash_encoded(password.as_bytes(), &salt, &config)
    }

    pub fn verify_pswd(&self, raw_pswd: &str, secret: &str) -> Result<bool, argon2::Error>{
        argon2::verify_encoded_ext(&self.pswd, raw_pswd.as_bytes(), secret.as_bytes(), &[])
    }

}


#[cfg(test)]
mod tests{

    use super::*;

    fn user_with(pswd: String) -> User{
        User{
            id: 1,
            mail: "jane@profitbliss.com".to_string(),
            pswd,
            country: None,
            balance: 0,
            is_verified: true,
            user_role: UserRole::User,
            verification_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_roundtrip_needs_the_same_secret(){
        let hash = User::hash_pswd("hunter22", "server-secret").unwrap();
        let user = user_with(hash);
        assert!(user.verify_pswd("hunter22", "server-secret").unwrap());
        assert!(!user.verify_pswd("hunter23", "server-secret").unwrap());
        assert!(!user.verify_pswd("hunter22", "another-secret").unwrap());
    }

    #[test]
    fn same_password_hashes_differently(){
        let a = User::hash_pswd("hunter22", "s").unwrap();
        let b = User::hash_pswd("hunter22", "s").unwrap();
        assert_ne!(a, b);
    }

}
