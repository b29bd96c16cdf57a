


/*

    Profit Bliss panel: accounts, a fixed plan catalog, daily roi accrual
    and admin approved deposits and withdrawals over actix and diesel

        storage ---> the Store trait with its postgres and memory engines
        ledger  ---> catalog, accrual, subscriptions and the request queue
        apis    ---> http handlers, registered in services

*/

pub mod accounts;
pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod mailer;
pub mod misc;
pub mod models;
pub mod passport;
pub mod schema;
pub mod server;
pub mod services;
pub mod storage;
