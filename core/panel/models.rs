


/*  > ---------------------------------------------------------------------------------------------
    |
    |   users             ---> methods of postgres users table
    |   plans             ---> methods of postgres plans table, the investment tiers
    |   active_plans      ---> methods of postgres active_plans table, the subscriptions
    |   funding           ---> deposit and withdrawal requests as one record
    |   users_deposits    ---> methods of postgres users_deposits table
    |   users_withdrawals ---> methods of postgres users_withdrawals table
    |   sessions          ---> methods of postgres sessions table
    |
*/

pub mod users;
pub mod plans;
pub mod active_plans;
pub mod funding;
pub mod users_deposits;
pub mod users_withdrawals;
pub mod sessions;
