


/*

    all APIs in here are based on the access levels
    which are defined for this app, thus based on
    those access levels we have the public, user,
    admin and health services with registered APIs

*/

use actix_web::web;
use crate::apis;


/*
     --------------------------------
    |      REGISTER ADMIN ROUTES
    | -------------------------------
    |
    |

*/
pub fn init_admin(config: &mut web::ServiceConfig){

    config.service(
        web::scope("/admin")
            .service(apis::admin::exports::index)
            .service(apis::admin::exports::decide)
    );

}

/*
     --------------------------------
    |       REGISTER USER ROUTES
    | -------------------------------
    |
    |

*/
pub fn init_user(config: &mut web::ServiceConfig){

    config.service(apis::user::exports::dashboard);
    config.service(apis::user::exports::subscribe);
    config.service(apis::user::exports::deposit_history);
    config.service(apis::user::exports::deposit);
    config.service(apis::user::exports::withdrawal_history);
    config.service(apis::user::exports::withdraw);

}

/*
     --------------------------------
    |     REGISTER HEALTH ROUTES
    | -------------------------------
    |
    |

*/
pub fn init_health(config: &mut web::ServiceConfig){

    config.service(
        web::scope("/health")
            .service(apis::health::exports::index)
    );

}

/*
     --------------------------------
    |     REGISTER PUBLIC ROUTES
    | -------------------------------
    |
    |

*/
pub fn init_public(config: &mut web::ServiceConfig){

    config.service(apis::public::exports::index);
    config.service(apis::public::exports::signup_form);
    config.service(apis::public::exports::signup);
    config.service(apis::public::exports::verify);
    config.service(apis::public::exports::login_form);
    config.service(apis::public::exports::login);
    config.service(apis::public::exports::logout);

}

pub fn configure(config: &mut web::ServiceConfig){
    init_health(config);
    init_admin(config);
    init_user(config);
    init_public(config);
}
