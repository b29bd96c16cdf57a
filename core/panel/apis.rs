


/*  > ---------------------------------------------------------------------------------------------
    | every api return type is Result<actix_web::HttpResponse, actix_web::Error>
    | that means if everyting goes well an api returns the json envelope with
    | the data otherwise the PanelError gets converted into the same envelope
    | with is_error set to true.
    |
    |   public ---> landing, signup, verification, login and logout
    |   user   ---> all apis with user access
    |   admin  ---> all apis with admin access
    |   health ---> all apis related to server health
    |
*/
pub mod public;
pub mod user;
pub mod admin;
pub mod health;
