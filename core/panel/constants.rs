


pub const APP_NAME: &str = "Profit Bliss";
pub type PanelHttpResponse = Result<actix_web::HttpResponse, actix_web::Error>;


/* amounts are kept in cents everywhere */
pub const MIN_DEPOSIT: i64 = 50_00;
pub const MIN_WITHDRAWAL: i64 = 70_00;
/* a single request can't move more than a billion */
pub const MAX_AMOUNT: i64 = 1_000_000_000_00;
pub const DEFAULT_REFERRAL_CODE: &str = "tmdf28dns";
pub const MAX_SESSION_EXPIRATION_DAYS: i64 = 3650;
pub const SESSION_COOKIE_NAME: &str = "bliss_session";
pub const VERIFICATION_TOKEN_LEN: usize = 40;

pub static IAM_HEALTHY: &str = "Ok";
pub static WELCOME: &str = "Welcome To Profit Bliss";
pub static FETCHED: &str = "Fetched Successfully";
pub static SIGNUP_FORM: &str = "Signup With Mail, Password, Country And An Optional Referral Code";
pub static LOGIN_FORM: &str = "Login With Mail And Password";
pub static CHECK_MAIL_TO_VERIFY: &str = "Check Your Email To Verify Your Account";
pub static MAIL_VERIFIED: &str = "Account Verified! You Can Now Login";
pub static LOGGEDIN: &str = "Loggedin Successfully";
pub static LOGOUT: &str = "Loggedout Successfully";
pub static SUBSCRIBED: &str = "Subscribed To Plan Successfully";
pub static DEPOSIT_SUBMITTED: &str = "Deposit Submitted, Awaiting Admin Approval";
pub static WITHDRAWAL_SUBMITTED: &str = "Withdrawal Submitted, Awaiting Admin Approval";
pub static REQUEST_APPROVED: &str = "Request Approved";
pub static REQUEST_REJECTED: &str = "Request Rejected";
pub static PENDING_REQUESTS: &str = "Pending Deposits And Withdrawals";

pub const LOGS_FOLDER_ERROR_KIND: &str = "logs/error-kind";

/* u16 bits is 2 bytes long which is 4 chars in hex */
pub static SERVER_IO_ERROR_CODE: &u16 = &0xFFFE;
pub static STORAGE_IO_ERROR_CODE: &u16 = &0xFFFF;
