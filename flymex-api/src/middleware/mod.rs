pub mod auth;
pub mod csrf;
pub mod rate_limit;

pub use auth::{staff_auth_middleware, StaffClaims, STAFF_ROLE};
pub use csrf::{csrf_middleware, CSRF_COOKIE, CSRF_HEADER};
pub use rate_limit::{client_ip, quote_rate_limit_middleware};
