pub mod auth;
pub mod employees;
pub mod router;
pub mod user;
