pub mod auth;
pub mod budget;
pub mod gate;
pub mod member;
pub mod organization;
pub mod session;
