pub mod auth;
pub mod pvz;
