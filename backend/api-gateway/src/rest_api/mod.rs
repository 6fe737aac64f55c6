pub mod auth;
pub mod models;
pub mod profile;
