pub mod auth;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod health;
pub mod routes;
pub mod scoring;
pub mod server;
pub mod test_utils;

pub use config::Config;
pub use server::Server;
