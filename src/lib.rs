pub mod auth;
pub mod config;
pub mod db;
pub mod logger;
pub mod templates;
pub mod ui;
pub mod users;
pub mod validate;
