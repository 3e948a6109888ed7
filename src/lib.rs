pub mod api;
pub mod config;
pub mod controller;
pub mod errors;
pub mod form;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;
pub mod ui;
