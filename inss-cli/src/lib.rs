pub mod app;
pub mod config;
pub mod document;
pub mod logging;
pub mod report;
