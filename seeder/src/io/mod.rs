//! Side-effecting helpers: configuration, HTTP, headless browser, filesystem.

pub mod browser;
pub mod config;
pub mod fetch;
pub mod json_store;
pub mod pacer;
pub mod process;
pub mod response_cache;
