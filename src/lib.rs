//! Shortly - a small URL shortener service
//!
//! Clients submit a long URL and get back a short code that redirects to it.
//! Redirects are counted, and links can be listed and deleted.
//!
//! # Architecture
//! - `codegen`: random base-62 short codes
//! - `storage`: SeaORM-backed URL record store
//! - `services`: validation boundary shared by HTTP and CLI
//! - `api`: HTTP routes and middleware
//! - `interfaces`: command-line commands
//! - `config`: TOML + environment configuration
//! - `runtime`: server startup and execution modes
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
