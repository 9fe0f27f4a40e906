//! # TaskCal API Server Library
//!
//! HTTP boundary for the TaskCal calendar task manager.
//!
//! ## Modules
//!
//! - `app`: Application state, session middleware, and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
