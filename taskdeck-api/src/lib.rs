//! # Taskdeck API Server Library
//!
//! Core functionality for the taskdeck API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `response`: Success response envelope
//! - `validation`: Request payload validation helpers
//! - `middleware`: Response-envelope stamping and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod validation;
