//! CrmDash Library
//!
//! This library provides the core of the CrmDash dashboard: the widget
//! catalog, the customizable layout store and its controller, and the global
//! search engine, plus the terminal, command-line, and HTTP front ends that
//! drive them.

// Module declarations
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod services;
pub mod tui;
#[cfg(feature = "web")]
pub mod web;
