//! Settings panel AJAX service: module settings, email templates and SMTP checks.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
