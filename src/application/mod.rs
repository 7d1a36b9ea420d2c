//! Application services layer.

pub mod admin;
pub mod error;
pub mod input;
pub mod messages;
pub mod nonce;
pub mod options;
pub mod repos;
pub mod sessions;
