//! Command handlers

pub mod bookmark;
pub mod config;
pub mod session;
pub mod status;
pub mod tag;
