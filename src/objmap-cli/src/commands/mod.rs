//! Command handlers

pub mod build;
pub mod configure;
pub mod query;
