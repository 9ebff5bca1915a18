//! HTTP front end for the PostgreSQL parameter advisor

pub mod api;
pub mod config;
