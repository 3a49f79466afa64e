//! Core Mingle library (config, paths, auth plumbing, token store).

pub mod auth;
pub mod config;
