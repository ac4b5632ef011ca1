//! Character catalog library.
//!
//! Fetches every page of the Rick and Morty character API that matches a filter
//! set, then sorts and re-paginates the combined result on the client.

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod services;
