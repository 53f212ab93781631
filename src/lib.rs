//! StreamVerse backend: title search, playback URL resolution with server
//! failover, and the catalog, recommendation and watchlist collaborators.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
