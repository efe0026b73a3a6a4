//! Chirp client core - session, feeds, votes, and API access for the
//! Chirp micro-posting service.
//!
//! This library is headless: it holds the session, synchronizes
//! paginated feeds, reconciles optimistic votes, and exposes typed
//! clients for every backend endpoint, leaving presentation entirely to
//! the embedding front end.

pub mod adapters;
pub mod auth;
pub mod bus;
pub mod config;
pub mod error;
pub mod feed;
pub mod gateway;
pub mod models;
pub mod notices;
pub mod prelude;
pub mod traits;
pub mod vote;
