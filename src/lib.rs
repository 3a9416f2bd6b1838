//! tripcache library
//!
//! A read-through TTL cache in front of four travel-data upstreams, exposed
//! for the `tripcache` binary and for integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
