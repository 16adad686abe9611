//! Paperback Storefront library.
//!
//! This crate provides the bookstore's data-access layer as a library,
//! allowing it to be tested and reused by the CLI and any UI host.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod session;
