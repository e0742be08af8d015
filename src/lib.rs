//! Library crate for geoquiz-back: the quiz session engine plus the HTTP layer
//! wrapped around it, exposed for the binaries and integration tests.

pub mod catalog;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
