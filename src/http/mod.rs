//! Thin actix handlers over the repositories, one module per RPC group.

pub mod activities;
pub mod auth;
pub mod bases;
pub mod games;
pub mod health;
pub mod leagues;
pub mod overview;
pub mod routes;
