#[macro_use]
extern crate tracing;

pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod objects;
pub mod routes;
pub mod runtime;
pub mod state;
