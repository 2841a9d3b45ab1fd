// src/lib.rs

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;

pub use routes::create_router;
