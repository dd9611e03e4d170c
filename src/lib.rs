pub mod api;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod guard;
pub mod selector;
pub mod server;
pub mod store;
