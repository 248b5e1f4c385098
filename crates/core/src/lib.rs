#![forbid(unsafe_code, clippy::unwrap_used)]
#![allow(clippy::needless_return)]
#![warn(clippy::await_holding_lock, clippy::inefficient_to_string)]

pub mod access;
pub mod app_state;
pub mod config;
pub mod error;

mod catalog;
mod exec;
mod handlers;
mod pool;
mod row;
mod server;
mod sql;

pub use app_state::AppState;
pub use error::ApiError;
pub use server::{InitError, Server, ServerOptions};
