//! Axum handlers for the chat page.

pub mod assets;
pub mod chat;
pub mod config;
pub mod history;
