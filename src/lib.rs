//! # gourmet-guide
//!
//! A chat assistant that recommends dishes from a menu corpus. Each turn
//! runs a short, strictly sequential pipeline of language-model calls around
//! one vector search.
//!
//! ## Turn flow
//!
//! ```text
//!        ┌──────────────┐     ┌──────────────┐
//!        │  User text   │     │ Upload image │
//!        └──────┬───────┘     └──────┬───────┘
//!               │                    ▼
//!               │           ┌─────────────────┐
//!               │           │ Image Describer │
//!               │           └────────┬────────┘
//!               └─────────┬──────────┘ merged request
//!                         ▼
//!               ┌───────────────────┐
//!               │  Query Enhancer   │  (cleaned; used for search
//!               └─────────┬─────────┘   only when flagged)
//!                         ▼
//!               ┌───────────────────┐
//!               │ Retriever  (k=5)  │
//!               └─────────┬─────────┘
//!                         ▼
//!               ┌───────────────────┐
//!               │    Assistant      │  JSON {recommendation, response}
//!               │ + 5-turn memory   │
//!               └────┬─────────┬────┘
//!                yes │         │ no
//!                    ▼         ▼
//!     ┌─────────────────────┐  ┌──────────────┐
//!     │ Relevance gate +    │  │  Text reply  │
//!     │ summary (max 3)     │  └──────────────┘
//!     └─────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server, index and model
//! - [`models`] - Shared data types: messages, `Document`, `ChatTurn`, recommendations
//! - [`llm`] - The `LanguageModel` capability, its HTTP client, and one module per prompt
//! - [`search`] - The `Retriever` capability over the on-disk menu index
//! - [`recommend`] - Per-candidate relevance gate and summaries
//! - [`session`] - Append-only turn history and the memory window
//! - [`pipeline`] - One complete turn, from submission to `ChatTurn`
//! - [`api`] - Axum handlers for chat, history, config and dish images
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod recommend;
pub mod search;
pub mod session;
pub mod state;
