//! # estate-chat
//!
//! Conversational front-end for a remote real-estate locality analysis
//! service. A question goes to the service, the answer comes back as prose,
//! chart rows, and a data table, and the chart rows are reshaped into
//! renderer-ready series (single-locality trend or multi-locality
//! comparison).
//!
//! Modules, leaf-first: `analysis` (HTTP client and wire types), `series`
//! (chart shaping), `conversation` (append-only message log), `controller`
//! (one-turn-at-a-time state machine), plus `export`, `render`, `config`,
//! and the terminal `session` loop.

pub mod analysis;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod export;
pub mod render;
pub mod series;
pub mod session;
