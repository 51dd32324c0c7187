//! # Connect Four Minimax
//!
//! Picks a move for a four-in-a-row position: a depth-limited minimax search
//! with alpha-beta pruning, driven by a static evaluator that scores line
//! windows, threat reachability and move parity.
//!
//! ## Modules
//!
//! - [`game`] — Board with constant-time move/undo, cells, players
//! - [`ai`] — Windows, evaluator, alpha-beta search, per-move diagnostics
//! - [`adapter`] — Top-down caller grids in, a single column out
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod adapter;
pub mod ai;
pub mod config;
pub mod error;
pub mod game;
