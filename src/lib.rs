//! Plinko - Chat Mini-App Reward Game Backend
//!
//! Authenticates signed mini-app init data and runs the drop game on top of
//! a per-player economy of points and replenishing balls. All game state is
//! in-memory and per-process; the account ledger is the natural seam for
//! swapping in a persistent backend later.

pub mod api;
pub mod auth;
pub mod config;
pub mod economy;
pub mod game;
