//! Goalwatch
//!
//! A Telegram alert bot that watches football fixtures for likely
//! low-scoring outcomes.
//!
//! ## Architecture
//!
//! ```text
//! API-Football → Strategies (pre-match, live pressure) → Alerts → Telegram
//!                     ↑                ↑
//!            Monte Carlo sim     Alert ledger (dedup, on disk)
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod features;
pub mod ledger;
pub mod notify;
pub mod server;
pub mod sim;
pub mod strategy;
pub mod telegram;
pub mod types;
