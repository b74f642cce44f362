//! # vsure-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AlarmProvider` — fetch one account overview per call
//!   - `HubGateway` — read a sensor's last update, send an update command
//!   - `MailboxNotifier` — block until the mailbox reports a change
//! - Map an overview onto hub sensors (`mapper`)
//! - Gate and translate per-device updates (`engine`)
//! - Run one synchronization pass (`services::sync_service`)
//! - Drive passes from a trigger (`trigger`)
//!
//! ## Dependency rule
//! Depends on `vsure-domain` only (plus `tokio::time` for the interval loop).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod mapper;
pub mod ports;
pub mod services;
pub mod trigger;
