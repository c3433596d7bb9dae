//! Marketing site and lead management for a language school.
//!
//! Two binaries share this library: `web` serves the public site and accepts
//! callback requests over HTTP, `bot` is the Telegram admin console that
//! lists leads and toggles their processed status. Both open the same SQLite
//! lead store; SQLite's own locking is the only cross-process coordination.

pub mod bot;
pub mod config;
pub mod logging;
pub mod notify;
pub mod pricing;
pub mod store;
pub mod web;
