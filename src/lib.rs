//! Resolve Node.js version tags (`lts`, `8.x`, `lts/carbon`, `*`) against the
//! official and unofficial release indexes, optionally producing a download
//! URL for a platform/arch pair.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod resolve;
pub mod server;
pub mod service;
