//! Execute handlers for the stablecoin station.
//!
//! This module contains all execute message handlers, organized by category:
//! - `bridge` - outgoing transfers
//! - `receive` - OnMessage, the settlement reply and remediation
//! - `config` - peers and token registry
//! - `admin` - roles, pause/unpause and configuration updates

mod admin;
mod bridge;
mod config;
mod receive;

pub use admin::*;
pub use bridge::*;
pub use config::*;
pub use receive::*;
