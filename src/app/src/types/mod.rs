//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - device: host configuration, status and relay list payloads
//! - relay: relay write requests and responses
//! - firmware: version descriptors and update verdicts
//! - notification: banners and the dismissal store
//! - poll: relay poll/write coordination

pub mod device;
pub mod firmware;
pub mod notification;
pub mod poll;
pub mod relay;

pub use device::*;
pub use firmware::*;
pub use notification::*;
pub use poll::*;
pub use relay::*;
