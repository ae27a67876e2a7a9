//! isobus - ISO 11783 control function lifecycle core
//!
//! Identity and lifetime management for ISOBUS control functions: the
//! logical representatives of the ECUs on a CAN segment.
//!
//! # Scope
//! - Control function entity, shared through `Arc`
//! - Internal / External / Partnered classification
//! - Capability-gated creation and destruction notifications to the
//!   network manager
//! - NAME identity value and reserved address constants
//!
//! Address claiming, frame I/O and transport protocols live elsewhere and
//! talk to this crate through [`NetworkManager`].
//!
//! # Features
//! - `disable-threads`: replace the process-wide processing lock with a
//!   no-op for targets without concurrent scheduling
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use isobus::{ControlFunction, ControlFunctionTable, Name, NetworkManager};
//!
//! let table = Arc::new(ControlFunctionTable::new());
//! let network: Arc<dyn NetworkManager> = table.clone();
//!
//! let cf = ControlFunction::create(&network, Name::new(0x1234), 0x80, 0);
//! assert!(table.contains(0, Name::new(0x1234)));
//!
//! assert!(cf.destroy(0));
//! assert!(table.is_empty());
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod can;
pub mod control_function;
pub mod network;

pub use can::{is_valid_address, Name, BROADCAST_CAN_ADDRESS, NULL_CAN_ADDRESS};
pub use control_function::{Badge, ControlFunction, ControlFunctionType, ControlFunctionTypes};
pub use network::{ControlFunctionTable, NetworkManager};
