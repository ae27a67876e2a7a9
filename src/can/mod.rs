//! CAN network primitives shared by the ISOBUS stack
//!
//! Provides:
//! - Reserved address constants and the address validity predicate
//! - The 64-bit NAME identity value

pub mod constants;
pub mod name;

pub use constants::{is_valid_address, BROADCAST_CAN_ADDRESS, CAN_PORT_MAXIMUM, NULL_CAN_ADDRESS};
pub use name::{Name, NameField, NameFieldError};
