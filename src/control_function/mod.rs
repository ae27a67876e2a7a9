//! Control Function Lifecycle
//!
//! Birth, sharing, classification and retirement of ISOBUS control
//! functions.
//!
//! # Design
//! - Control functions are only reachable through `Arc<ControlFunction>`
//! - The factory registers every new control function with the network
//!   manager before returning it
//! - Only lifecycle code can mint the `Badge` the network manager hooks
//!   require
//! - `destroy` runs under one process-wide lock, swapped for a no-op by the
//!   `disable-threads` feature

mod badge;
#[allow(clippy::module_inception)]
mod control_function;
mod kind;
mod lock;

pub use badge::Badge;
pub use control_function::ControlFunction;
pub use kind::{type_label, ControlFunctionType, ControlFunctionTypes, InvalidControlFunctionType};
pub use lock::{LifecycleLock, NoopLifecycleLock, ProcessingLock, SpinLifecycleLock};
