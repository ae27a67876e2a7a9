//! Network manager interface
//!
//! Provides:
//! - The `NetworkManager` contract control functions report their lifecycle to
//! - `ControlFunctionTable`, an in-memory manager keyed by port and NAME

mod manager;
mod table;

pub use manager::NetworkManager;
pub use table::ControlFunctionTable;
