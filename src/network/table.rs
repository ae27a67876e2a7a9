//! Control Function Table
//!
//! In-memory `NetworkManager` that tracks live control functions per CAN
//! port.
//!
//! # Design
//! - Entries are keyed by `(can_port, NAME)` and hold strong handles
//! - A `spin::Mutex` guards the map; it is separate from the lifecycle lock
//!   and is never held while calling back into control function code that
//!   takes the lifecycle lock
//! - Removal only drops an entry whose handle is the same allocation as the
//!   one being destroyed, so a stale handle cannot evict its replacement

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use log::{trace, warn};
use spin::Mutex;

use super::manager::NetworkManager;
use crate::can::{is_valid_address, Name};
use crate::control_function::{Badge, ControlFunction, ControlFunctionTypes};

type TableKey = (u8, Name);

/// Live control functions known to the stack.
#[derive(Debug)]
pub struct ControlFunctionTable {
    entries: Mutex<BTreeMap<TableKey, Arc<ControlFunction>>>,
    created_notifications: AtomicUsize,
    destroyed_notifications: AtomicUsize,
}

impl ControlFunctionTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            created_notifications: AtomicUsize::new(0),
            destroyed_notifications: AtomicUsize::new(0),
        }
    }

    /// Number of tracked control functions across all ports.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains(&self, can_port: u8, name: Name) -> bool {
        self.entries.lock().contains_key(&(can_port, name))
    }

    /// Look up a control function by NAME.
    pub fn get(&self, can_port: u8, name: Name) -> Option<Arc<ControlFunction>> {
        self.entries.lock().get(&(can_port, name)).cloned()
    }

    /// Look up the control function currently holding `address` on `can_port`.
    ///
    /// NULL and broadcast never match.
    pub fn find_by_address(&self, can_port: u8, address: u8) -> Option<Arc<ControlFunction>> {
        if !is_valid_address(address) {
            return None;
        }
        let entries = self.entries.lock();
        entries
            .range(Self::port_range(can_port))
            .map(|(_, cf)| cf)
            .find(|cf| cf.address() == address)
            .cloned()
    }

    /// Snapshot of the control functions on `can_port` whose type is in
    /// `types`, ordered by NAME.
    pub fn control_functions(
        &self,
        can_port: u8,
        types: ControlFunctionTypes,
    ) -> Vec<Arc<ControlFunction>> {
        let entries = self.entries.lock();
        entries
            .range(Self::port_range(can_port))
            .map(|(_, cf)| cf)
            .filter(|cf| types.matches(cf.control_function_type()))
            .cloned()
            .collect()
    }

    /// Record the outcome of an address claim.
    ///
    /// Returns `false` if no control function with `name` is tracked on
    /// `can_port`.
    pub fn reassign_address(&self, can_port: u8, name: Name, address: u8) -> bool {
        let entries = self.entries.lock();
        match entries.get(&(can_port, name)) {
            Some(cf) => {
                cf.set_address(address);
                true
            }
            None => false,
        }
    }

    /// Total creation notifications received.
    pub fn created_notifications(&self) -> usize {
        self.created_notifications.load(Ordering::Acquire)
    }

    /// Total destruction notifications received, including ones for
    /// control functions that were no longer tracked.
    pub fn destroyed_notifications(&self) -> usize {
        self.destroyed_notifications.load(Ordering::Acquire)
    }

    fn port_range(can_port: u8) -> core::ops::RangeInclusive<TableKey> {
        (can_port, Name::new(u64::MIN))..=(can_port, Name::new(u64::MAX))
    }
}

impl Default for ControlFunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkManager for ControlFunctionTable {
    fn on_control_function_created(
        &self,
        control_function: Arc<ControlFunction>,
        _badge: Badge<ControlFunction>,
    ) {
        self.created_notifications.fetch_add(1, Ordering::AcqRel);
        let key = (control_function.can_port(), control_function.name());
        let mut entries = self.entries.lock();
        if let Some(previous) = entries.insert(key, control_function) {
            warn!(
                "[NET] NAME {} re-created on port {}, replacing {}",
                key.1, key.0, previous
            );
        } else {
            trace!("[NET] tracking NAME {} on port {}", key.1, key.0);
        }
    }

    fn on_control_function_destroyed(
        &self,
        control_function: &Arc<ControlFunction>,
        _badge: Badge<ControlFunction>,
    ) {
        self.destroyed_notifications.fetch_add(1, Ordering::AcqRel);
        let key = (control_function.can_port(), control_function.name());

        // Drop the table's handle after releasing the map lock.
        let removed = {
            let mut entries = self.entries.lock();
            let tracked = matches!(
                entries.get(&key),
                Some(tracked) if Arc::ptr_eq(tracked, control_function)
            );
            if tracked {
                entries.remove(&key)
            } else {
                None
            }
        };

        match removed {
            Some(_) => trace!("[NET] released NAME {} on port {}", key.1, key.0),
            None => trace!("[NET] NAME {} on port {} was not tracked", key.1, key.0),
        }
    }
}
