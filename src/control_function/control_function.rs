//! Control Function Entity
//!
//! A control function is the logical representative of one node on a CAN
//! segment. Many stack components hold the same control function at once, so
//! it only ever lives behind an `Arc`.
//!
//! # Lifecycle
//! ```text
//!   create ──► Registered ──destroy──► Deregistered ──last Arc dropped──► freed
//! ```
//! - `create` is the only constructor and announces the new entity to the
//!   network manager before handing it out
//! - `destroy` removes it from the network manager and reports whether the
//!   caller's view of the remaining holders was right
//! - Other holders keep working handles after `destroy`

use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use log::{debug, trace, warn};

use super::badge::Badge;
use super::kind::{type_label, ControlFunctionType};
use super::lock::{LifecycleLock, CONTROL_FUNCTION_PROCESSING_LOCK};
use crate::can::{is_valid_address, Name, CAN_PORT_MAXIMUM};
use crate::network::NetworkManager;

/// One node on the ISOBUS network.
///
/// Type, NAME and CAN port never change. The address is owned by the
/// network manager's address claim processing.
pub struct ControlFunction {
    control_function_type: ControlFunctionType,
    name: Name,
    address: AtomicU8,
    can_port: u8,
    registered: AtomicBool,
    network: Arc<dyn NetworkManager>,
}

impl ControlFunction {
    /// Create an external control function and register it with `network`.
    pub fn create(
        network: &Arc<dyn NetworkManager>,
        name: Name,
        address: u8,
        can_port: u8,
    ) -> Arc<Self> {
        Self::create_with_type(network, name, address, can_port, ControlFunctionType::External)
    }

    /// Create a control function of the given type and register it with
    /// `network`.
    ///
    /// The network manager receives its own handle before this returns, so a
    /// fresh control function has two holders: the caller and the manager.
    pub fn create_with_type(
        network: &Arc<dyn NetworkManager>,
        name: Name,
        address: u8,
        can_port: u8,
        control_function_type: ControlFunctionType,
    ) -> Arc<Self> {
        debug_assert!(can_port < CAN_PORT_MAXIMUM, "CAN port {} out of range", can_port);

        // Registered from birth: the hook may share the handle, and a holder
        // may destroy it, before this function returns.
        let control_function = Arc::new(Self {
            control_function_type,
            name,
            address: AtomicU8::new(address),
            can_port,
            registered: AtomicBool::new(true),
            network: Arc::clone(network),
        });

        trace!("[CF] notifying network manager of {}", control_function);
        network.on_control_function_created(Arc::clone(&control_function), Badge::new());

        debug!("[CF] created {}", control_function);
        control_function
    }

    /// Remove this control function from the network manager.
    ///
    /// `expected_ref_count` is the number of holders the caller expects to
    /// remain besides itself. Returns `true` when the observed holder count
    /// matches. A `false` result is informational: the control function is
    /// deregistered either way and is freed once the last holder drops it.
    ///
    /// Notification and count are sampled inside the process-wide
    /// processing lock.
    pub fn destroy(self: &Arc<Self>, expected_ref_count: u32) -> bool {
        CONTROL_FUNCTION_PROCESSING_LOCK.with_lock(|| {
            if !self.registered.swap(false, Ordering::AcqRel) {
                warn!("[CF] destroying already deregistered {}", self);
            }

            trace!("[CF] notifying network manager of teardown of {}", self);
            self.network.on_control_function_destroyed(self, Badge::new());

            let ref_count = Arc::strong_count(self) as u64;
            let expected = u64::from(expected_ref_count) + 1;
            if ref_count == expected {
                debug!("[CF] destroyed {}", self);
                true
            } else {
                warn!(
                    "[CF] {} still has {} holders after destroy, expected {}",
                    self, ref_count, expected
                );
                false
            }
        })
    }

    /// Current address.
    #[inline]
    pub fn address(&self) -> u8 {
        self.address.load(Ordering::Acquire)
    }

    /// Whether the current address identifies a node (not NULL, not broadcast).
    #[inline]
    pub fn address_valid(&self) -> bool {
        is_valid_address(self.address())
    }

    /// Publish a new address.
    ///
    /// Intended for the network manager's address claim processing.
    pub fn set_address(&self, address: u8) {
        let previous = self.address.swap(address, Ordering::AcqRel);
        if previous != address {
            trace!(
                "[CF] {} moved from {:#04x} to {:#04x}",
                self.name,
                previous,
                address
            );
        }
    }

    /// Index of the CAN channel this control function lives on.
    #[inline]
    pub fn can_port(&self) -> u8 {
        self.can_port
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn control_function_type(&self) -> ControlFunctionType {
        self.control_function_type
    }

    /// `"Internal"`, `"External"`, `"Partnered"`, or `"Unknown"`.
    #[inline]
    pub fn type_string(&self) -> &'static str {
        type_label(self.control_function_type.code())
    }

    /// `true` from `create` until the first `destroy`.
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }
}

impl fmt::Display for ControlFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} control function {} at address {:#04x} on port {}",
            self.type_string(),
            self.name,
            self.address(),
            self.can_port
        )
    }
}

impl fmt::Debug for ControlFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlFunction")
            .field("type", &self.control_function_type)
            .field("name", &self.name)
            .field("address", &self.address())
            .field("can_port", &self.can_port)
            .field("registered", &self.is_registered())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::can::{BROADCAST_CAN_ADDRESS, NULL_CAN_ADDRESS};
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::sync::atomic::AtomicUsize;
    use spin::Mutex;

    /// Holds strong handles the way a real network manager does.
    struct RecordingNetwork {
        live: Mutex<Vec<Arc<ControlFunction>>>,
        created: AtomicUsize,
        destroyed: AtomicUsize,
    }

    impl RecordingNetwork {
        fn new() -> Self {
            Self {
                live: Mutex::new(Vec::new()),
                created: AtomicUsize::new(0),
                destroyed: AtomicUsize::new(0),
            }
        }

        fn live_count(&self) -> usize {
            self.live.lock().len()
        }
    }

    impl NetworkManager for RecordingNetwork {
        fn on_control_function_created(
            &self,
            control_function: Arc<ControlFunction>,
            _badge: Badge<ControlFunction>,
        ) {
            self.created.fetch_add(1, Ordering::SeqCst);
            self.live.lock().push(control_function);
        }

        fn on_control_function_destroyed(
            &self,
            control_function: &Arc<ControlFunction>,
            _badge: Badge<ControlFunction>,
        ) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
            self.live
                .lock()
                .retain(|live| !Arc::ptr_eq(live, control_function));
        }
    }

    fn network() -> (Arc<RecordingNetwork>, Arc<dyn NetworkManager>) {
        let recording = Arc::new(RecordingNetwork::new());
        let network: Arc<dyn NetworkManager> = recording.clone();
        (recording, network)
    }

    const NAME: Name = Name::new(0x1234_5678_9ABC_DEF0);

    #[test]
    fn test_create_registers_once() {
        let (recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, 0x80, 0);

        assert_eq!(cf.name(), NAME);
        assert_eq!(cf.address(), 0x80);
        assert_eq!(cf.can_port(), 0);
        assert_eq!(cf.control_function_type(), ControlFunctionType::External);
        assert!(cf.is_registered());
        assert_eq!(recording.created.load(Ordering::SeqCst), 1);
        assert_eq!(recording.live_count(), 1);
        // Caller and network manager.
        assert_eq!(Arc::strong_count(&cf), 2);
    }

    #[test]
    fn test_destroy_sole_holder() {
        let (recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, 0x80, 0);

        assert!(cf.destroy(0));
        assert!(!cf.is_registered());
        assert_eq!(recording.live_count(), 0);
        assert_eq!(recording.destroyed.load(Ordering::SeqCst), 1);
        assert_eq!(Arc::strong_count(&cf), 1);
    }

    #[test]
    fn test_destroy_compares_holder_count() {
        let (recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, 0x80, 1);
        let _session = Arc::clone(&cf);
        let _diagnostics = Arc::clone(&cf);

        // Three holders: caller plus two others.
        assert!(!cf.destroy(3));
        assert!(cf.destroy(2));
        assert!(!cf.destroy(1));
        assert_eq!(recording.destroyed.load(Ordering::SeqCst), 3);
        assert_eq!(recording.live_count(), 0);
    }

    #[test]
    fn test_holders_keep_working_after_destroy() {
        let (_recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, 0x80, 0);
        let other = Arc::clone(&cf);

        assert!(cf.destroy(1));
        drop(cf);
        assert_eq!(other.address(), 0x80);
        assert!(!other.is_registered());
    }

    #[test]
    fn test_freed_after_last_holder() {
        let (_recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, 0x80, 0);
        let weak = Arc::downgrade(&cf);

        assert!(cf.destroy(0));
        drop(cf);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_type_strings() {
        let (_recording, network) = network();
        let cases = [
            (ControlFunctionType::Internal, "Internal"),
            (ControlFunctionType::External, "External"),
            (ControlFunctionType::Partnered, "Partnered"),
        ];
        for (kind, label) in cases {
            let cf = ControlFunction::create_with_type(&network, NAME, 0x10, 0, kind);
            assert_eq!(cf.control_function_type(), kind);
            assert_eq!(cf.type_string(), label);
            assert!(cf.destroy(0));
        }
    }

    #[test]
    fn test_address_validity() {
        let (_recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, NULL_CAN_ADDRESS, 0);
        assert!(!cf.address_valid());

        cf.set_address(0x81);
        assert_eq!(cf.address(), 0x81);
        assert!(cf.address_valid());

        cf.set_address(BROADCAST_CAN_ADDRESS);
        assert!(!cf.address_valid());
        assert!(cf.destroy(0));
    }

    #[test]
    fn test_display() {
        let (_recording, network) = network();
        let cf = ControlFunction::create_with_type(
            &network,
            Name::new(0xA00C_8100_0000_0001),
            0x80,
            2,
            ControlFunctionType::Partnered,
        );
        assert_eq!(
            cf.to_string(),
            "Partnered control function 0xa00c810000000001 at address 0x80 on port 2"
        );
        assert!(cf.destroy(0));
    }

    /// Hands the new control function to another component that tears it
    /// down before `create` returns.
    struct EagerTeardownNetwork {
        inner: RecordingNetwork,
    }

    impl NetworkManager for EagerTeardownNetwork {
        fn on_control_function_created(
            &self,
            control_function: Arc<ControlFunction>,
            badge: Badge<ControlFunction>,
        ) {
            let other = Arc::clone(&control_function);
            self.inner.on_control_function_created(control_function, badge);
            std::thread::spawn(move || {
                other.destroy(1);
            })
            .join()
            .unwrap();
        }

        fn on_control_function_destroyed(
            &self,
            control_function: &Arc<ControlFunction>,
            badge: Badge<ControlFunction>,
        ) {
            self.inner.on_control_function_destroyed(control_function, badge);
        }
    }

    #[test]
    fn test_destroy_during_create_stays_deregistered() {
        let eager = Arc::new(EagerTeardownNetwork {
            inner: RecordingNetwork::new(),
        });
        let network: Arc<dyn NetworkManager> = eager.clone();
        let cf = ControlFunction::create(&network, NAME, 0x80, 0);

        assert_eq!(eager.inner.live_count(), 0);
        assert_eq!(eager.inner.destroyed.load(Ordering::SeqCst), 1);
        assert!(!cf.is_registered());
        assert!(cf.destroy(0));
        assert!(!cf.is_registered());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "CAN port 4 out of range")]
    fn test_create_rejects_port_out_of_range() {
        let (_recording, network) = network();
        let _cf = ControlFunction::create(&network, NAME, 0x80, crate::can::CAN_PORT_MAXIMUM);
    }

    #[test]
    fn test_last_port_is_accepted() {
        let (_recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, 0x80, crate::can::CAN_PORT_MAXIMUM - 1);
        assert_eq!(cf.can_port(), 3);
        assert!(cf.destroy(0));
    }

    #[test]
    #[cfg(feature = "disable-threads")]
    fn test_destroy_without_thread_support() {
        use crate::control_function::{NoopLifecycleLock, ProcessingLock};
        assert_eq!(
            core::any::type_name::<ProcessingLock>(),
            core::any::type_name::<NoopLifecycleLock>()
        );

        let (recording, network) = network();
        let cf = ControlFunction::create(&network, NAME, 0x80, 0);
        let other = Arc::clone(&cf);
        assert!(!cf.destroy(0));
        assert!(cf.destroy(1));
        drop(other);
        assert!(cf.destroy(0));
        assert_eq!(recording.destroyed.load(Ordering::SeqCst), 3);
        assert_eq!(recording.live_count(), 0);
    }

    #[test]
    #[cfg(not(feature = "disable-threads"))]
    fn test_destroy_uses_spin_lock_by_default() {
        use crate::control_function::{ProcessingLock, SpinLifecycleLock};
        assert_eq!(
            core::any::type_name::<ProcessingLock>(),
            core::any::type_name::<SpinLifecycleLock>()
        );
    }
}
