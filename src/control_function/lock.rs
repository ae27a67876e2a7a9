//! Control Function Processing Lock
//!
//! Serializes the destroy sequence (notify the network manager, then sample
//! the holder count) across every control function in the process.
//!
//! # Design
//! - `LifecycleLock` is the single interface `destroy` is written against
//! - `SpinLifecycleLock` wraps a `spin::Mutex`, usable without `std`
//! - `NoopLifecycleLock` is selected by the `disable-threads` feature for
//!   targets without concurrent scheduling
//! - The lock is a `static`, built at compile time and never torn down

use spin::Mutex;

/// Mutual exclusion strategy for the lifecycle critical section.
pub trait LifecycleLock: Sync {
    /// Run `f` inside the critical section.
    fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// Real mutual exclusion backed by a spinlock.
#[derive(Debug)]
pub struct SpinLifecycleLock {
    inner: Mutex<()>,
}

impl SpinLifecycleLock {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(()),
        }
    }
}

impl Default for SpinLifecycleLock {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleLock for SpinLifecycleLock {
    #[inline]
    fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.inner.lock();
        f()
    }
}

/// Lock for single-threaded builds. Runs the closure inline.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLifecycleLock;

impl NoopLifecycleLock {
    pub const fn new() -> Self {
        Self
    }
}

impl LifecycleLock for NoopLifecycleLock {
    #[inline]
    fn with_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }
}

#[cfg(not(feature = "disable-threads"))]
pub type ProcessingLock = SpinLifecycleLock;

#[cfg(feature = "disable-threads")]
pub type ProcessingLock = NoopLifecycleLock;

/// Shared by all control functions. Must not be re-entered from a
/// network manager hook.
pub(super) static CONTROL_FUNCTION_PROCESSING_LOCK: ProcessingLock = ProcessingLock::new();
