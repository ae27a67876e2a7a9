//! Lifecycle Badge
//!
//! A zero-size capability that proves a call originates from the control
//! function lifecycle code.
//!
//! # Security Properties
//! - Constructor is private to the `control_function` module tree
//! - Not `Clone`, `Copy` or `Default`: a badge handed to a hook is consumed
//! - Carries no data; the check happens at compile time

use core::fmt;
use core::marker::PhantomData;

/// Unforgeable access token issued by `T`'s lifecycle code.
///
/// The [`NetworkManager`](crate::network::NetworkManager) hooks take a
/// `Badge<ControlFunction>` by value. Code outside this module has no way to
/// build one, so only `ControlFunction::create` and `ControlFunction::destroy`
/// can drive those hooks.
pub struct Badge<T> {
    _issuer: PhantomData<fn() -> T>,
}

impl<T> Badge<T> {
    #[inline]
    pub(super) const fn new() -> Self {
        Self {
            _issuer: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Badge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Badge<{}>", core::any::type_name::<T>())
    }
}
