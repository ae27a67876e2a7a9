//! Network manager contract.

use alloc::sync::Arc;

use crate::control_function::{Badge, ControlFunction};

/// The authority that tracks which control functions exist on each CAN port.
///
/// Both hooks are public but need a `Badge<ControlFunction>`, which only the
/// control function lifecycle code can produce. In practice they are called
/// exactly once per `ControlFunction::create` and once per
/// `ControlFunction::destroy`.
///
/// # Contract
/// - Hooks must not fail in a way the caller can observe
/// - `on_control_function_destroyed` runs inside the process-wide processing
///   lock and must not call `ControlFunction::destroy`
/// - `on_control_function_destroyed` must tolerate a control function it no
///   longer (or never) tracked
pub trait NetworkManager: Send + Sync {
    /// Start tracking `control_function`.
    fn on_control_function_created(
        &self,
        control_function: Arc<ControlFunction>,
        badge: Badge<ControlFunction>,
    );

    /// Stop tracking `control_function`. Idempotent.
    fn on_control_function_destroyed(
        &self,
        control_function: &Arc<ControlFunction>,
        badge: Badge<ControlFunction>,
    );
}
