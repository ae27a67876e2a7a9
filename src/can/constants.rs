//! ISO 11783 network constants shared by the stack.

/// Address used by a control function that has not claimed an address.
pub const NULL_CAN_ADDRESS: u8 = 0xFE;

/// Global destination address. Never held by a node.
pub const BROADCAST_CAN_ADDRESS: u8 = 0xFF;

/// Number of CAN channels the stack can be configured with.
pub const CAN_PORT_MAXIMUM: u8 = 4;

/// Check whether `address` can identify a single node on the bus.
#[inline]
pub const fn is_valid_address(address: u8) -> bool {
    address != NULL_CAN_ADDRESS && address != BROADCAST_CAN_ADDRESS
}
