//! Control function classification.

use bitflags::bitflags;
use core::fmt;

/// Who owns a control function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum ControlFunctionType {
    /// Originated by this stack; the stack speaks as it.
    Internal = 0,
    /// Seen on the bus, owned by another node.
    External = 1,
    /// External, but configured to be tracked specifically.
    Partnered = 2,
}

impl ControlFunctionType {
    /// Raw type code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable label.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        type_label(self.code())
    }
}

impl fmt::Display for ControlFunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for a raw type code. Codes outside the known set map to `"Unknown"`.
pub const fn type_label(code: u8) -> &'static str {
    match code {
        0 => "Internal",
        1 => "External",
        2 => "Partnered",
        _ => "Unknown",
    }
}

/// Returned when decoding a type code that names no classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidControlFunctionType(pub u8);

impl fmt::Display for InvalidControlFunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid control function type code: {}", self.0)
    }
}

impl TryFrom<u8> for ControlFunctionType {
    type Error = InvalidControlFunctionType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Internal),
            1 => Ok(Self::External),
            2 => Ok(Self::Partnered),
            other => Err(InvalidControlFunctionType(other)),
        }
    }
}

bitflags! {
    /// A set of classifications, used to filter control function queries.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct ControlFunctionTypes: u8 {
        const INTERNAL = 1 << 0;
        const EXTERNAL = 1 << 1;
        const PARTNERED = 1 << 2;
        /// Control functions owned by other nodes.
        const REMOTE = Self::EXTERNAL.bits() | Self::PARTNERED.bits();
    }
}

impl ControlFunctionTypes {
    /// Check whether `kind` is in the set.
    #[inline]
    pub fn matches(self, kind: ControlFunctionType) -> bool {
        self.contains(Self::from(kind))
    }
}

impl From<ControlFunctionType> for ControlFunctionTypes {
    fn from(kind: ControlFunctionType) -> Self {
        match kind {
            ControlFunctionType::Internal => Self::INTERNAL,
            ControlFunctionType::External => Self::EXTERNAL,
            ControlFunctionType::Partnered => Self::PARTNERED,
        }
    }
}
