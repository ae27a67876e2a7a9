//! ISO 11783 NAME
//!
//! The 64-bit NAME identifies a device on the network and drives address
//! claim arbitration (lower NAME wins). The lifecycle core only stores and
//! compares it; the field accessors exist for collaborators.
//!
//! # Layout
//! ```text
//! 63  62..60  59..56  55..49  48  47..40  39..35  34..32  31..21  20..0
//! AAC  IG     DCI     DC      R   FUNC    FI      ECU     MFR     IDENTITY
//! ```

use core::fmt;

/// A field of the NAME, with its bit position and width.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NameField {
    IdentityNumber,
    ManufacturerCode,
    EcuInstance,
    FunctionInstance,
    FunctionCode,
    Reserved,
    DeviceClass,
    DeviceClassInstance,
    IndustryGroup,
    ArbitraryAddressCapable,
}

impl NameField {
    /// Bit offset of the field's least significant bit.
    #[inline]
    pub const fn shift(self) -> u32 {
        match self {
            Self::IdentityNumber => 0,
            Self::ManufacturerCode => 21,
            Self::EcuInstance => 32,
            Self::FunctionInstance => 35,
            Self::FunctionCode => 40,
            Self::Reserved => 48,
            Self::DeviceClass => 49,
            Self::DeviceClassInstance => 56,
            Self::IndustryGroup => 60,
            Self::ArbitraryAddressCapable => 63,
        }
    }

    /// Width of the field in bits.
    #[inline]
    pub const fn width(self) -> u32 {
        match self {
            Self::IdentityNumber => 21,
            Self::ManufacturerCode => 11,
            Self::EcuInstance => 3,
            Self::FunctionInstance => 5,
            Self::FunctionCode => 8,
            Self::Reserved => 1,
            Self::DeviceClass => 7,
            Self::DeviceClassInstance => 4,
            Self::IndustryGroup => 3,
            Self::ArbitraryAddressCapable => 1,
        }
    }

    /// Largest value the field can hold.
    #[inline]
    pub const fn max_value(self) -> u32 {
        ((1u64 << self.width()) - 1) as u32
    }

    #[inline]
    const fn mask(self) -> u64 {
        (self.max_value() as u64) << self.shift()
    }
}

/// Returned when a value does not fit the width of a NAME field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameFieldError {
    pub field: NameField,
    pub value: u32,
}

impl fmt::Display for NameFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value {} does not fit NAME field {:?} (max {})",
            self.value,
            self.field,
            self.field.max_value()
        )
    }
}

/// A 64-bit ISO 11783 NAME.
///
/// Immutable value type; the `with_*` methods return a modified copy.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Name(u64);

impl Name {
    /// Wrap a raw NAME value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw 64-bit value.
    #[inline]
    pub const fn full_name(self) -> u64 {
        self.0
    }

    /// Read a single field.
    #[inline]
    pub const fn field(self, field: NameField) -> u32 {
        ((self.0 & field.mask()) >> field.shift()) as u32
    }

    /// Return a copy with `field` replaced by `value`.
    pub const fn with_field(self, field: NameField, value: u32) -> Result<Self, NameFieldError> {
        if value > field.max_value() {
            return Err(NameFieldError { field, value });
        }
        let cleared = self.0 & !field.mask();
        Ok(Self(cleared | ((value as u64) << field.shift())))
    }

    #[inline]
    pub const fn identity_number(self) -> u32 {
        self.field(NameField::IdentityNumber)
    }

    #[inline]
    pub const fn manufacturer_code(self) -> u16 {
        self.field(NameField::ManufacturerCode) as u16
    }

    #[inline]
    pub const fn ecu_instance(self) -> u8 {
        self.field(NameField::EcuInstance) as u8
    }

    #[inline]
    pub const fn function_instance(self) -> u8 {
        self.field(NameField::FunctionInstance) as u8
    }

    #[inline]
    pub const fn function_code(self) -> u8 {
        self.field(NameField::FunctionCode) as u8
    }

    #[inline]
    pub const fn reserved_field(self) -> bool {
        self.field(NameField::Reserved) == 1
    }

    #[inline]
    pub const fn device_class(self) -> u8 {
        self.field(NameField::DeviceClass) as u8
    }

    #[inline]
    pub const fn device_class_instance(self) -> u8 {
        self.field(NameField::DeviceClassInstance) as u8
    }

    #[inline]
    pub const fn industry_group(self) -> u8 {
        self.field(NameField::IndustryGroup) as u8
    }

    /// Whether the device may pick another address after losing arbitration.
    #[inline]
    pub const fn arbitrary_address_capable(self) -> bool {
        self.field(NameField::ArbitraryAddressCapable) == 1
    }

    pub const fn with_identity_number(self, value: u32) -> Result<Self, NameFieldError> {
        self.with_field(NameField::IdentityNumber, value)
    }

    pub const fn with_manufacturer_code(self, value: u16) -> Result<Self, NameFieldError> {
        self.with_field(NameField::ManufacturerCode, value as u32)
    }

    pub const fn with_ecu_instance(self, value: u8) -> Result<Self, NameFieldError> {
        self.with_field(NameField::EcuInstance, value as u32)
    }

    pub const fn with_function_instance(self, value: u8) -> Result<Self, NameFieldError> {
        self.with_field(NameField::FunctionInstance, value as u32)
    }

    pub const fn with_function_code(self, value: u8) -> Result<Self, NameFieldError> {
        self.with_field(NameField::FunctionCode, value as u32)
    }

    pub const fn with_device_class(self, value: u8) -> Result<Self, NameFieldError> {
        self.with_field(NameField::DeviceClass, value as u32)
    }

    pub const fn with_device_class_instance(self, value: u8) -> Result<Self, NameFieldError> {
        self.with_field(NameField::DeviceClassInstance, value as u32)
    }

    pub const fn with_industry_group(self, value: u8) -> Result<Self, NameFieldError> {
        self.with_field(NameField::IndustryGroup, value as u32)
    }

    /// Single-bit fields cannot overflow, so these two are infallible.
    pub const fn with_reserved_field(self, value: bool) -> Self {
        let mask = NameField::Reserved.mask();
        Self((self.0 & !mask) | ((value as u64) << NameField::Reserved.shift()))
    }

    pub const fn with_arbitrary_address_capable(self, value: bool) -> Self {
        let mask = NameField::ArbitraryAddressCapable.mask();
        Self((self.0 & !mask) | ((value as u64) << NameField::ArbitraryAddressCapable.shift()))
    }
}

impl From<u64> for Name {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Name> for u64 {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:#018x})", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
