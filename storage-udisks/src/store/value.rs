// SPDX-License-Identifier: GPL-3.0-only

/// A property value as decoded off the bus.
///
/// Only the shapes UDisks2 uses on the interfaces we read are modelled;
/// anything else is kept as `Unsupported` with its signature.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Byte(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    ObjectPath(String),
    /// `ay`
    Bytes(Vec<u8>),
    /// `aay`
    ByteArrays(Vec<Vec<u8>>),
    /// `as`
    Strings(Vec<String>),
    Unsupported(String),
}

/// Types a `PropertyValue` can be read back as. Matching is exact: a `u32`
/// property is not a `u64`.
pub trait FromPropertyValue: Sized {
    const EXPECTED: &'static str;

    fn from_property_value(value: PropertyValue) -> Option<Self>;
}

macro_rules! from_property_value {
    ($ty:ty, $variant:ident, $expected:literal) => {
        impl FromPropertyValue for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_property_value(value: PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

from_property_value!(bool, Bool, "a boolean");
from_property_value!(u8, Byte, "a byte");
from_property_value!(i16, I16, "an int16");
from_property_value!(u16, U16, "a uint16");
from_property_value!(i32, I32, "an int32");
from_property_value!(u32, U32, "a uint32");
from_property_value!(i64, I64, "an int64");
from_property_value!(u64, U64, "a uint64");
from_property_value!(f64, F64, "a double");
from_property_value!(String, Str, "a string");
from_property_value!(Vec<u8>, Bytes, "a byte array");
from_property_value!(Vec<Vec<u8>>, ByteArrays, "an array of byte arrays");
from_property_value!(Vec<String>, Strings, "a string array");
