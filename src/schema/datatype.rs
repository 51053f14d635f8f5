use std::fmt;

use serde::{Deserialize, Serialize};

/// Value datatype of an attribute column.
///
/// Callers hand the write core untyped byte buffers; the datatype declared
/// in the schema is resolved once per attribute when buffers are set, and
/// all processing after that point is driven by the variant's fixed value
/// size. Coordinates are not covered here: dimensions are always `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 8-bit integer
    UInt8,
    /// Unsigned 16-bit integer
    UInt16,
    /// Unsigned 32-bit integer
    UInt32,
    /// Unsigned 64-bit integer
    UInt64,
    /// IEEE 754 single-precision float
    Float32,
    /// IEEE 754 double-precision float
    Float64,
    /// Single byte character, the usual element type of var-length text
    Char,
}

impl Datatype {
    /// Size in bytes of one value of this datatype
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            Datatype::Int8 | Datatype::UInt8 | Datatype::Char => 1,
            Datatype::Int16 | Datatype::UInt16 => 2,
            Datatype::Int32 | Datatype::UInt32 | Datatype::Float32 => 4,
            Datatype::Int64 | Datatype::UInt64 | Datatype::Float64 => 8,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Datatype::Int8 => "int8",
            Datatype::Int16 => "int16",
            Datatype::Int32 => "int32",
            Datatype::Int64 => "int64",
            Datatype::UInt8 => "uint8",
            Datatype::UInt16 => "uint16",
            Datatype::UInt32 => "uint32",
            Datatype::UInt64 => "uint64",
            Datatype::Float32 => "float32",
            Datatype::Float64 => "float64",
            Datatype::Char => "char",
        };
        write!(f, "{}", name)
    }
}
