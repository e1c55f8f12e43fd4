//! Type tag enumeration

use crate::constants::{TAG_BOOL, TAG_FLOAT, TAG_INT, TAG_LIST, TAG_MAP, TAG_NULL, TAG_STRING};
use crate::error::SbvjError;

/// Type tag codes preceding every tagged value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// Null / unset, no payload
    Null = TAG_NULL,
    /// Big-endian IEEE-754 double
    Float = TAG_FLOAT,
    /// Single byte boolean
    Bool = TAG_BOOL,
    /// Zig-zag VLQ integer
    Int = TAG_INT,
    /// Length-prefixed string
    String = TAG_STRING,
    /// Count-prefixed list of tagged values
    List = TAG_LIST,
    /// Count-prefixed map of string keys to tagged values
    Map = TAG_MAP,
}

impl TypeTag {
    /// Convert a decoded tag number
    pub fn from_u64(val: u64) -> Result<Self, SbvjError> {
        match val {
            1 => Ok(TypeTag::Null),
            2 => Ok(TypeTag::Float),
            3 => Ok(TypeTag::Bool),
            4 => Ok(TypeTag::Int),
            5 => Ok(TypeTag::String),
            6 => Ok(TypeTag::List),
            7 => Ok(TypeTag::Map),
            _ => Err(SbvjError::UnsupportedType(format!("unknown type tag {val}"))),
        }
    }

    /// Human readable name of the variant
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::String => "string",
            TypeTag::List => "list",
            TypeTag::Map => "map",
        }
    }
}
