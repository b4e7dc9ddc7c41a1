//! Internal (engine-side) data types.
//!
//! Types are a closed enum, so every recursion over nullable/array wrappers
//! is checked for exhaustiveness by the compiler. Each type has a canonical
//! name ("UInt8", "Nullable(String)", "Decimal(38, 4)", ...) which
//! [`Display`](std::fmt::Display) prints and [`FromStr`] parses back.

use std::{fmt, str::FromStr};

use crate::{
    column::{
        ArrayColumn, Column, DecimalColumn, NullableColumn, NumericColumn, StringColumn,
    },
    error::{ConvertError, Result},
};

/// Largest day number a `Date` column can hold (days since 1970-01-01).
pub const MAX_DATE_DAY_NUM: u32 = u16::MAX as u32;

/// Precision used by `Decimal128(S)` names.
const DECIMAL128_MAX_PRECISION: u8 = 38;

/// An internal column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum InternalType {
    /// Unsigned 8-bit integer; also the storage of booleans.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Days since epoch, stored as `u16`.
    Date,
    /// Seconds since epoch, stored as `u32`.
    DateTime,
    /// Null-terminated byte strings.
    String,
    /// Fixed-point decimal stored in 128 bits.
    Decimal128 {
        /// Total number of digits.
        precision: u8,
        /// Digits after the decimal point.
        scale: i8,
    },
    /// A nullable wrapper around a non-nullable type.
    Nullable(Box<InternalType>),
    /// Variable-length arrays of the nested type.
    Array(Box<InternalType>),
    /// Dictionary-encoded presentation of the nested type.
    LowCardinality(Box<InternalType>),
}

impl InternalType {
    /// Wrap `inner` as `Nullable(inner)`.
    #[must_use]
    pub fn nullable(inner: InternalType) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Wrap `inner` as `Array(inner)`.
    #[must_use]
    pub fn array(inner: InternalType) -> Self {
        Self::Array(Box::new(inner))
    }

    /// Wrap `inner` as `LowCardinality(inner)`.
    #[must_use]
    pub fn low_cardinality(inner: InternalType) -> Self {
        Self::LowCardinality(Box::new(inner))
    }

    /// Whether values of this type may be null.
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Nullable(_) => true,
            Self::LowCardinality(inner) => inner.is_nullable(),
            _ => false,
        }
    }

    /// Whether this is an `Array` type.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Strip every `LowCardinality` wrapper, at any depth.
    #[must_use]
    pub fn without_low_cardinality(&self) -> Self {
        match self {
            Self::LowCardinality(inner) => inner.without_low_cardinality(),
            Self::Nullable(inner) => Self::nullable(inner.without_low_cardinality()),
            Self::Array(inner) => Self::array(inner.without_low_cardinality()),
            other => other.clone(),
        }
    }

    /// Create an empty column of this type.
    pub fn create_column(&self) -> Column {
        match self {
            Self::UInt8 => Column::UInt8(NumericColumn::new()),
            Self::UInt16 => Column::UInt16(NumericColumn::new()),
            Self::UInt32 => Column::UInt32(NumericColumn::new()),
            Self::UInt64 => Column::UInt64(NumericColumn::new()),
            Self::Int8 => Column::Int8(NumericColumn::new()),
            Self::Int16 => Column::Int16(NumericColumn::new()),
            Self::Int32 => Column::Int32(NumericColumn::new()),
            Self::Int64 => Column::Int64(NumericColumn::new()),
            Self::Float32 => Column::Float32(NumericColumn::new()),
            Self::Float64 => Column::Float64(NumericColumn::new()),
            Self::Date => Column::Date(NumericColumn::new()),
            Self::DateTime => Column::DateTime(NumericColumn::new()),
            Self::String => Column::String(StringColumn::new()),
            Self::Decimal128 { precision, scale } => {
                Column::Decimal128(DecimalColumn::new(*precision, *scale))
            }
            Self::Nullable(inner) => Column::Nullable(NullableColumn::new(inner.create_column())),
            Self::Array(inner) => Column::Array(ArrayColumn::new(inner.create_column())),
            Self::LowCardinality(inner) => Column::LowCardinality(Box::new(inner.create_column())),
        }
    }
}

impl fmt::Display for InternalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UInt8 => f.write_str("UInt8"),
            Self::UInt16 => f.write_str("UInt16"),
            Self::UInt32 => f.write_str("UInt32"),
            Self::UInt64 => f.write_str("UInt64"),
            Self::Int8 => f.write_str("Int8"),
            Self::Int16 => f.write_str("Int16"),
            Self::Int32 => f.write_str("Int32"),
            Self::Int64 => f.write_str("Int64"),
            Self::Float32 => f.write_str("Float32"),
            Self::Float64 => f.write_str("Float64"),
            Self::Date => f.write_str("Date"),
            Self::DateTime => f.write_str("DateTime"),
            Self::String => f.write_str("String"),
            Self::Decimal128 { precision, scale } => write!(f, "Decimal({precision}, {scale})"),
            Self::Nullable(inner) => write!(f, "Nullable({inner})"),
            Self::Array(inner) => write!(f, "Array({inner})"),
            Self::LowCardinality(inner) => write!(f, "LowCardinality({inner})"),
        }
    }
}

impl FromStr for InternalType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        parse_type(s.trim()).map_err(|message| ConvertError::unknown_type_name(s, message))
    }
}

impl TryFrom<String> for InternalType {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<InternalType> for String {
    fn from(value: InternalType) -> Self {
        value.to_string()
    }
}

fn parse_type(s: &str) -> Result<InternalType, String> {
    let (head, args) = match s.find('(') {
        Some(open) => {
            let Some(args) = s[open + 1..].strip_suffix(')') else {
                return Err("unbalanced parentheses".to_string());
            };
            (s[..open].trim_end(), Some(args.trim()))
        }
        None => (s, None),
    };

    let ty = match (head, args) {
        ("UInt8", None) => InternalType::UInt8,
        ("UInt16", None) => InternalType::UInt16,
        ("UInt32", None) => InternalType::UInt32,
        ("UInt64", None) => InternalType::UInt64,
        ("Int8", None) => InternalType::Int8,
        ("Int16", None) => InternalType::Int16,
        ("Int32", None) => InternalType::Int32,
        ("Int64", None) => InternalType::Int64,
        ("Float32", None) => InternalType::Float32,
        ("Float64", None) => InternalType::Float64,
        ("Date", None) => InternalType::Date,
        ("DateTime", None) => InternalType::DateTime,
        ("String", None) => InternalType::String,
        ("Nullable", Some(inner)) => InternalType::nullable(parse_type(inner)?),
        ("Array", Some(inner)) => InternalType::array(parse_type(inner)?),
        ("LowCardinality", Some(inner)) => InternalType::low_cardinality(parse_type(inner)?),
        ("Decimal", Some(params)) => {
            let Some((precision, scale)) = params.split_once(',') else {
                return Err("Decimal expects (precision, scale)".to_string());
            };
            InternalType::Decimal128 {
                precision: parse_param(precision)?,
                scale: parse_param(scale)?,
            }
        }
        ("Decimal128", Some(scale)) => InternalType::Decimal128 {
            precision: DECIMAL128_MAX_PRECISION,
            scale: parse_param(scale)?,
        },
        (_, None) => return Err("no such type".to_string()),
        (_, Some(_)) => return Err(format!("type {head} takes no such arguments")),
    };
    Ok(ty)
}

fn parse_param<T: FromStr>(s: &str) -> Result<T, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("invalid type parameter \"{}\"", s.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in [
            "UInt8",
            "Float64",
            "DateTime",
            "Decimal(38, 4)",
            "Nullable(String)",
            "Array(Nullable(Int32))",
            "LowCardinality(Nullable(String))",
        ] {
            let ty: InternalType = name.parse().unwrap();
            assert_eq!(ty.to_string(), name);
        }
    }

    #[test]
    fn decimal128_shorthand_uses_max_precision() {
        let ty: InternalType = "Decimal128(2)".parse().unwrap();
        assert_eq!(
            ty,
            InternalType::Decimal128 {
                precision: 38,
                scale: 2
            }
        );
    }

    #[test]
    fn rejects_unknown_and_malformed_names() {
        assert!("Int128".parse::<InternalType>().is_err());
        assert!("Nullable(Int32".parse::<InternalType>().is_err());
        assert!("String(3)".parse::<InternalType>().is_err());
        assert!("Decimal(x, 2)".parse::<InternalType>().is_err());
    }

    #[test]
    fn strips_low_cardinality_recursively() {
        let ty: InternalType = "Array(LowCardinality(Nullable(String)))".parse().unwrap();
        assert_eq!(
            ty.without_low_cardinality(),
            InternalType::array(InternalType::nullable(InternalType::String))
        );
    }
}
