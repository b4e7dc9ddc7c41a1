//! Resolve the internal type a column is decoded into.
//!
//! The result depends on both sides: the Arrow type decides the leaf
//! representation, while the desired (header) type decides the structure.
//! Nullability always comes from the desired type, never from the source.

use crate::{
    arrow_schema::DataType,
    error::{ConvertError, Result},
    source::ArrowTypeId,
    types::InternalType,
};

/// Internal type name for each leaf Arrow type.
///
/// Numeric widths are not always preserved: `Float16` decodes into
/// `Float32`, and booleans into `UInt8`. Decimals and lists are resolved
/// structurally and have no entry.
static ARROW_TYPE_TO_INTERNAL: &[(ArrowTypeId, &str)] = &[
    (ArrowTypeId::UInt8, "UInt8"),
    (ArrowTypeId::Int8, "Int8"),
    (ArrowTypeId::UInt16, "UInt16"),
    (ArrowTypeId::Int16, "Int16"),
    (ArrowTypeId::UInt32, "UInt32"),
    (ArrowTypeId::Int32, "Int32"),
    (ArrowTypeId::UInt64, "UInt64"),
    (ArrowTypeId::Int64, "Int64"),
    (ArrowTypeId::Float16, "Float32"),
    (ArrowTypeId::Float32, "Float32"),
    (ArrowTypeId::Float64, "Float64"),
    (ArrowTypeId::Boolean, "UInt8"),
    (ArrowTypeId::Date32, "Date"),
    (ArrowTypeId::Date64, "DateTime"),
    (ArrowTypeId::Timestamp, "DateTime"),
    (ArrowTypeId::Utf8, "String"),
    (ArrowTypeId::LargeUtf8, "String"),
    (ArrowTypeId::Binary, "String"),
    (ArrowTypeId::LargeBinary, "String"),
];

/// Internal type name registered for a leaf Arrow type.
pub fn internal_type_name(type_id: ArrowTypeId) -> Option<&'static str> {
    ARROW_TYPE_TO_INTERNAL
        .iter()
        .find(|(id, _)| *id == type_id)
        .map(|(_, name)| *name)
}

/// Resolve the internal type that `arrow_type` is decoded into when the
/// header asks for `desired`.
///
/// - `Nullable(T)` desired: resolve against `T` and wrap the result.
/// - `Decimal128(p, s)` source: `Decimal(p, s)`; the desired decimal
///   parameters are left to the caster.
/// - `List`/`LargeList` source: `desired` must be an `Array`; the item type is
///   resolved recursively.
/// - Anything else goes through the leaf type table.
///
/// # Errors
/// - `ConvertError::StructuralMismatch` for a list whose desired type is not an array.
/// - `ConvertError::UnsupportedType` for an Arrow type with no internal mapping.
pub fn resolve_internal_type(
    arrow_type: &DataType,
    desired: &InternalType,
    column_name: &str,
    format_name: &str,
) -> Result<InternalType> {
    if let InternalType::Nullable(nested) = desired {
        let inner = resolve_internal_type(arrow_type, nested, column_name, format_name)?;
        return Ok(InternalType::nullable(inner));
    }

    match arrow_type {
        DataType::Decimal128(precision, scale) => {
            return Ok(InternalType::Decimal128 {
                precision: *precision,
                scale: *scale,
            });
        }
        DataType::List(item) | DataType::LargeList(item) => {
            let InternalType::Array(nested) = desired else {
                return Err(ConvertError::structural_mismatch(
                    arrow_type,
                    desired,
                    column_name,
                ));
            };
            let inner =
                resolve_internal_type(item.data_type(), nested, column_name, format_name)?;
            return Ok(InternalType::array(inner));
        }
        _ => {}
    }

    let name = ArrowTypeId::of(arrow_type)
        .and_then(internal_type_name)
        .ok_or_else(|| ConvertError::unsupported_type(arrow_type, column_name, format_name))?;
    name.parse()
}
