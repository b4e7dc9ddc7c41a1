//! Decoders from Arrow chunks into internal columns.
//!
//! [`materialize`] is the recursion entry point: it unwraps nullable targets,
//! enforces null safety and dispatches on the Arrow type tag to one of the
//! per-type decoders below. Every decoder appends chunk by chunk after
//! reserving for the total row count.
//!
//! - Numbers: bulk copy of the value buffer ([`numeric`]).
//! - Booleans: bit-packed values unpacked to one byte per row.
//! - Strings/binary: two passes, null-terminated values ([`strings`]).
//! - Dates/timestamps: day-range check or tick division ([`temporal`]).
//! - Decimals: 128-bit copy with nulls decoded as zero ([`decimals`]).
//! - Lists: recursive decode of the values plus re-based offsets ([`lists`]).

use tracing::trace;

use crate::{
    arrow_array::types::{
        BinaryType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type,
        LargeBinaryType, LargeUtf8Type, UInt8Type, UInt16Type, UInt32Type, UInt64Type, Utf8Type,
    },
    column::Column,
    error::{ConvertError, Result},
    source::{ArrowTypeId, ChunkedArray},
};

pub mod decimals;
pub mod lists;
pub mod nulls;
pub mod numeric;
pub mod strings;
pub mod temporal;

pub use nulls::{extract_nulls, fill_null_map};
pub use temporal::time_unit_divisor;

/// Decode `source` into `target`, appending its rows.
///
/// `format_name` labels the input format in errors. `is_nested_element`
/// suppresses the null check: it is set for the nested column of a
/// nullable target and for the values of an array.
///
/// # Errors
/// - `ConvertError::NullInNonNullableColumn` if `source` has nulls and
///   `target` can hold neither nulls nor arrays.
/// - `ConvertError::UnsupportedType` if no decoder handles the Arrow type.
/// - `ConvertError::TargetMismatch` if `target` does not have the shape the
///   decoder produces.
/// - `ConvertError::ValueOutOfRange` for a day number beyond
///   [`MAX_DATE_DAY_NUM`](crate::types::MAX_DATE_DAY_NUM).
pub fn materialize(
    source: &ChunkedArray<'_>,
    target: &mut Column,
    column_name: &str,
    format_name: &str,
    is_nested_element: bool,
) -> Result<()> {
    if let Column::Nullable(nullable) = target {
        materialize(source, nullable.nested_mut(), column_name, format_name, true)?;
        fill_null_map(source, nullable.null_map_mut());
        return Ok(());
    }

    if !is_nested_element && !target.is_array() && source.null_count() > 0 {
        return Err(ConvertError::null_in_non_nullable(column_name));
    }

    let Some(type_id) = ArrowTypeId::of(source.data_type()) else {
        return Err(ConvertError::unsupported_type(
            source.data_type(),
            column_name,
            format_name,
        ));
    };
    trace!(
        column = column_name,
        ?type_id,
        chunks = source.num_chunks(),
        rows = source.len(),
        "decoding column"
    );

    match (type_id, target) {
        (ArrowTypeId::UInt8, Column::UInt8(out)) => numeric::fill::<UInt8Type>(source, out),
        (ArrowTypeId::Int8, Column::Int8(out)) => numeric::fill::<Int8Type>(source, out),
        (ArrowTypeId::UInt16, Column::UInt16(out)) => numeric::fill::<UInt16Type>(source, out),
        (ArrowTypeId::Int16, Column::Int16(out)) => numeric::fill::<Int16Type>(source, out),
        (ArrowTypeId::UInt32, Column::UInt32(out)) => numeric::fill::<UInt32Type>(source, out),
        (ArrowTypeId::Int32, Column::Int32(out)) => numeric::fill::<Int32Type>(source, out),
        (ArrowTypeId::UInt64, Column::UInt64(out)) => numeric::fill::<UInt64Type>(source, out),
        (ArrowTypeId::Int64, Column::Int64(out)) => numeric::fill::<Int64Type>(source, out),
        (ArrowTypeId::Float16, Column::Float32(out)) => numeric::fill_half(source, out),
        (ArrowTypeId::Float32, Column::Float32(out)) => numeric::fill::<Float32Type>(source, out),
        (ArrowTypeId::Float64, Column::Float64(out)) => numeric::fill::<Float64Type>(source, out),
        (ArrowTypeId::Boolean, Column::UInt8(out)) => numeric::fill_boolean(source, out),
        (ArrowTypeId::Date32, Column::Date(out)) => {
            temporal::fill_date32(source, out, column_name)
        }
        (ArrowTypeId::Date64, Column::DateTime(out)) => temporal::fill_date64(source, out),
        (ArrowTypeId::Timestamp, Column::DateTime(out)) => temporal::fill_timestamp(source, out),
        (ArrowTypeId::Utf8, Column::String(out)) => strings::fill::<Utf8Type>(source, out),
        (ArrowTypeId::LargeUtf8, Column::String(out)) => {
            strings::fill::<LargeUtf8Type>(source, out)
        }
        (ArrowTypeId::Binary, Column::String(out)) => strings::fill::<BinaryType>(source, out),
        (ArrowTypeId::LargeBinary, Column::String(out)) => {
            strings::fill::<LargeBinaryType>(source, out)
        }
        (ArrowTypeId::Decimal128, Column::Decimal128(out)) => decimals::fill(source, out),
        (ArrowTypeId::List, Column::Array(out)) => {
            lists::fill::<i32>(source, out, column_name, format_name)
        }
        (ArrowTypeId::LargeList, Column::Array(out)) => {
            lists::fill::<i64>(source, out, column_name, format_name)
        }
        (_, other) => Err(ConvertError::target_mismatch(
            column_name,
            source.data_type(),
            other.data_type(),
        )),
    }
}
