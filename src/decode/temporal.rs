//! Dates and timestamps.
//!
//! `Date32` keeps its day number, bounded by the 16-bit date range.
//! `Date64` and timestamps become whole seconds since epoch, truncated toward
//! zero and narrowed to 32 bits.

use crate::{
    arrow_array::{
        Array, ArrayRef,
        cast::AsArray,
        types::{
            ArrowPrimitiveType, Date32Type, Date64Type, TimestampMicrosecondType,
            TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
        },
    },
    arrow_buffer::ScalarBuffer,
    arrow_schema::{DataType, TimeUnit},
    column::NumericColumn,
    error::{ConvertError, Result},
    source::ChunkedArray,
    types::MAX_DATE_DAY_NUM,
};

const MILLIS_PER_SECOND: i64 = 1_000;

/// Ticks per second for a timestamp unit.
pub fn time_unit_divisor(unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    }
}

/// Append `Date32` day numbers.
///
/// Null slots become day `0` without a range check. On error the column is
/// truncated back to its length before the call.
///
/// # Errors
/// Returns `ConvertError::ValueOutOfRange` for a valid day number greater than
/// [`MAX_DATE_DAY_NUM`] (negative days compare as large unsigned values).
pub fn fill_date32(
    source: &ChunkedArray<'_>,
    out: &mut NumericColumn<u16>,
    column_name: &str,
) -> Result<()> {
    let data = out.data_mut();
    let len_before = data.len();
    data.reserve(source.len());
    let result = append_days(source, data, column_name);
    if result.is_err() {
        data.truncate(len_before);
    }
    result
}

fn append_days(source: &ChunkedArray<'_>, data: &mut Vec<u16>, column_name: &str) -> Result<()> {
    for chunk in source.chunks() {
        let array = chunk
            .as_primitive_opt::<Date32Type>()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        let nulls = array.nulls();
        for (i, &raw) in array.values().iter().enumerate() {
            if nulls.is_some_and(|n| n.is_null(i)) {
                data.push(0);
                continue;
            }
            let day = raw as u32;
            if day > MAX_DATE_DAY_NUM {
                return Err(ConvertError::ValueOutOfRange {
                    column: column_name.to_owned(),
                    value: day,
                    max: MAX_DATE_DAY_NUM,
                });
            }
            data.push(day as u16);
        }
    }
    Ok(())
}

/// Append `Date64` milliseconds as whole seconds.
pub fn fill_date64(source: &ChunkedArray<'_>, out: &mut NumericColumn<u32>) -> Result<()> {
    let data = out.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        let array = chunk
            .as_primitive_opt::<Date64Type>()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        append_seconds(data, array.values(), MILLIS_PER_SECOND);
    }
    Ok(())
}

/// Append timestamps as whole seconds, dividing by the tick rate of the
/// column's unit. The timezone is ignored.
pub fn fill_timestamp(source: &ChunkedArray<'_>, out: &mut NumericColumn<u32>) -> Result<()> {
    let data = out.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        let (unit, values) =
            timestamp_values(chunk).ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        append_seconds(data, values, time_unit_divisor(unit));
    }
    Ok(())
}

fn timestamp_values(chunk: &ArrayRef) -> Option<(TimeUnit, &ScalarBuffer<i64>)> {
    let DataType::Timestamp(unit, _) = chunk.data_type() else {
        return None;
    };
    let values = match unit {
        TimeUnit::Second => primitive_values::<TimestampSecondType>(chunk)?,
        TimeUnit::Millisecond => primitive_values::<TimestampMillisecondType>(chunk)?,
        TimeUnit::Microsecond => primitive_values::<TimestampMicrosecondType>(chunk)?,
        TimeUnit::Nanosecond => primitive_values::<TimestampNanosecondType>(chunk)?,
    };
    Some((*unit, values))
}

fn primitive_values<T>(chunk: &ArrayRef) -> Option<&ScalarBuffer<i64>>
where
    T: ArrowPrimitiveType<Native = i64>,
{
    chunk.as_primitive_opt::<T>().map(|array| array.values())
}

fn append_seconds(data: &mut Vec<u32>, ticks: &[i64], divisor: i64) {
    data.extend(ticks.iter().map(|&t| (t / divisor) as u32));
}
