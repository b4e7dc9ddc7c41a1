//! Fixed-width numbers and bit-packed booleans.

use crate::{
    arrow_array::{
        cast::AsArray,
        types::{ArrowPrimitiveType, Float16Type},
    },
    column::{BooleanColumn, NumericColumn},
    error::Result,
    source::ChunkedArray,
};

/// Bulk-copy the value buffer of every chunk.
///
/// The element type of the column is the Arrow native type, so widths always
/// match and no per-value transform happens. Values under nulls are copied
/// as they are.
pub fn fill<T: ArrowPrimitiveType>(
    source: &ChunkedArray<'_>,
    out: &mut NumericColumn<T::Native>,
) -> Result<()> {
    let data = out.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        let array = chunk
            .as_primitive_opt::<T>()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        data.extend_from_slice(array.values());
    }
    Ok(())
}

/// Widen half-precision floats into `f32`, one value at a time.
pub fn fill_half(source: &ChunkedArray<'_>, out: &mut NumericColumn<f32>) -> Result<()> {
    let data = out.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        let array = chunk
            .as_primitive_opt::<Float16Type>()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        data.extend(array.values().iter().map(|v| v.to_f32()));
    }
    Ok(())
}

/// Unpack one bit per row into one byte per row.
pub fn fill_boolean(source: &ChunkedArray<'_>, out: &mut BooleanColumn) -> Result<()> {
    let data = out.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        let array = chunk
            .as_boolean_opt()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        data.extend(array.values().iter().map(u8::from));
    }
    Ok(())
}
