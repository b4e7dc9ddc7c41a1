//! 128-bit decimals.

use crate::{
    arrow_array::{Array, cast::AsArray, types::Decimal128Type},
    column::{Decimal128, DecimalColumn},
    error::Result,
    source::ChunkedArray,
};

/// Append one 128-bit value per row; null slots become `0`.
///
/// Precision and scale are taken from the target column, which the resolver
/// built from the Arrow type.
pub fn fill(source: &ChunkedArray<'_>, out: &mut DecimalColumn) -> Result<()> {
    let data = out.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        let array = chunk
            .as_primitive_opt::<Decimal128Type>()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        match array.nulls() {
            None => data.extend(array.values().iter().map(|&v| Decimal128(v))),
            Some(nulls) => data.extend(
                array
                    .values()
                    .iter()
                    .zip(nulls.iter())
                    .map(|(&v, valid)| Decimal128(if valid { v } else { 0 })),
            ),
        }
    }
    Ok(())
}
