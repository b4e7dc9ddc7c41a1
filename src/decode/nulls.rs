//! Null bytemap extraction.

use crate::{arrow_array::Array, column::NumericColumn, source::ChunkedArray};

/// Append one byte per row of `source` to `null_map`: `1` for null, `0`
/// otherwise.
pub fn fill_null_map(source: &ChunkedArray<'_>, null_map: &mut NumericColumn<u8>) {
    let data = null_map.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        match chunk.nulls() {
            Some(nulls) => data.extend(nulls.iter().map(|valid| u8::from(!valid))),
            None => data.resize(data.len() + chunk.len(), 0),
        }
    }
}

/// Dense null bytemap covering every row of `source`.
pub fn extract_nulls(source: &ChunkedArray<'_>) -> NumericColumn<u8> {
    let mut null_map = NumericColumn::new();
    fill_null_map(source, &mut null_map);
    null_map
}
