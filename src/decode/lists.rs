//! Lists with 32- and 64-bit offsets.

use crate::{
    arrow_array::{Array, ArrayRef, OffsetSizeTrait, cast::AsArray},
    arrow_buffer::ArrowNativeType,
    arrow_schema::DataType,
    column::{ArrayColumn, NumericColumn},
    decode::materialize,
    error::{ConvertError, Result},
    source::ChunkedArray,
};

/// Append every list row: the referenced values go to the nested column,
/// decoded recursively as nested elements, and one end offset is recorded
/// per row.
///
/// Only the value range a chunk actually references is decoded, so sliced
/// list arrays are handled.
pub fn fill<O: OffsetSizeTrait>(
    source: &ChunkedArray<'_>,
    out: &mut ArrayColumn,
    column_name: &str,
    format_name: &str,
) -> Result<()> {
    let item_type = match source.data_type() {
        DataType::List(item) | DataType::LargeList(item) => item.data_type().clone(),
        other => {
            return Err(ConvertError::unsupported_type(
                other,
                column_name,
                format_name,
            ));
        }
    };

    let mut values: Vec<ArrayRef> = Vec::with_capacity(source.num_chunks());
    for chunk in source.chunks() {
        let list = chunk
            .as_list_opt::<O>()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        let (first, last) = offset_bounds(list.value_offsets());
        values.push(list.values().slice(first, last - first));
    }
    let nested = ChunkedArray::try_from_owned(item_type, values)?;
    materialize(&nested, out.data_mut(), column_name, format_name, true)?;

    append_offsets::<O>(source, out.offsets_mut())
}

fn append_offsets<O: OffsetSizeTrait>(
    source: &ChunkedArray<'_>,
    offsets: &mut NumericColumn<u64>,
) -> Result<()> {
    let data = offsets.data_mut();
    data.reserve(source.len());
    for chunk in source.chunks() {
        let list = chunk
            .as_list_opt::<O>()
            .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))?;
        let base = data.last().copied().unwrap_or(0);
        let chunk_offsets = list.value_offsets();
        let (first, _) = offset_bounds(chunk_offsets);
        data.extend(
            chunk_offsets
                .iter()
                .skip(1)
                .map(|end| base + (end.as_usize() - first) as u64),
        );
    }
    Ok(())
}

fn offset_bounds<O: OffsetSizeTrait>(offsets: &[O]) -> (usize, usize) {
    match (offsets.first(), offsets.last()) {
        (Some(first), Some(last)) => (first.as_usize(), last.as_usize()),
        _ => (0, 0),
    }
}
