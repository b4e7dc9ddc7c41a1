//! Variable-length strings and binary.

use crate::{
    arrow_array::{Array, GenericByteArray, cast::AsArray, types::ByteArrayType},
    arrow_buffer::ArrowNativeType,
    column::StringColumn,
    error::Result,
    source::ChunkedArray,
};

/// Append every value followed by a zero byte.
///
/// The first pass sizes the character buffer (content plus one terminator per
/// row), the second copies. Null and empty values contribute only the
/// terminator. Bytes are copied as-is; UTF-8 is not validated.
pub fn fill<T: ByteArrayType>(source: &ChunkedArray<'_>, out: &mut StringColumn) -> Result<()> {
    let arrays = source
        .chunks()
        .iter()
        .map(|chunk| {
            chunk
                .as_bytes_opt::<T>()
                .ok_or_else(|| source.chunk_mismatch(chunk.as_ref()))
        })
        .collect::<Result<Vec<_>>>()?;

    let total_bytes = arrays
        .iter()
        .map(|array| content_len(array) + array.len())
        .sum();
    out.reserve(source.len(), total_bytes);

    for array in arrays {
        let offsets = array.value_offsets();
        let bytes = array.value_data();
        for i in 0..array.len() {
            if array.is_valid(i) {
                let start = offsets[i].as_usize();
                let end = offsets[i + 1].as_usize();
                out.chars_mut().extend_from_slice(&bytes[start..end]);
            }
            out.push_terminator();
        }
    }
    Ok(())
}

fn content_len<T: ByteArrayType>(array: &GenericByteArray<T>) -> usize {
    let offsets = array.value_offsets();
    match (offsets.first(), offsets.last()) {
        (Some(first), Some(last)) => last.as_usize() - first.as_usize(),
        _ => 0,
    }
}
