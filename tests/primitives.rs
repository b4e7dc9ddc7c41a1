use std::sync::Arc;

use arrow_ingest::{
    ArrowTypeId, ChunkedArray, Column, ConvertError, InternalType, Result,
    arrow_array::{
        Array, ArrayRef, BooleanArray, Float16Array, Float32Array, Float64Array, Int8Array,
        Int16Array, Int32Array, Int64Array, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
    },
    arrow_buffer::NullBuffer,
    arrow_schema::DataType,
    extract_nulls, materialize, resolve_internal_type,
};

fn decode(chunks: Vec<ArrayRef>, declared: &str) -> Result<Column> {
    let data_type = chunks[0].data_type().clone();
    let source = ChunkedArray::try_new(data_type.clone(), &chunks)?;
    let declared = declared.parse::<InternalType>()?;
    let internal = resolve_internal_type(&data_type, &declared, "c", "Arrow")?;
    let mut column = internal.create_column();
    materialize(&source, &mut column, "c", "Arrow", false)?;
    Ok(column)
}

#[test]
fn copies_integers_across_chunks() {
    let column = decode(
        vec![
            Arc::new(Int32Array::from(vec![1, -2])),
            Arc::new(Int32Array::from(vec![3])),
        ],
        "Int32",
    )
    .unwrap();
    assert_eq!(column.as_i32(), Some(&[1, -2, 3][..]));
}

#[test]
fn keeps_every_integer_width() {
    let column = decode(vec![Arc::new(Int8Array::from(vec![i8::MIN]))], "Int8").unwrap();
    assert_eq!(column.as_i8(), Some(&[i8::MIN][..]));

    let column = decode(vec![Arc::new(UInt8Array::from(vec![0, u8::MAX]))], "UInt8").unwrap();
    assert_eq!(column.as_u8(), Some(&[0, u8::MAX][..]));

    let column = decode(vec![Arc::new(Int16Array::from(vec![i16::MIN, -1]))], "Int16").unwrap();
    assert_eq!(column.as_i16(), Some(&[i16::MIN, -1][..]));

    let column = decode(vec![Arc::new(UInt32Array::from(vec![u32::MAX]))], "UInt32").unwrap();
    assert_eq!(column.as_u32(), Some(&[u32::MAX][..]));

    let column = decode(vec![Arc::new(UInt16Array::from(vec![u16::MAX]))], "UInt16").unwrap();
    assert_eq!(column.as_u16(), Some(&[u16::MAX][..]));

    let column = decode(vec![Arc::new(UInt64Array::from(vec![u64::MAX]))], "UInt64").unwrap();
    assert_eq!(column.as_u64(), Some(&[u64::MAX][..]));

    let column = decode(vec![Arc::new(Int64Array::from(vec![i64::MIN]))], "Int64").unwrap();
    assert_eq!(column.as_i64(), Some(&[i64::MIN][..]));
}

#[test]
fn copies_floats() {
    let column = decode(vec![Arc::new(Float32Array::from(vec![0.5, -1.25]))], "Float32").unwrap();
    assert_eq!(column.as_f32(), Some(&[0.5f32, -1.25][..]));

    let column = decode(vec![Arc::new(Float64Array::from(vec![f64::MAX]))], "Float64").unwrap();
    assert_eq!(column.as_f64(), Some(&[f64::MAX][..]));
}

#[test]
fn float_bits_survive_unchanged() {
    let nan = f64::from_bits(0x7ff8_0000_0000_beef);
    let column = decode(vec![Arc::new(Float64Array::from(vec![nan, -0.0]))], "Float64").unwrap();
    let bits: Vec<u64> = column.as_f64().unwrap().iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits, [0x7ff8_0000_0000_beef, (-0.0f64).to_bits()]);

    let nan = f32::from_bits(0x7fc0_1234);
    let column = decode(vec![Arc::new(Float32Array::from(vec![nan, -0.0]))], "Float32").unwrap();
    let bits: Vec<u32> = column.as_f32().unwrap().iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits, [0x7fc0_1234, (-0.0f32).to_bits()]);
}

#[test]
fn widens_half_floats() {
    let halves = Float16Array::from(vec![half::f16::from_f32(1.5), half::f16::from_f32(-2.0)]);
    let column = decode(vec![Arc::new(halves)], "Float32").unwrap();
    assert_eq!(column.as_f32(), Some(&[1.5f32, -2.0][..]));
}

#[test]
fn unpacks_booleans_to_bytes() {
    let column = decode(
        vec![Arc::new(BooleanArray::from(vec![true, false, true]))],
        "UInt8",
    )
    .unwrap();
    assert_eq!(column.as_u8(), Some(&[1u8, 0, 1][..]));
}

#[test]
fn respects_array_slices() {
    let ints: ArrayRef = Arc::new(Int32Array::from(vec![1, 2, 3, 4]).slice(1, 2));
    let column = decode(vec![ints], "Int32").unwrap();
    assert_eq!(column.as_i32(), Some(&[2, 3][..]));

    // Boolean offsets need not be byte aligned.
    let bools: ArrayRef = Arc::new(BooleanArray::from(vec![true, false, true, true]).slice(1, 3));
    let column = decode(vec![bools], "UInt8").unwrap();
    assert_eq!(column.as_u8(), Some(&[0u8, 1, 1][..]));
}

#[test]
fn nulls_into_non_nullable_column_fail() {
    let err = decode(vec![Arc::new(Int32Array::from(vec![Some(1), None]))], "Int32").unwrap_err();
    assert!(matches!(err, ConvertError::NullInNonNullableColumn { ref column } if column == "c"));
    assert!(err.to_string().contains("can not insert NULL data"));
}

#[test]
fn null_check_runs_before_any_value_is_copied() {
    let chunks: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![1, 2])),
        Arc::new(Int32Array::from(vec![Some(3), None])),
    ];
    let source = ChunkedArray::try_new(DataType::Int32, &chunks).unwrap();
    let mut column = Column::Int32(vec![42].into());
    let err = materialize(&source, &mut column, "c", "Arrow", false).unwrap_err();
    assert!(matches!(err, ConvertError::NullInNonNullableColumn { .. }));
    assert_eq!(column.as_i32(), Some(&[42][..]));
}

#[test]
fn null_map_spans_every_chunk() {
    let chunks: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![Some(1), None])),
        Arc::new(Int32Array::from(vec![None])),
        Arc::new(Int32Array::from(vec![5])),
    ];
    let source = ChunkedArray::try_new(DataType::Int32, &chunks).unwrap();
    assert_eq!(extract_nulls(&source).data(), &[0, 1, 1, 0]);
}

#[test]
fn nullable_target_gets_null_map_and_raw_values() {
    // Values under null slots are copied verbatim.
    let ints = Int32Array::new(vec![7, 9, 11].into(), Some(NullBuffer::from(vec![true, false, true])));
    let column = decode(vec![Arc::new(ints)], "Nullable(Int32)").unwrap();
    let nullable = column.as_nullable().unwrap();
    assert_eq!(nullable.null_map().data(), &[0, 1, 0]);
    assert_eq!(nullable.nested().as_i32(), Some(&[7, 9, 11][..]));
    assert!(nullable.is_null(1));
    assert_eq!(nullable.null_count(), 1);
}

#[test]
fn null_map_covers_chunks_without_nulls() {
    let column = decode(
        vec![
            Arc::new(Int32Array::from(vec![1, 2])),
            Arc::new(Int32Array::from(vec![None, Some(4)])),
        ],
        "Nullable(Int32)",
    )
    .unwrap();
    assert_eq!(column.as_nullable().unwrap().null_map().data(), &[0, 0, 1, 0]);
}

#[test]
fn boolean_nulls_decode_as_zero_under_null_map() {
    let column = decode(
        vec![Arc::new(BooleanArray::from(vec![Some(true), None]))],
        "Nullable(UInt8)",
    )
    .unwrap();
    let nullable = column.as_nullable().unwrap();
    assert_eq!(nullable.null_map().data(), &[0, 1]);
    assert_eq!(nullable.nested().len(), 2);
}

#[test]
fn empty_chunks_produce_empty_columns() {
    let column = decode(vec![Arc::new(Int64Array::from(Vec::<i64>::new()))], "Int64").unwrap();
    assert!(column.is_empty());

    let source = ChunkedArray::try_new(DataType::Int64, &[]).unwrap();
    let mut column = InternalType::Int64.create_column();
    materialize(&source, &mut column, "c", "Arrow", false).unwrap();
    assert!(column.is_empty());
}

#[test]
fn target_of_the_wrong_shape_is_rejected() {
    let chunks: Vec<ArrayRef> = vec![Arc::new(Int32Array::from(vec![1]))];
    let source = ChunkedArray::try_new(DataType::Int32, &chunks).unwrap();
    let mut column = InternalType::Int64.create_column();
    let err = materialize(&source, &mut column, "c", "Arrow", false).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::TargetMismatch { target: InternalType::Int64, .. }
    ));
}

#[test]
fn unsupported_type_is_reported_before_decoding() {
    assert_eq!(ArrowTypeId::of(&DataType::Utf8View), None);
    let chunks: Vec<ArrayRef> = vec![Arc::new(
        arrow_ingest::arrow_array::StringViewArray::from(vec!["a"]),
    )];
    let source = ChunkedArray::try_new(DataType::Utf8View, &chunks).unwrap();
    let mut column = InternalType::String.create_column();
    let err = materialize(&source, &mut column, "s", "ORC", false).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, ConvertError::UnsupportedType { .. }));
    assert!(msg.contains("ORC") && msg.contains("\"s\""));
}
