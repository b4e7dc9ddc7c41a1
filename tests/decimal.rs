use std::sync::Arc;

use arrow_ingest::{
    ArrowTable, ChunkedArray, Column, Decimal128, Header, InternalType, Result, TableConverter,
    arrow_array::{Array, ArrayRef, Decimal128Array, RecordBatch},
    arrow_buffer::NullBuffer,
    materialize, resolve_internal_type,
};

fn decode(chunks: Vec<ArrayRef>, declared: &str) -> Result<Column> {
    let data_type = chunks[0].data_type().clone();
    let source = ChunkedArray::try_new(data_type.clone(), &chunks)?;
    let declared = declared.parse::<InternalType>()?;
    let internal = resolve_internal_type(&data_type, &declared, "d", "Arrow")?;
    let mut column = internal.create_column();
    materialize(&source, &mut column, "d", "Arrow", false)?;
    Ok(column)
}

fn decimals(values: Vec<Option<i128>>, precision: u8, scale: i8) -> ArrayRef {
    Arc::new(
        Decimal128Array::from(values)
            .with_precision_and_scale(precision, scale)
            .unwrap(),
    )
}

#[test]
fn keeps_source_precision_and_scale() {
    let column = decode(vec![decimals(vec![Some(12_345), Some(-1)], 10, 2)], "Decimal(10, 2)")
        .unwrap();
    let decimal = column.as_decimal().unwrap();
    assert_eq!(decimal.precision(), 10);
    assert_eq!(decimal.scale(), 2);
    assert_eq!(decimal.data(), &[Decimal128(12_345), Decimal128(-1)]);
}

#[test]
fn null_slots_decode_as_zero() {
    // Unlike fixed-width numbers, the value under a null is not copied.
    let raw = Decimal128Array::new(
        vec![12_345, 999].into(),
        Some(NullBuffer::from(vec![true, false])),
    )
    .with_precision_and_scale(10, 2)
    .unwrap();
    let column = decode(vec![Arc::new(raw)], "Nullable(Decimal(10, 2))").unwrap();
    let nullable = column.as_nullable().unwrap();
    assert_eq!(nullable.null_map().data(), &[0, 1]);
    assert_eq!(
        nullable.nested().as_decimal().unwrap().data(),
        &[Decimal128(12_345), Decimal128(0)]
    );
}

#[test]
fn spans_chunks() {
    let column = decode(
        vec![
            decimals(vec![Some(1)], 38, 0),
            decimals(vec![Some(i128::MAX / 2), Some(2)], 38, 0),
        ],
        "Decimal(38, 0)",
    )
    .unwrap();
    assert_eq!(column.len(), 3);
}

#[test]
fn converter_rescales_to_the_declared_decimal() {
    let batch = RecordBatch::try_from_iter([("d", decimals(vec![Some(150)], 5, 2))]).unwrap();
    let table = ArrowTable::from_batch(batch);
    let header = Header::try_from_pairs([(
        "d",
        InternalType::Decimal128 {
            precision: 9,
            scale: 4,
        },
    )])
    .unwrap();

    let rows = TableConverter::new("Arrow").convert(&table, &header).unwrap();
    let decimal = rows.columns()[0].as_decimal().unwrap();
    assert_eq!((decimal.precision(), decimal.scale()), (9, 4));
    assert_eq!(decimal.data(), &[Decimal128(15_000)]);
}

#[test]
fn converter_casts_decimal_to_float() {
    let batch = RecordBatch::try_from_iter([("d", decimals(vec![Some(-125)], 5, 2))]).unwrap();
    let table = ArrowTable::from_batch(batch);
    let header = Header::try_from_pairs([("d", InternalType::Float64)]).unwrap();

    let rows = TableConverter::new("Arrow").convert(&table, &header).unwrap();
    assert_eq!(rows.columns()[0].as_f64(), Some(&[-1.25f64][..]));
}
