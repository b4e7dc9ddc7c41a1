use arrow_ingest::{Header, HeaderColumn, InternalType};

#[test]
fn internal_type_round_trips_through_its_name() {
    let ty: InternalType = serde_json::from_str("\"Array(Nullable(String))\"").unwrap();
    assert_eq!(ty, InternalType::array(InternalType::nullable(InternalType::String)));
    assert_eq!(serde_json::to_string(&ty).unwrap(), "\"Array(Nullable(String))\"");
}

#[test]
fn unknown_type_name_fails_to_deserialize() {
    let err = serde_json::from_str::<InternalType>("\"Blob\"").unwrap_err();
    assert!(err.to_string().contains("Blob"));
}

#[test]
fn header_reads_columns_in_order() {
    let header: Header = serde_json::from_str(
        r#"[
            {"name": "b", "type": "LowCardinality(String)"},
            {"name": "a", "type": "Decimal(18, 4)"}
        ]"#,
    )
    .unwrap();
    assert_eq!(
        header.columns(),
        &[
            HeaderColumn::new("b", InternalType::low_cardinality(InternalType::String)),
            HeaderColumn::new(
                "a",
                InternalType::Decimal128 {
                    precision: 18,
                    scale: 4
                }
            ),
        ]
    );

    let json = serde_json::to_string(&header).unwrap();
    assert_eq!(serde_json::from_str::<Header>(&json).unwrap(), header);
}

#[test]
fn header_rejects_duplicate_names() {
    let err = serde_json::from_str::<Header>(
        r#"[{"name": "a", "type": "Int32"}, {"name": "a", "type": "Int64"}]"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}
