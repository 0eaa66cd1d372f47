//! Integration tests for batch/frame conversion.

use chrono::NaiveDate;
use polars::prelude::DataType;
use rdc_model::{CanonicalRecordBatch, EntityKind, FieldValue, INDEX_COLUMN, RecordBatch};

fn store_batch() -> RecordBatch {
    let opened = NaiveDate::from_ymd_opt(2006, 3, 12)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    RecordBatch::from_rows(
        vec![
            "store_code".into(),
            "staff_numbers".into(),
            "opening_date".into(),
        ],
        vec![
            vec!["WEB-1388012W".into(), FieldValue::Int(325), FieldValue::Null],
            vec!["HI-9B97EE4E".into(), FieldValue::Int(34), FieldValue::Timestamp(opened)],
        ],
    )
    .unwrap()
}

#[test]
fn canonical_frame_keeps_types_and_order() {
    let canonical = CanonicalRecordBatch::reindexed(EntityKind::Store, store_batch());
    let df = canonical.to_dataframe().unwrap();

    assert_eq!(df.width(), 4);
    assert_eq!(df.get_column_names()[0].as_str(), INDEX_COLUMN);
    assert_eq!(df.column("staff_numbers").unwrap().dtype(), &DataType::Int64);
    assert!(matches!(
        df.column("opening_date").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
    assert_eq!(df.column("opening_date").unwrap().null_count(), 1);
}

#[test]
fn dataframe_back_to_batch_keeps_text_and_numbers() {
    let canonical = CanonicalRecordBatch::reindexed(EntityKind::Store, store_batch());
    let df = canonical.to_dataframe().unwrap();
    let batch = RecordBatch::from_dataframe(&df).unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.get(1, INDEX_COLUMN), Some(&FieldValue::Int(1)));
    assert_eq!(batch.get(0, "store_code"), Some(&FieldValue::from("WEB-1388012W")));
    assert_eq!(batch.get(1, "staff_numbers"), Some(&FieldValue::Int(34)));
}
