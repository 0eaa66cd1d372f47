//! End-to-end reads through `SourceLocation`.

use std::fs;

use rdc_ingest::{IngestError, SourceLocation, read_source};
use rdc_model::FieldValue;
use tempfile::TempDir;

#[test]
fn reads_mirrored_s3_csv() {
    let dir = TempDir::new().unwrap();
    let bucket = dir.path().join("data-handling-public");
    fs::create_dir_all(&bucket).unwrap();
    fs::write(
        bucket.join("products.csv"),
        ",product_name,product_price,weight,removed\n\
         0,FurReal Dazzlin Dimples,£39.99,1.6kg,Still_avaliable\n\
         1,Tiffany's Cooking,£12.99,12 x 100g,Removed\n",
    )
    .unwrap();

    let location = SourceLocation::parse("s3://data-handling-public/products.csv").unwrap();
    let batch = read_source(&location, dir.path()).unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.width(), 4);
    assert_eq!(batch.columns()[0], "product_name");
    assert_eq!(batch.get(1, "weight"), Some(&FieldValue::from("12 x 100g")));
    assert_eq!(batch.get(0, "product_price"), Some(&FieldValue::from("£39.99")));
}

#[test]
fn reads_column_oriented_json() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("date_details.json"),
        r#"{"month": {"0": "9", "1": "2"}, "time_period": {"0": "Evening", "1": "Morning"}}"#,
    )
    .unwrap();

    let location = SourceLocation::parse("date_details.json").unwrap();
    let batch = read_source(&location, dir.path()).unwrap();

    assert_eq!(batch.columns(), ["month".to_string(), "time_period".to_string()]);
    assert_eq!(batch.get(1, "time_period"), Some(&FieldValue::from("Morning")));
}

#[test]
fn missing_mirror_is_reported() {
    let dir = TempDir::new().unwrap();
    let location = SourceLocation::parse("s3://bucket/orders.json").unwrap();
    let err = read_source(&location, dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
