use super::*;

fn wakad_2023() -> DataRow {
    DataRow {
        year: Some(2023),
        area: Some("Wakad".into()),
        price: Some(6500.0),
        demand: Some(78.0),
        size: Some(950.0),
        kind: Some("Apartment".into()),
    }
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("estate-chat-export-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// =============================================================================
// to_csv
// =============================================================================

#[test]
fn single_row_yields_header_and_one_line() {
    let csv = to_csv(&[wakad_2023()]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, vec!["Year,Area,Price (₹/sq.ft),Demand Index,Size (sq.ft),Type", "2023,Wakad,6500,78,950,Apartment"]);
    assert!(!csv.ends_with('\n'));
}

#[test]
fn empty_table_yields_header_only() {
    assert_eq!(to_csv(&[]), "Year,Area,Price (₹/sq.ft),Demand Index,Size (sq.ft),Type");
}

#[test]
fn rows_keep_table_order() {
    let mut second = wakad_2023();
    second.year = Some(2021);
    second.area = Some("Aundh".into());
    let csv = to_csv(&[wakad_2023(), second]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2023,Wakad"));
    assert!(lines[2].starts_with("2021,Aundh"));
}

#[test]
fn missing_values_are_empty_cells() {
    let row = DataRow { year: Some(2024), area: Some("Akurdi".into()), demand: Some(760.0), ..DataRow::default() };
    assert_eq!(to_csv(&[row]).lines().nth(1), Some("2024,Akurdi,,760,,"));
}

#[test]
fn fractional_values_keep_their_fraction() {
    let mut row = wakad_2023();
    row.price = Some(6500.5);
    row.demand = Some(7.25);
    assert_eq!(to_csv(&[row]).lines().nth(1), Some("2023,Wakad,6500.5,7.25,950,Apartment"));
}

#[test]
fn embedded_commas_are_not_escaped() {
    let mut row = wakad_2023();
    row.kind = Some("2BHK, furnished".into());
    assert_eq!(to_csv(&[row]).lines().nth(1), Some("2023,Wakad,6500,78,950,2BHK, furnished"));
}

// =============================================================================
// write_csv
// =============================================================================

#[tokio::test]
async fn write_csv_creates_named_file() {
    let dir = scratch_dir();
    let path = write_csv(&[wakad_2023()], &dir).await.unwrap();
    assert_eq!(path, dir.join(EXPORT_FILE_NAME));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), to_csv(&[wakad_2023()]));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn write_csv_rejects_empty_table() {
    let dir = scratch_dir();
    let err = write_csv(&[], &dir).await.unwrap_err();
    assert!(matches!(err, ExportError::EmptyTable));
    assert!(!dir.join(EXPORT_FILE_NAME).exists());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn write_csv_reports_io_failure() {
    let missing = std::env::temp_dir().join(format!("estate-chat-missing-{}", uuid::Uuid::new_v4()));
    let err = write_csv(&[wakad_2023()], &missing).await.unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert!(err.to_string().contains(EXPORT_FILE_NAME));
}
