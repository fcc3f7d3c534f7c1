use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ColumnRoles, Record, RecordTable, Value};
use crate::error::{DashError, DashResult};

/// Header names and rows as read from a file, before validation.
type RawTable = (Vec<String>, Vec<Record>);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the dataset once.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma-delimited (the usual export)
/// * `.tsv`     – header row, tab-delimited
/// * `.json`    – `[{ "Artist": ..., "Track": ..., "Stream": ... }, ...]`
/// * `.parquet` – flat string / integer / float / bool columns
///
/// Any failure, including a missing artist, track or metric column and a
/// file without data rows, is reported as [`DashError::DataLoad`].
pub fn load_file(path: &Path, roles: &ColumnRoles) -> DashResult<RecordTable> {
    let table = read_file(path)
        .and_then(|(columns, rows)| validate(columns, rows, roles))
        .map_err(|e| DashError::data_load(path.display(), &e))?;

    log::info!(
        "Loaded {} rows with {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    log::debug!("Numeric columns: {:?}", table.numeric_columns());
    Ok(table)
}

fn read_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn validate(columns: Vec<String>, rows: Vec<Record>, roles: &ColumnRoles) -> Result<RecordTable> {
    let required = [
        ("artist", roles.artist.as_str()),
        ("track", roles.track.as_str()),
        ("stream", roles.stream.as_str()),
        ("likes", roles.likes.as_str()),
        ("views", roles.views.as_str()),
    ];
    for (role, name) in required {
        if !columns.iter().any(|c| c == name) {
            bail!("missing {role} column '{name}'");
        }
    }
    if rows.is_empty() {
        bail!("no data rows");
    }
    Ok(RecordTable::with_roles(columns, rows, roles.clone()))
}

fn check_unique_headers(headers: &[String]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for h in headers {
        if !seen.insert(h.as_str()) {
            bail!("duplicate column '{h}'");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line.  Every record must
/// have as many fields as the header and be valid UTF-8.
fn load_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_unique_headers(&headers)?;

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells: BTreeMap<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(col, raw)| (col.clone(), Value::infer(raw)))
            .collect();

        rows.push(Record { cells });
    }

    Ok((headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Artist": "Gorillaz", "Track": "Feel Good Inc.", "Stream": 1040234854 },
///   ...
/// ]
/// ```
///
/// Columns are the union of keys in order of first appearance; a key
/// missing from a record reads as `Null`.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            cells.insert(key.clone(), json_to_value(val));
        }

        rows.push(Record { cells });
    }

    Ok((columns, rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file.  Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_unique_headers(&columns)?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, col_name) in columns.iter().enumerate() {
                let value = extract_value(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{col_name}'"))?;
                cells.insert(col_name.clone(), value);
            }
            rows.push(Record { cells });
        }
    }

    Ok((columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => Value::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer)
        }
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        // Dates, decimals, dictionaries …: keep their display text.
        _ => Value::Text(array_value_to_string(col, row).context("formatting cell")?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents).expect("write temp file");
        file
    }

    const HEADER: &str = "Artist,Track,Danceability,Views,Likes,Stream,Licensed\n";

    #[test]
    fn csv_infers_numeric_columns_in_header_order() {
        let csv = format!(
            "{HEADER}Gorillaz,Feel Good Inc.,0.818,693555221,6220896,1040234854,True\n\
             Gorillaz,Rhinestone Eyes,0.676,72011645,1079128,310083733,True\n"
        );
        let file = write_temp(".csv", csv.as_bytes());
        let table = load_file(file.path(), &ColumnRoles::default()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.numeric_columns(),
            &["Danceability", "Views", "Likes", "Stream"]
        );
        assert_eq!(table.rows()[1].get("Track"), &Value::from("Rhinestone Eyes"));
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let tsv = "Artist\tTrack\tViews\tLikes\tStream\nA\tt1\t1\t2\t3\n";
        let file = write_temp(".tsv", tsv.as_bytes());
        let table = load_file(file.path(), &ColumnRoles::default()).unwrap();
        assert_eq!(table.rows()[0].get("Stream"), &Value::Integer(3));
    }

    #[test]
    fn ragged_row_is_a_load_error() {
        let csv = format!("{HEADER}Gorillaz,Feel Good Inc.,0.8\n");
        let file = write_temp(".csv", csv.as_bytes());
        let err = load_file(file.path(), &ColumnRoles::default()).unwrap_err();
        assert!(matches!(err, DashError::DataLoad { .. }));
    }

    #[test]
    fn invalid_utf8_is_a_load_error() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"Bj\xF6rk,Army of Me,0.5,1,2,3,True\n");
        let file = write_temp(".csv", &bytes);
        let err = load_file(file.path(), &ColumnRoles::default()).unwrap_err();
        assert!(matches!(err, DashError::DataLoad { .. }));
    }

    #[test]
    fn missing_artist_column_is_a_load_error() {
        let file = write_temp(".csv", b"Track,Views,Likes,Stream\nt,1,2,3\n");
        let err = load_file(file.path(), &ColumnRoles::default()).unwrap_err();
        let DashError::DataLoad { reason, .. } = err else {
            panic!("expected DataLoad, got {err:?}");
        };
        assert!(reason.contains("missing artist column 'Artist'"), "{reason}");
    }

    #[test]
    fn header_only_file_is_a_load_error() {
        let file = write_temp(".csv", HEADER.as_bytes());
        let err = load_file(file.path(), &ColumnRoles::default()).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn missing_file_and_unknown_extension_fail() {
        let err = load_file(Path::new("does/not/exist.csv"), &ColumnRoles::default());
        assert!(matches!(err, Err(DashError::DataLoad { .. })));

        let file = write_temp(".xlsx", b"");
        let err = load_file(file.path(), &ColumnRoles::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension: .xlsx"));
    }

    #[test]
    fn json_records_match_csv() {
        let json = r#"[
            {"Artist": "X", "Track": "a", "Views": 10, "Likes": 1, "Stream": 100},
            {"Artist": "Y", "Track": "b", "Views": 20, "Likes": null, "Stream": 50.5}
        ]"#;
        let csv = "Artist,Track,Views,Likes,Stream\nX,a,10,1,100\nY,b,20,,50.5\n";
        let from_json = write_temp(".json", json.as_bytes());
        let from_csv = write_temp(".csv", csv.as_bytes());

        let a = load_file(from_json.path(), &ColumnRoles::default()).unwrap();
        let b = load_file(from_csv.path(), &ColumnRoles::default()).unwrap();

        assert_eq!(a.columns(), b.columns());
        assert_eq!(a.numeric_columns(), b.numeric_columns());
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn na_tokens_load_as_missing() {
        let csv = "Artist,Track,Views,Likes,Stream\n\
                   X,a,10,NaN,100\n\
                   X,b,N/A,2,nan\n\
                   Y,c,30,3,NULL\n";
        let file = write_temp(".csv", csv.as_bytes());
        let table = load_file(file.path(), &ColumnRoles::default()).unwrap();

        assert_eq!(table.numeric_columns(), &["Views", "Likes", "Stream"]);
        assert_eq!(table.rows()[0].get("Likes"), &Value::Null);
        assert_eq!(table.rows()[1].get("Views"), &Value::Null);
        assert_eq!(table.rows()[2].get("Stream"), &Value::Null);

        let totals = crate::views::compare_artists(&table, &"X".into(), &"Y".into()).unwrap();
        assert!(totals.iter().all(|t| t.value.is_finite()));
    }

    fn write_parquet(suffix: &str) -> tempfile::NamedTempFile {
        use std::sync::Arc;

        use arrow::array::{BooleanArray, Float64Array, Int32Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Artist", DataType::Utf8, false),
            Field::new("Track", DataType::Utf8, false),
            Field::new("Views", DataType::Int64, false),
            Field::new("Likes", DataType::Int32, true),
            Field::new("Stream", DataType::Float64, false),
            Field::new("Licensed", DataType::Boolean, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["X", "Y"])),
            Arc::new(StringArray::from(vec!["a", "b"])),
            Arc::new(Int64Array::from(vec![10, 20])),
            Arc::new(Int32Array::from(vec![Some(1), None])),
            Arc::new(Float64Array::from(vec![100.5, 50.25])),
            Arc::new(BooleanArray::from(vec![true, false])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("record batch");

        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        let mut writer = ArrowWriter::try_new(file.as_file_mut(), schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");
        file
    }

    #[test]
    fn parquet_matches_csv() {
        let csv = "Artist,Track,Views,Likes,Stream,Licensed\n\
                   X,a,10,1,100.5,True\n\
                   Y,b,20,,50.25,False\n";
        let from_csv = write_temp(".csv", csv.as_bytes());
        let b = load_file(from_csv.path(), &ColumnRoles::default()).unwrap();

        for suffix in [".parquet", ".pq"] {
            let from_parquet = write_parquet(suffix);
            let a = load_file(from_parquet.path(), &ColumnRoles::default()).unwrap();

            assert_eq!(a.columns(), b.columns());
            assert_eq!(a.numeric_columns(), &["Views", "Likes", "Stream"]);
            assert_eq!(a.numeric_columns(), b.numeric_columns());
            assert_eq!(a.rows(), b.rows());
            assert_eq!(a.rows()[1].get("Likes"), &Value::Null);
            assert_eq!(a.rows()[0].get("Licensed"), &Value::Bool(true));
        }
    }

    #[test]
    fn corrupt_parquet_is_a_load_error() {
        let file = write_temp(".parquet", b"PAR1 not really parquet");
        let err = load_file(file.path(), &ColumnRoles::default()).unwrap_err();
        assert!(matches!(err, DashError::DataLoad { .. }));
    }

    #[test]
    fn custom_roles_are_validated() {
        let roles = ColumnRoles {
            artist: "artist_name".into(),
            ..ColumnRoles::default()
        };
        let file = write_temp(".csv", b"artist_name,Track,Views,Likes,Stream\nA,t,1,2,3\n");
        let table = load_file(file.path(), &roles).unwrap();
        assert_eq!(table.artists().unwrap(), vec![Value::from("A")]);
    }
}
