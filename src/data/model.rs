use std::collections::{BTreeMap, HashSet};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::error::{DashError, DashResult};

// ---------------------------------------------------------------------------
// Value – a single cell of the record table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV reader infers.
/// `Value` must be `Ord` and `Hash` so distinct values can be collected.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// Equality follows the total order so NaN cells deduplicate like any other.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cells of different kinds sort by kind (nulls first, text last); floats
/// use IEEE total order so `NaN` has a fixed place.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.kind_rank());
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => state.write_i64(*i),
            // Bit pattern, consistent with `total_cmp` equality.
            Value::Float(v) => state.write_u64(v.to_bits()),
            Value::Bool(b) => state.write_u8(u8::from(*b)),
            Value::Null => {}
        }
    }
}

/// Dropdown and table text. Floats get four decimals.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Null => f.write_str("<null>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Text cells read as missing, the same set a pandas CSV reader treats as NA.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl Value {
    /// Infer the type of a raw text cell: integer, float, bool, else text.
    /// Empty cells and the [`NA_TOKENS`] become `Null`.
    pub fn infer(s: &str) -> Value {
        if NA_TOKENS.contains(&s) {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => Value::Bool(true),
            "false" | "False" | "FALSE" => Value::Bool(false),
            _ => Value::Text(s.to_string()),
        }
    }

    /// Numeric view of the cell. Booleans are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Integer(_) => 2,
            Value::Float(_) => 3,
            Value::Text(_) => 4,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn is_numeric_or_null(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_) | Value::Null)
    }
}

static NULL: Value = Value::Null;

// ---------------------------------------------------------------------------
// ColumnRoles – which columns carry artist, track and comparison metrics
// ---------------------------------------------------------------------------

/// Names of the columns the views address by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    pub artist: String,
    pub track: String,
    pub stream: String,
    pub likes: String,
    pub views: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            artist: "Artist".to_string(),
            track: "Track".to_string(),
            stream: "Stream".to_string(),
            likes: "Likes".to_string(),
            views: "Views".to_string(),
        }
    }
}

impl ColumnRoles {
    /// The metrics summed by the artist comparison, in output order.
    pub fn comparison_metrics(&self) -> [&str; 3] {
        [self.stream.as_str(), self.likes.as_str(), self.views.as_str()]
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single row: column_name → value. Absent keys read as `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub cells: BTreeMap<String, Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> &Value {
        self.cells.get(column).unwrap_or(&NULL)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Record {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the immutable loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset with its numeric column set computed once.
///
/// Never mutated after construction; share it by reference (or `Arc`).
#[derive(Debug, Clone)]
pub struct RecordTable {
    rows: Vec<Record>,
    /// Column names in header order.
    columns: Vec<String>,
    /// Subset of `columns` holding only numbers (or missing cells).
    numeric_columns: Vec<String>,
    roles: ColumnRoles,
}

impl RecordTable {
    /// Build the table from rows, with default column roles.
    pub fn from_records(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self::with_roles(columns, rows, ColumnRoles::default())
    }

    pub fn with_roles(columns: Vec<String>, rows: Vec<Record>, roles: ColumnRoles) -> Self {
        let numeric_columns = columns
            .iter()
            .filter(|col| {
                let mut any_number = false;
                let all_numeric = rows.iter().all(|row| {
                    let v = row.get(col);
                    any_number |= !v.is_null();
                    v.is_numeric_or_null()
                });
                all_numeric && any_number
            })
            .cloned()
            .collect();

        RecordTable {
            rows,
            columns,
            numeric_columns,
            roles,
        }
    }

    /// Columnar constructor, handy when the data is already split by column.
    /// Shorter columns are padded with `Null`.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> Self {
        let columns: Vec<(String, Vec<Value>)> =
            columns.into_iter().map(|(n, v)| (n.into(), v)).collect();
        let n_rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let rows: Vec<Record> = (0..n_rows)
            .map(|i| {
                columns
                    .iter()
                    .map(|(name, values)| {
                        (name.clone(), values.get(i).cloned().unwrap_or(Value::Null))
                    })
                    .collect()
            })
            .collect();
        let names: Vec<String> = columns.into_iter().map(|(n, _)| n).collect();
        Self::from_records(names, rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Numeric column names, in header order.
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    /// Distinct values of a column in order of first appearance.
    pub fn distinct_values(&self, column: &str) -> DashResult<Vec<Value>> {
        self.require_column(column)?;
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(column))
            .filter(|v| seen.insert(*v))
            .cloned()
            .collect())
    }

    /// Distinct artists, in order of first appearance.
    pub fn artists(&self) -> DashResult<Vec<Value>> {
        self.distinct_values(&self.roles.artist)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, column: &str) -> DashResult<Vec<&Value>> {
        self.require_column(column)?;
        Ok(self.rows.iter().map(|row| row.get(column)).collect())
    }

    /// A numeric column as `f64`, missing cells as `NaN`.
    pub fn numeric_values(&self, column: &str) -> DashResult<Vec<f64>> {
        self.require_numeric(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(column).as_f64().unwrap_or(f64::NAN))
            .collect())
    }

    pub fn require_column(&self, column: &str) -> DashResult<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(DashError::unknown_column(column))
        }
    }

    pub fn require_numeric(&self, column: &str) -> DashResult<()> {
        self.require_column(column)?;
        if self.is_numeric(column) {
            Ok(())
        } else {
            Err(DashError::non_numeric_column(column))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordTable {
        RecordTable::from_columns(vec![
            ("Artist", vec!["X".into(), "X".into(), "Y".into()]),
            ("Track", vec!["a".into(), "b".into(), "c".into()]),
            ("Stream", vec![100i64.into(), 200i64.into(), 50i64.into()]),
            ("Energy", vec![0.5.into(), Value::Null, 0.25.into()]),
            ("Licensed", vec![true.into(), false.into(), true.into()]),
        ])
    }

    #[test]
    fn infer_cell_types() {
        assert_eq!(Value::infer("42"), Value::Integer(42));
        assert_eq!(Value::infer("-1.5"), Value::Float(-1.5));
        assert_eq!(Value::infer("True"), Value::Bool(true));
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("Gorillaz"), Value::Text("Gorillaz".into()));
    }

    #[test]
    fn na_tokens_are_missing_not_numbers() {
        for token in ["NaN", "nan", "-nan", "NA", "N/A", "null", "NULL", "None", "<NA>"] {
            assert_eq!(Value::infer(token), Value::Null, "{token}");
        }
        assert_eq!(Value::infer("inf"), Value::Float(f64::INFINITY));
        assert_eq!(Value::infer("Nana"), Value::Text("Nana".into()));
    }

    #[test]
    fn mixed_kinds_sort_nulls_first_text_last() {
        let mut cells = vec![
            Value::from("b"),
            Value::Float(f64::NAN),
            Value::from(2i64),
            Value::Null,
            Value::from(true),
            Value::Float(0.5),
            Value::from("a"),
        ];
        cells.sort();
        assert_eq!(cells[0], Value::Null);
        assert_eq!(cells[1], Value::Bool(true));
        assert_eq!(cells[2], Value::Integer(2));
        assert_eq!(cells[3], Value::Float(0.5));
        assert!(matches!(cells[4], Value::Float(v) if v.is_nan()));
        assert_eq!(&cells[5..], &[Value::from("a"), Value::from("b")]);

        // Integer 1 and Float 1.0 stay distinct cells.
        let set: HashSet<Value> = [
            Value::Integer(1),
            Value::Float(1.0),
            Value::Float(f64::NAN),
            Value::Float(f64::NAN),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn display_text() {
        assert_eq!(Value::from("Daft Punk").to_string(), "Daft Punk");
        assert_eq!(Value::Float(0.1234567).to_string(), "0.1235");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(Value::Bool(false).to_string(), "False");
        assert_eq!(Value::Null.to_string(), "<null>");
    }

    #[test]
    fn numeric_columns_follow_header_order() {
        let table = sample();
        assert_eq!(table.numeric_columns(), &["Stream", "Energy"]);
        assert!(!table.is_numeric("Licensed"));
    }

    #[test]
    fn all_null_column_is_not_numeric() {
        let table = RecordTable::from_columns(vec![
            ("a", vec![1i64.into(), 2i64.into()]),
            ("empty", vec![Value::Null, Value::Null]),
        ]);
        assert_eq!(table.numeric_columns(), &["a"]);
    }

    #[test]
    fn distinct_values_keep_first_appearance() {
        let table = sample();
        assert_eq!(
            table.artists().unwrap(),
            vec![Value::from("X"), Value::from("Y")]
        );
        assert!(matches!(
            table.distinct_values("Genre"),
            Err(DashError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn numeric_values_reject_text_columns() {
        let table = sample();
        let energy = table.numeric_values("Energy").unwrap();
        assert_eq!(energy[0], 0.5);
        assert!(energy[1].is_nan());
        assert_eq!(
            table.numeric_values("Track"),
            Err(DashError::non_numeric_column("Track"))
        );
    }
}
