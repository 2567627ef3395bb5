use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{BatterTable, RawRow};
use crate::error::DashboardError;

/// Columns every source must provide, in export order.
pub const COLUMNS: [&str; 7] = [
    "BatterID",
    "bowling_type",
    "n_balls",
    "mean_residual",
    "std_residual",
    "se",
    "t_stat",
];

/// Worksheet holding the results table in spreadsheet sources.
pub const RESULTS_SHEET: &str = "results";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a batter results table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns in [`COLUMNS`] (any order)
/// * `.parquet` – one column per field; numeric columns may be int, float or text
/// * `.json`    – `[{ "BatterID": "...", "bowling_type": "Pace", ... }, ...]`
/// * `.xlsx` / `.xls` – the [`RESULTS_SHEET`] worksheet, header in the first row
///
/// Unparseable cells become missing values; rows missing a required field
/// are dropped. A source lacking any of the columns is an error.
pub fn load_file(path: &Path) -> Result<BatterTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "xlsx" | "xls" => load_excel(path),
        other => Err(DashboardError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} records ({} unique batters) from {}",
        table.len(),
        table.unique_batters,
        path.display()
    );
    Ok(table)
}

/// Validate raw rows and assemble the master table.
fn finish(rows: Vec<RawRow>) -> BatterTable {
    let total = rows.len();
    let records: Vec<_> = rows.into_iter().filter_map(RawRow::into_record).collect();
    let dropped = total - records.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} of {total} rows with missing or invalid required fields");
    }
    BatterTable::from_records(records, dropped)
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Position of each required column within a source's header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    batter_id: usize,
    bowling_type: usize,
    n_balls: usize,
    mean_residual: usize,
    std_residual: usize,
    se: usize,
    t_stat: usize,
}

impl ColumnIndex {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, DashboardError> {
        let find = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);

        let found: Vec<Option<usize>> = COLUMNS.iter().map(|c| find(*c)).collect();
        let missing: Vec<String> = COLUMNS
            .iter()
            .zip(&found)
            .filter(|(_, idx)| idx.is_none())
            .map(|(c, _)| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::MissingColumns(missing));
        }

        let at = |i: usize| found[i].unwrap_or_default();
        Ok(ColumnIndex {
            batter_id: at(0),
            bowling_type: at(1),
            n_balls: at(2),
            mean_residual: at(3),
            std_residual: at(4),
            se: at(5),
            t_stat: at(6),
        })
    }
}

/// Coerce a text cell to a number; blank or non-numeric text is missing.
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

fn parse_text(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<BatterTable> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV from any reader. Also used to re-read exported files.
pub fn read_csv<R: Read>(reader: R) -> Result<BatterTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let idx = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        rows.push(RawRow {
            batter_id: parse_text(cell(idx.batter_id)),
            bowling_type: parse_text(cell(idx.bowling_type)),
            n_balls: parse_number(cell(idx.n_balls)),
            mean_residual: parse_number(cell(idx.mean_residual)),
            std_residual: parse_number(cell(idx.std_residual)),
            se: parse_number(cell(idx.se)),
            t_stat: parse_number(cell(idx.t_stat)),
        });
    }

    Ok(finish(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "BatterID": "P1", "bowling_type": "Pace", "n_balls": 150,
///     "mean_residual": 1.2, "std_residual": 0.4, "se": 0.1, "t_stat": 12.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<BatterTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

pub fn read_json(text: &str) -> Result<BatterTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<&Map<String, JsonValue>>>>()?;

    // A column exists when at least one record carries the key.
    let keys: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|c| objects.iter().any(|o| o.contains_key(*c)))
        .collect();
    ColumnIndex::resolve(&keys)?;

    let rows = objects
        .into_iter()
        .map(|obj| RawRow {
            batter_id: json_text(obj.get("BatterID")),
            bowling_type: json_text(obj.get("bowling_type")),
            n_balls: json_number(obj.get("n_balls")),
            mean_residual: json_number(obj.get("mean_residual")),
            std_residual: json_number(obj.get("std_residual")),
            se: json_number(obj.get("se")),
            t_stat: json_number(obj.get("t_stat")),
        })
        .collect();

    Ok(finish(rows))
}

fn json_text(val: Option<&JsonValue>) -> Option<String> {
    match val? {
        JsonValue::String(s) => parse_text(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_number(val: Option<&JsonValue>) -> Option<f64> {
    match val? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Load the [`RESULTS_SHEET`] worksheet of an Excel workbook.
///
/// Cells go through the same coercion as CSV text: numbers stay numbers,
/// text is parsed, and error or empty cells are missing.
fn load_excel(path: &Path) -> Result<BatterTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range(RESULTS_SHEET)
        .map_err(|e| anyhow!("reading sheet '{RESULTS_SHEET}': {e}"))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .map(|row| row.iter().map(|c| cell_text(Some(c)).unwrap_or_default()).collect())
        .unwrap_or_default();
    let idx = ColumnIndex::resolve(&headers)?;

    let rows = sheet_rows
        .map(|row| {
            let cell = |i: usize| row.get(i);
            RawRow {
                batter_id: cell_text(cell(idx.batter_id)),
                bowling_type: cell_text(cell(idx.bowling_type)),
                n_balls: cell_number(cell(idx.n_balls)),
                mean_residual: cell_number(cell(idx.mean_residual)),
                std_residual: cell_number(cell(idx.std_residual)),
                se: cell_number(cell(idx.se)),
                t_stat: cell_number(cell(idx.t_stat)),
            }
        })
        .collect();

    Ok(finish(rows))
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::String(s) => parse_text(s),
        // Whole-number ids are stored as floats; keep them as `17`, not `17.0`.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn cell_number(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Columns are cast with Arrow's safe casting, so text that does not parse
/// as a number becomes null rather than failing the whole file.
fn load_parquet(path: &Path) -> Result<BatterTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let idx = ColumnIndex::resolve(&names)?;

        let batter_id = text_column(batch.column(idx.batter_id))?;
        let bowling_type = text_column(batch.column(idx.bowling_type))?;
        let n_balls = numeric_column(batch.column(idx.n_balls))?;
        let mean_residual = numeric_column(batch.column(idx.mean_residual))?;
        let std_residual = numeric_column(batch.column(idx.std_residual))?;
        let se = numeric_column(batch.column(idx.se))?;
        let t_stat = numeric_column(batch.column(idx.t_stat))?;

        for row in 0..batch.num_rows() {
            rows.push(RawRow {
                batter_id: batter_id[row].as_deref().and_then(parse_text),
                bowling_type: bowling_type[row].as_deref().and_then(parse_text),
                n_balls: n_balls[row],
                mean_residual: mean_residual[row],
                std_residual: std_residual[row],
                se: se[row],
                t_stat: t_stat[row],
            });
        }
    }

    if rows.is_empty() {
        // No batches means no schema was checked; verify it from metadata.
        let file = std::fs::File::open(path).context("opening parquet file")?;
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
        let names: Vec<&str> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        ColumnIndex::resolve(&names)?;
    }

    Ok(finish(rows))
}

// -- Arrow helpers --

fn text_column(col: &ArrayRef) -> Result<Vec<Option<String>>> {
    let text = cast(col, &DataType::Utf8)
        .with_context(|| format!("casting {:?} column to text", col.data_type()))?;
    Ok(text
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn numeric_column(col: &ArrayRef) -> Result<Vec<Option<f64>>> {
    if matches!(col.data_type(), DataType::Boolean) {
        bail!("expected a numeric column, got Boolean");
    }
    let floats = cast(col, &DataType::Float64)
        .with_context(|| format!("casting {:?} column to Float64", col.data_type()))?;
    Ok(floats.as_primitive::<Float64Type>().iter().collect())
}
