//! Uploaded tables and the hands-on pivot validator.
//!
//! The validator looks for a date column and a sales column, coerces both,
//! and sums sales per calendar month. It never returns an error: every
//! failure is folded into a `Validation` with `ok == false`.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::TableError;

/// Number of rows kept in an upload preview.
pub const PREVIEW_ROWS: usize = 50;

const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

const DATE_KEYWORDS: [&str; 1] = ["date"];
const SALES_KEYWORDS: [&str; 3] = ["sales", "amount", "revenue"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

// Month-first layouts go before year-first ones, otherwise "3/7/24" would
// parse as year 3. Two-digit years go before four-digit ones.
const DATE_FORMATS: [&str; 8] = [
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// A rectangular table of string cells with a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a CSV with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(TableError::MissingHeader);
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Read a CSV file from disk.
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Read the first worksheet of a spreadsheet. Its first row is the header.
    ///
    /// The workbook format is detected from the content, not the extension.
    pub fn from_xlsx_path(path: &Path) -> Result<Self, TableError> {
        let bytes = std::fs::read(path)?;
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(TableError::NoWorksheet)??;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(spreadsheet_cell).collect::<Vec<String>>());
        let headers: Vec<String> = rows.next().ok_or(TableError::MissingHeader)?;
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(TableError::MissingHeader);
        }

        Ok(Self {
            headers,
            rows: rows.collect(),
        })
    }

    /// Read a spreadsheet or a CSV, chosen by file extension.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let is_spreadsheet = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_lowercase().as_str()));
        if is_spreadsheet {
            Self::from_xlsx_path(path)
        } else {
            Self::from_csv_path(path)
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row must have exactly one cell per header.
    fn ensure_rectangular(&self) -> Result<(), TableError> {
        let expected = self.headers.len();
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(TableError::RaggedRow {
                    row: i + 1,
                    expected,
                    found: row.len(),
                });
            }
        }
        Ok(())
    }

    /// The first `limit` rows as header → value maps.
    ///
    /// Numeric cells become JSON numbers and blank cells become `null`.
    pub fn preview(&self, limit: usize) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row.iter())
                    .map(|(h, cell)| (h.clone(), cell_value(cell)))
                    .collect()
            })
            .collect()
    }

    fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// Render a spreadsheet cell as the text a CSV export would hold.
fn spreadsheet_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        #[allow(unreachable_patterns)]
        _ => String::new(),
    }
}

fn cell_value(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = parse_number(cell).and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}

/// Summed sales for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// First day of the month.
    #[serde(with = "year_month")]
    pub month: NaiveDate,
    pub total: f64,
}

/// Monthly totals in chronological order.
pub type MonthlyAggregate = Vec<MonthlyTotal>;

/// Result of validating an uploaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub ok: bool,
    pub note: String,
    pub monthly: Option<MonthlyAggregate>,
}

impl Validation {
    fn failed(note: impl Into<String>) -> Self {
        Self {
            ok: false,
            note: note.into(),
            monthly: None,
        }
    }
}

/// Check that a table can back a monthly sales chart.
pub fn validate(table: &Table) -> Validation {
    let validation = match try_validate(table) {
        Ok(v) => v,
        Err(e) => Validation::failed(format!("Pivot validation error: {e}")),
    };
    if validation.ok {
        tracing::debug!(note = %validation.note, "table validated");
    } else {
        tracing::warn!(note = %validation.note, "table validation failed");
    }
    validation
}

fn try_validate(table: &Table) -> Result<Validation, TableError> {
    table.ensure_rectangular()?;

    let date_col = find_column(table.headers(), &DATE_KEYWORDS);
    let sales_col = find_column(table.headers(), &SALES_KEYWORDS);

    let (date_col, sales_col) = match (date_col, sales_col) {
        (Some(d), Some(s)) => (d, s),
        (d, s) => {
            let describe = |label: &str, col: Option<usize>| match col {
                Some(i) => format!("{label}_col={}", table.headers()[i]),
                None => format!("{label}_col=missing"),
            };
            return Ok(Validation::failed(format!(
                "Missing columns: {}, {}",
                describe("date", d),
                describe("sales", s)
            )));
        }
    };

    let dates: Vec<Option<NaiveDate>> = table.column(date_col).map(parse_date).collect();
    if dates.iter().all(Option::is_none) {
        return Ok(Validation::failed("All date values could not be parsed."));
    }
    let sales: Vec<Option<f64>> = table.column(sales_col).map(parse_number).collect();

    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, amount) in dates.iter().zip(sales.iter()) {
        let Some(date) = date else { continue };
        *by_month.entry(month_start(*date)).or_insert(0.0) += amount.unwrap_or(0.0);
    }

    let monthly: MonthlyAggregate = by_month
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect();

    let first = monthly
        .first()
        .map(|m| m.total.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    Ok(Validation {
        ok: true,
        note: format!(
            "Pivot OK: found {} months; sample total for first month: {first}",
            monthly.len()
        ),
        monthly: Some(monthly),
    })
}

/// Index of the first header containing any keyword, ignoring case.
///
/// Both roles may land on the same column, e.g. a lone "SalesDate".
fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        keywords.iter().any(|k| h.contains(k))
    })
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse a date cell in any of the accepted layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    parse_year_month(s)
}

/// Bare year-month with a four-digit year, e.g. "2024-03".
fn parse_year_month(s: &str) -> Option<NaiveDate> {
    let (year, month) = s.split_once('-')?;
    let digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || !(1..=2).contains(&month.len()) || !digits(year) || !digits(month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Parse a numeric cell; non-finite values count as missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

mod year_month {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
            .map_err(serde::de::Error::custom)
    }
}
