//! Raw export parser with encoding and delimiter auto-detection.
//!
//! Converts an assessment export into loosely typed records (one JSON object
//! per row, keyed by column header). Nothing here knows about schools or
//! scores: the [`crate::normalize`] module validates records field by field.
//!
//! Three shapes are accepted:
//!
//! - delimited text (`;`, `,`, tab or `|`), in UTF-8, ISO-8859-1 or Windows-1252
//! - a JSON array of objects, as produced by spreadsheet-to-JSON exporters
//! - an `.xlsx` workbook, read from its first sheet

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use serde_json::{Map, Number, Value};

use crate::error::{InputError, InputResult};

/// One untyped input row.
pub type RawRecord = Map<String, Value>;

/// Reported as the encoding of workbook input.
pub const WORKBOOK_ENCODING: &str = "xlsx";

/// Zip local file header, the first bytes of any `.xlsx`.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows
    pub records: Vec<RawRecord>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter (`None` for JSON and workbook input)
    pub delimiter: Option<char>,
    /// Column headers, in file order
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> InputResult<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => String::from_utf8_lossy(bytes).to_string(),
    };
    if content.contains('\u{FFFD}') && content.chars().all(|c| c == '\u{FFFD}' || c.is_whitespace()) {
        return Err(InputError::Encoding(format!("no readable text as {}", encoding)));
    }
    Ok(content)
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text into records with an explicit delimiter.
///
/// # Example
/// ```ignore
/// use schoolreport::parser::parse_delimited;
///
/// let csv = "SchoolName;Grade\nGPS Banar (101);6";
/// let result = parse_delimited(csv, ';').unwrap();
///
/// assert_eq!(result.records.len(), 1);
/// assert_eq!(result.records[0]["Grade"], "6");
/// ```
pub fn parse_delimited(content: &str, delimiter: char) -> InputResult<ParseResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| InputError::Csv { line: 1, message: e.to_string() })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(InputError::NoHeaders);
    }

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let line = idx + 2; // +1 for 0-index, +1 for header
        let row = row.map_err(|e| InputError::Csv { line, message: e.to_string() })?;

        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let raw_value = row.get(i).unwrap_or("");
            obj.insert(header.clone(), Value::String(raw_value.to_string()));
        }
        records.push(obj);
    }

    Ok(ParseResult {
        records,
        encoding: "utf-8".to_string(),
        delimiter: Some(delimiter),
        headers,
    })
}

/// Parse a JSON array of row objects.
///
/// Non-object array items are ignored; headers are the union of keys,
/// row by row.
pub fn parse_json_rows(content: &str) -> InputResult<ParseResult> {
    let value: Value = serde_json::from_str(content)?;
    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(InputError::Encoding(
                "JSON export must be an array of row objects".to_string(),
            ))
        }
    };

    let mut headers: Vec<String> = Vec::new();
    let mut records = Vec::new();
    for item in items {
        if let Value::Object(obj) = item {
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
            records.push(obj);
        }
    }

    Ok(ParseResult {
        records,
        encoding: "utf-8".to_string(),
        delimiter: None,
        headers,
    })
}

/// Parse the first sheet of an `.xlsx` workbook.
///
/// The first row holds the headers. Empty cells are left out of a record
/// and fully empty rows are skipped, so a record only carries the columns
/// that have a value.
pub fn parse_xlsx(bytes: &[u8]) -> InputResult<ParseResult> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| InputError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InputError::Workbook("workbook has no sheets".to_string()))?
        .map_err(|e| InputError::Workbook(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(InputError::NoHeaders)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(InputError::NoHeaders);
    }

    let records = rows
        .filter_map(|row| {
            let record: RawRecord = headers
                .iter()
                .zip(row)
                .filter(|(header, _)| !header.is_empty())
                .filter_map(|(header, cell)| cell_value(cell).map(|v| (header.clone(), v)))
                .collect();
            (!record.is_empty()).then_some(record)
        })
        .collect();

    Ok(ParseResult {
        records,
        encoding: WORKBOOK_ENCODING.to_string(),
        delimiter: None,
        headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
    })
}

/// Workbook cell as JSON. Whole floats become integers; empty and error
/// cells have no value.
fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(Value::from(*f as i64)),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64()).map(Value::Number),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

/// Parse bytes with auto-detection of format, encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> InputResult<ParseResult> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(InputError::Empty);
    }
    if bytes.starts_with(ZIP_MAGIC) {
        let result = parse_xlsx(bytes)?;
        if result.records.is_empty() {
            return Err(InputError::Empty);
        }
        return Ok(result);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;

    let mut result = if content.trim_start().starts_with('[') {
        parse_json_rows(&content)?
    } else {
        let delimiter = detect_delimiter(&content);
        parse_delimited(&content, delimiter)?
    };
    result.encoding = encoding;

    if result.records.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(result)
}

/// Parse an export file with auto-detection.
///
/// # Example
/// ```ignore
/// let result = parse_file_auto("Schoolwise_Skill_Scores.xlsx")?;
/// println!("Encoding: {}, rows: {}", result.encoding, result.records.len());
/// ```
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> InputResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}
