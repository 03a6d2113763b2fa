use crate::domain::model::Transaction;
use crate::domain::ports::{ParseError, RecordParser};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};

const SENDER_COLUMNS: &[&str] = &["sender_id", "from", "sender", "source"];
const RECEIVER_COLUMNS: &[&str] = &["receiver_id", "to", "receiver", "target"];
const AMOUNT_COLUMNS: &[&str] = &["amount"];
const ID_COLUMNS: &[&str] = &["transaction_id", "id"];
const TIMESTAMP_COLUMNS: &[&str] = &["timestamp", "date"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reads transactions from CSV text with a header row.
///
/// Sender, receiver and amount columns are required; common aliases such as
/// `from`/`to` are accepted. Transaction ids default to `TX-<row>`.
#[derive(Debug, Clone, Default)]
pub struct CsvTransactionParser;

impl CsvTransactionParser {
    pub fn new() -> Self {
        Self
    }
}

impl RecordParser for CsvTransactionParser {
    fn parse_records(&self, text: &str) -> Result<Vec<Transaction>, ParseError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ParseError::new(e.to_string()))?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Ok(Vec::new());
        }

        let layout = ColumnLayout::from_headers(&headers)?;

        let mut transactions = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| ParseError::new(e.to_string()))?;
            transactions.push(layout.read_row(&row, index + 1)?);
        }

        tracing::debug!(rows = transactions.len(), "parsed CSV transactions");
        Ok(transactions)
    }
}

struct ColumnLayout {
    sender: usize,
    receiver: usize,
    amount: usize,
    transaction_id: Option<usize>,
    timestamp: Option<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self, ParseError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();

        let find = |aliases: &[&str]| {
            names
                .iter()
                .position(|n| aliases.iter().any(|alias| *alias == n.as_str()))
        };
        let require = |aliases: &[&str]| {
            find(aliases).ok_or_else(|| {
                ParseError::new(format!("missing required column '{}'", aliases[0]))
            })
        };

        Ok(Self {
            sender: require(SENDER_COLUMNS)?,
            receiver: require(RECEIVER_COLUMNS)?,
            amount: require(AMOUNT_COLUMNS)?,
            transaction_id: find(ID_COLUMNS),
            timestamp: find(TIMESTAMP_COLUMNS),
        })
    }

    fn read_row(&self, row: &StringRecord, row_number: usize) -> Result<Transaction, ParseError> {
        let field = |index: usize| row.get(index).unwrap_or("");

        let sender_id = non_empty(field(self.sender), "sender_id", row_number)?;
        let receiver_id = non_empty(field(self.receiver), "receiver_id", row_number)?;
        let amount = parse_amount(field(self.amount), row_number)?;

        let transaction_id = self
            .transaction_id
            .map(field)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("TX-{}", row_number));

        let timestamp = match self.timestamp.map(field) {
            Some(raw) if !raw.is_empty() => Some(parse_timestamp(raw, row_number)?),
            _ => None,
        };

        Ok(Transaction {
            transaction_id,
            sender_id,
            receiver_id,
            amount,
            timestamp,
        })
    }
}

fn non_empty(value: &str, column: &str, row_number: usize) -> Result<String, ParseError> {
    if value.is_empty() {
        return Err(ParseError::new(format!(
            "row {}: {} is empty",
            row_number, column
        )));
    }
    Ok(value.to_string())
}

fn parse_amount(raw: &str, row_number: usize) -> Result<f64, ParseError> {
    let amount: f64 = raw.parse().map_err(|_| {
        ParseError::new(format!(
            "row {}: amount '{}' is not a number",
            row_number, raw
        ))
    })?;

    if !amount.is_finite() {
        return Err(ParseError::new(format!(
            "row {}: amount '{}' is not finite",
            row_number, raw
        )));
    }
    if amount < 0.0 {
        return Err(ParseError::new(format!(
            "row {}: amount '{}' is negative",
            row_number, raw
        )));
    }

    Ok(amount)
}

fn parse_timestamp(raw: &str, row_number: usize) -> Result<NaiveDateTime, ParseError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            ParseError::new(format!(
                "row {}: unrecognised timestamp '{}'",
                row_number, raw
            ))
        })
}
