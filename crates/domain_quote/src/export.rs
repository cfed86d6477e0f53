//! CSV export of the quote ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::QuoteId;
use crate::error::QuoteError;
use crate::quote::{Quote, QuoteStatus};

/// Column headers, in output order
pub const CSV_HEADERS: [&str; 8] = [
    "ID", "Client", "Product", "Amount", "Status", "Created", "Expiry", "Agent",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One exported ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Created")]
    pub created: String,
    #[serde(rename = "Expiry")]
    pub expiry: String,
    #[serde(rename = "Agent")]
    pub agent: String,
}

impl ExportRow {
    pub fn from_quote(quote: &Quote) -> Self {
        Self {
            id: quote.id.to_string(),
            client: quote.client_name.clone(),
            product: quote.product.clone(),
            amount: quote.amount.round_to_currency().amount().to_string(),
            status: quote.status.to_string(),
            created: quote.created_at.format(DATE_FORMAT).to_string(),
            expiry: quote.expires_at.format(DATE_FORMAT).to_string(),
            agent: quote.agent.clone(),
        }
    }

    pub fn quote_id(&self) -> Result<QuoteId, QuoteError> {
        self.id
            .parse()
            .map_err(|err: core_kernel::ParseQuoteIdError| QuoteError::Export(err.to_string()))
    }

    pub fn amount(&self) -> Result<Decimal, QuoteError> {
        self.amount
            .parse()
            .map_err(|_| QuoteError::Export(format!("invalid amount: {}", self.amount)))
    }

    pub fn status(&self) -> Result<QuoteStatus, QuoteError> {
        self.status.parse()
    }
}

/// Writes quotes as CSV with a header row, preserving their order
pub fn write_csv(quotes: &[Quote]) -> Result<String, QuoteError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for quote in quotes {
        writer.serialize(ExportRow::from_quote(quote))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| QuoteError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| QuoteError::Export(err.to_string()))
}

/// Reads rows previously produced by [`write_csv`]
pub fn read_csv(input: &str) -> Result<Vec<ExportRow>, QuoteError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?;
    if headers.iter().ne(CSV_HEADERS.iter().copied()) {
        return Err(QuoteError::Export(format!(
            "unexpected headers: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    reader
        .deserialize()
        .map(|row| row.map_err(QuoteError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger_still_has_headers() {
        let csv = write_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "ID,Client,Product,Amount,Status,Created,Expiry,Agent");
        assert!(read_csv(&csv).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_headers_are_rejected() {
        let result = read_csv("Id,Name\nQT-00001,Jane\n");
        assert!(matches!(result, Err(QuoteError::Export(_))));
    }
}
