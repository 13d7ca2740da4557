//! Dataset loading: generated sample data or an uploaded CSV
//!
//! Uploads are read in two stages. The first treats the opening row as a
//! header; if that row cannot be used, the whole input is re-read as
//! headerless rows in the fixed 10-column layout. Rows with the wrong field
//! count (or undecodable bytes) are dropped in either stage.

use chrono::{Duration, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::path::Path;

use crate::config::Config;
use crate::constants;
use crate::error::LoadError;
use crate::record::{Column, Dataset, Layout, Transaction};

/// Where the current cycle gets its data from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Built-in sample data
    Sample,
    /// User-supplied CSV bytes
    Upload { name: String, bytes: Vec<u8> },
    /// No file picked and sample data switched off
    Nothing,
}

impl DataSource {
    /// Read an upload from disk
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(DataSource::Upload {
            name: path.display().to_string(),
            bytes,
        })
    }

    /// Pick the source from the control values: sample wins over an upload
    pub fn select(use_sample: bool, upload: Option<DataSource>) -> Self {
        if use_sample {
            DataSource::Sample
        } else {
            upload.unwrap_or(DataSource::Nothing)
        }
    }
}

/// Result of the load step of a render cycle
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Dataset),
    /// Nothing to load; the cycle stops after prompting the user
    AwaitingInput,
}

/// Load the dataset for one render cycle
pub fn load(source: &DataSource, config: &Config) -> Result<LoadOutcome, LoadError> {
    match source {
        DataSource::Sample => Ok(LoadOutcome::Loaded(sample_dataset())),
        DataSource::Upload { name, bytes } => {
            let dataset = parse_upload(bytes, config)?;
            tracing::info!(
                "loaded {} rows from {} as {}",
                dataset.len(),
                name,
                dataset.layout
            );
            Ok(LoadOutcome::Loaded(dataset))
        }
        DataSource::Nothing => Ok(LoadOutcome::AwaitingInput),
    }
}

// =============================================================================
// Sample Data
// =============================================================================

const SAMPLE_START: NaiveDate = match NaiveDate::from_ymd_opt(
    constants::SAMPLE_START_YEAR,
    constants::SAMPLE_START_MONTH,
    constants::SAMPLE_START_DAY,
) {
    Some(date) => date,
    None => panic!("invalid sample start date"),
};

/// Deterministic 100-row dataset cycling through four stores
pub fn sample_dataset() -> Dataset {
    let cycle = constants::SAMPLE_STORES.len();

    let records = (0..constants::SAMPLE_ROWS)
        .map(|i| {
            let k = i % cycle;
            let date = SAMPLE_START + Duration::days(constants::SAMPLE_INTERVAL_DAYS * i as i64);
            Transaction {
                store_location: Some(constants::SAMPLE_STORES[k].to_string()),
                total_amount: Some(constants::SAMPLE_TOTALS[k]),
                product_category: Some(constants::SAMPLE_CATEGORIES[k].to_string()),
                product_id: Some(constants::SAMPLE_PRODUCTS[k].to_string()),
                quantity: Some(constants::SAMPLE_QUANTITIES[k]),
                discount_percent: Some(constants::SAMPLE_DISCOUNTS[k]),
                payment_method: Some(constants::SAMPLE_PAYMENTS[k].to_string()),
                transaction_date: Some(date.format("%Y-%m-%d").to_string()),
                ..Default::default()
            }
        })
        .collect();

    Dataset {
        columns: vec![
            Column::StoreLocation,
            Column::TotalAmount,
            Column::ProductCategory,
            Column::ProductId,
            Column::Quantity,
            Column::DiscountApplied,
            Column::PaymentMethod,
            Column::TransactionDate,
        ],
        records,
        layout: Layout::Sample,
    }
}

// =============================================================================
// CSV Uploads
// =============================================================================

/// Parse uploaded CSV bytes: headered first, fixed layout as fallback
pub fn parse_upload(bytes: &[u8], config: &Config) -> Result<Dataset, LoadError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::Empty);
    }

    let header_failure = match read_headered(bytes, config) {
        Ok(dataset) => return Ok(dataset),
        Err(reason) => reason,
    };
    tracing::debug!("header stage failed ({}), retrying as fixed columns", header_failure);

    read_positional(bytes, config).map_err(|positional| LoadError::Unreadable {
        header: header_failure,
        positional,
    })
}

fn reader<'a>(bytes: &'a [u8], config: &Config) -> csv::Reader<&'a [u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote(config.quote)
        .double_quote(true)
        .escape(config.escape)
        .from_reader(bytes)
}

/// First stage: the opening row names the columns
fn read_headered(bytes: &[u8], config: &Config) -> Result<Dataset, String> {
    let mut rdr = reader(bytes, config);
    let mut rows = rdr.records();

    let header = match rows.next() {
        None => return Err("no header row".to_string()),
        Some(Err(e)) => return Err(format!("unreadable header: {}", e)),
        Some(Ok(header)) => header,
    };

    let mapping: Vec<Option<Column>> = header.iter().map(Column::from_header).collect();
    if mapping.iter().all(Option::is_none) {
        return Err("header names no known column".to_string());
    }

    let mut seen = HashSet::new();
    for column in mapping.iter().flatten() {
        if !seen.insert(*column) {
            return Err(format!("column {} appears twice", column));
        }
    }

    let records = collect_rows(rows, &mapping);
    Ok(Dataset {
        columns: mapping.into_iter().flatten().collect(),
        records,
        layout: Layout::Headered,
    })
}

/// Second stage: every row is data in the fixed positional layout
fn read_positional(bytes: &[u8], config: &Config) -> Result<Dataset, String> {
    let mut rdr = reader(bytes, config);
    let mapping: Vec<Option<Column>> = Column::POSITIONAL.iter().copied().map(Some).collect();

    let records = collect_rows(rdr.records(), &mapping);
    if records.is_empty() {
        return Err(format!("no row has {} fields", mapping.len()));
    }

    Ok(Dataset {
        columns: Column::POSITIONAL.to_vec(),
        records,
        layout: Layout::Positional,
    })
}

/// Build transactions from rows matching the expected width; others are skipped
fn collect_rows<I>(rows: I, mapping: &[Option<Column>]) -> Vec<Transaction>
where
    I: Iterator<Item = csv::Result<StringRecord>>,
{
    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        match row {
            Ok(row) if row.len() == mapping.len() => {
                let mut transaction = Transaction::default();
                for (column, value) in mapping.iter().zip(row.iter()) {
                    if let Some(column) = column {
                        set_field(&mut transaction, *column, value);
                    }
                }
                records.push(transaction);
            }
            Ok(row) => {
                tracing::trace!("skipping row {}: {} fields, expected {}", index, row.len(), mapping.len());
            }
            Err(e) => {
                tracing::trace!("skipping row {}: {}", index, e);
            }
        }
    }
    records
}

fn set_field(t: &mut Transaction, column: Column, raw: &str) {
    match column {
        Column::CustomerId => t.customer_id = text(raw),
        Column::ProductId => t.product_id = text(raw),
        Column::Quantity => t.quantity = integer(raw),
        Column::Price => t.price = number(raw),
        Column::TransactionDate => t.transaction_date = text(raw),
        Column::PaymentMethod => t.payment_method = text(raw),
        Column::StoreLocation => t.store_location = text(raw),
        Column::ProductCategory => t.product_category = text(raw),
        Column::DiscountApplied => t.discount_percent = number(raw),
        Column::TotalAmount => t.total_amount = number(raw),
    }
}

/// Blank cells are missing; other text is kept as-is
fn text(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Integers, also accepting integral decimals such as "3.0"
fn integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        number(raw)
            .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
            .map(|n| n as i64)
    })
}
