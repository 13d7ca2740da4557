//! Column normalization: derived Year/Month/Month_Num and text cleanup

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::constants;
use crate::record::{Column, Dataset, Period};

/// Date-time layouts tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts tried in order (midnight is assumed)
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y", "%d-%b-%Y"];

/// Populate derived columns and trim categorical text.
///
/// With a TransactionDate column each row gets its own period, or none when
/// its date does not parse. Without one, every row gets the fixed default.
pub fn normalize(mut dataset: Dataset) -> Dataset {
    let has_dates = dataset.has_column(Column::TransactionDate);
    let trim_categories = dataset.has_column(Column::ProductCategory);
    let trim_locations = dataset.has_column(Column::StoreLocation);

    let mut unparsed = 0usize;
    for record in &mut dataset.records {
        if has_dates {
            record.parsed_date = record.transaction_date.as_deref().and_then(parse_datetime);
            record.period = record.parsed_date.as_ref().map(Period::from_datetime);
            if record.period.is_none() {
                unparsed += 1;
            }
        } else {
            record.period = Some(default_period());
        }

        if trim_categories {
            trim_in_place(&mut record.product_category);
        }
        if trim_locations {
            trim_in_place(&mut record.store_location);
        }
    }

    if unparsed > 0 {
        tracing::debug!("{} rows have no usable transaction date", unparsed);
    }

    dataset
}

/// Period used for every row of a dataset without dates
pub fn default_period() -> Period {
    Period {
        year: constants::DEFAULT_YEAR,
        month_num: constants::DEFAULT_MONTH_NUM,
        month: constants::DEFAULT_MONTH.to_string(),
    }
}

/// Permissive date/time parser; unknown layouts yield None
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn trim_in_place(value: &mut Option<String>) {
    if let Some(text) = value {
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            *text = trimmed.to_owned();
        }
    }
}
