//! Centralized constants for the sales dashboard
//!
//! Values here are fixed by the dataset contract. Anything a user may want to
//! tune (top-N sizes, parsing characters, labels) is loaded from dashboard.toml.

// =============================================================================
// Derived Column Defaults
// Applied to every row when the dataset has no TransactionDate column
// =============================================================================

/// Year assigned when no date column exists
pub const DEFAULT_YEAR: i32 = 2023;

/// Month number assigned when no date column exists
pub const DEFAULT_MONTH_NUM: u32 = 1;

/// Abbreviated month name assigned when no date column exists
pub const DEFAULT_MONTH: &str = "Jan";

// =============================================================================
// Sample Dataset
// Rows cycle through these tables by `row % SAMPLE_CYCLE`
// =============================================================================

/// Number of generated sample rows
pub const SAMPLE_ROWS: usize = 100;

/// First sample transaction date (Sunday 2023-01-01)
pub const SAMPLE_START_YEAR: i32 = 2023;
pub const SAMPLE_START_MONTH: u32 = 1;
pub const SAMPLE_START_DAY: u32 = 1;

/// Days between consecutive sample transactions
pub const SAMPLE_INTERVAL_DAYS: i64 = 7;

pub const SAMPLE_STORES: [&str; 4] = ["Jakarta", "Bandung", "Surabaya", "Medan"];
pub const SAMPLE_TOTALS: [f64; 4] = [25_000_000.0, 18_000_000.0, 22_000_000.0, 15_000_000.0];
pub const SAMPLE_CATEGORIES: [&str; 4] = ["Elektronik", "Fashion", "Elektronik", "Rumah Tangga"];
pub const SAMPLE_PRODUCTS: [&str; 4] = ["P001", "P002", "P003", "P004"];
pub const SAMPLE_QUANTITIES: [i64; 4] = [120, 80, 95, 70];
pub const SAMPLE_DISCOUNTS: [f64; 4] = [10.0, 5.0, 0.0, 15.0];
pub const SAMPLE_PAYMENTS: [&str; 4] = ["Cash", "Credit Card", "Cash", "E-Wallet"];

// =============================================================================
// Chart Defaults
// =============================================================================

/// Categories shown in the category leaderboard
pub const TOP_CATEGORIES: usize = 5;

/// Store locations shown in the revenue-by-location chart
pub const TOP_LOCATIONS: usize = 10;

/// Products shown in the best-seller chart
pub const TOP_PRODUCTS: usize = 5;

/// Rows shown in the dataset preview
pub const PREVIEW_ROWS: usize = 10;

/// Width of the longest console bar, in characters
pub const BAR_WIDTH: usize = 40;

// =============================================================================
// CSV Parsing
// =============================================================================

pub const DEFAULT_QUOTE: char = '"';
pub const DEFAULT_ESCAPE: char = '\\';

// =============================================================================
// Display
// =============================================================================

pub const DASHBOARD_TITLE: &str = "Business Intelligence Dashboard";
pub const DASHBOARD_SUBTITLE: &str = "Sales performance overview";
pub const CURRENCY_SYMBOL: &str = "$";

/// Placeholder for undefined metrics (mean of no rows, missing column)
pub const MISSING_VALUE: &str = "N/A";

/// Sentinel label for the "every year" option of the year control
pub const ALL_YEARS_LABEL: &str = "All years";

// =============================================================================
// File Names
// =============================================================================

/// Config file looked up in the working directory when --config is not given
pub const CONFIG_FILE: &str = "dashboard.toml";
