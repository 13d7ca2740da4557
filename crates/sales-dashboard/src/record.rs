//! Transaction records and the dataset that owns them

use chrono::{Datelike, NaiveDateTime};

/// Known input columns, in the fixed positional order used for headerless files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    CustomerId,
    ProductId,
    Quantity,
    Price,
    TransactionDate,
    PaymentMethod,
    StoreLocation,
    ProductCategory,
    DiscountApplied,
    TotalAmount,
}

impl Column {
    /// Positional layout of a headerless upload
    pub const POSITIONAL: [Column; 10] = [
        Column::CustomerId,
        Column::ProductId,
        Column::Quantity,
        Column::Price,
        Column::TransactionDate,
        Column::PaymentMethod,
        Column::StoreLocation,
        Column::ProductCategory,
        Column::DiscountApplied,
        Column::TotalAmount,
    ];

    /// Canonical header name
    pub fn header(self) -> &'static str {
        match self {
            Column::CustomerId => "CustomerID",
            Column::ProductId => "ProductID",
            Column::Quantity => "Quantity",
            Column::Price => "Price",
            Column::TransactionDate => "TransactionDate",
            Column::PaymentMethod => "PaymentMethod",
            Column::StoreLocation => "StoreLocation",
            Column::ProductCategory => "ProductCategory",
            Column::DiscountApplied => "DiscountApplied(%)",
            Column::TotalAmount => "TotalAmount",
        }
    }

    /// Match a header cell against the known columns
    pub fn from_header(name: &str) -> Option<Column> {
        match name.trim() {
            "CustomerID" => Some(Column::CustomerId),
            "ProductID" => Some(Column::ProductId),
            "Quantity" => Some(Column::Quantity),
            "Price" => Some(Column::Price),
            "TransactionDate" => Some(Column::TransactionDate),
            "PaymentMethod" => Some(Column::PaymentMethod),
            "StoreLocation" => Some(Column::StoreLocation),
            "ProductCategory" => Some(Column::ProductCategory),
            "DiscountApplied(%)" | "DiscountApplied%" | "DiscountApplied" => Some(Column::DiscountApplied),
            "TotalAmount" => Some(Column::TotalAmount),
            _ => None,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// Year and month derived from a transaction date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub year: i32,
    /// 1-12
    pub month_num: u32,
    /// Abbreviated English name ("Jan")
    pub month: String,
}

impl Period {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month_num: dt.month(),
            month: dt.format("%b").to_string(),
        }
    }
}

/// One transaction row. Every input field is optional because uploads may
/// omit columns or carry blank cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    /// Raw date text as loaded
    pub transaction_date: Option<String>,
    pub payment_method: Option<String>,
    pub store_location: Option<String>,
    pub product_category: Option<String>,
    pub discount_percent: Option<f64>,
    pub total_amount: Option<f64>,

    /// Parsed date (set by the normalizer)
    pub parsed_date: Option<NaiveDateTime>,
    /// Year / Month / Month_Num (set by the normalizer)
    pub period: Option<Period>,
}

impl Transaction {
    pub fn year(&self) -> Option<i32> {
        self.period.as_ref().map(|p| p.year)
    }

    pub fn month(&self) -> Option<&str> {
        self.period.as_ref().map(|p| p.month.as_str())
    }

    pub fn month_num(&self) -> Option<u32> {
        self.period.as_ref().map(|p| p.month_num)
    }

    /// Display text of a raw column value ("" when missing)
    pub fn cell(&self, column: Column) -> String {
        fn text(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        fn number(v: Option<f64>) -> String {
            v.map(|n| n.to_string()).unwrap_or_default()
        }

        match column {
            Column::CustomerId => text(&self.customer_id),
            Column::ProductId => text(&self.product_id),
            Column::Quantity => self.quantity.map(|q| q.to_string()).unwrap_or_default(),
            Column::Price => number(self.price),
            Column::TransactionDate => match &self.parsed_date {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => text(&self.transaction_date),
            },
            Column::PaymentMethod => text(&self.payment_method),
            Column::StoreLocation => text(&self.store_location),
            Column::ProductCategory => text(&self.product_category),
            Column::DiscountApplied => number(self.discount_percent),
            Column::TotalAmount => number(self.total_amount),
        }
    }
}

/// How the dataset was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Generated sample data
    Sample,
    /// Upload read with its own header row
    Headered,
    /// Upload read with the fixed 10-column layout
    Positional,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Sample => write!(f, "sample data"),
            Layout::Headered => write!(f, "CSV with header"),
            Layout::Positional => write!(f, "CSV without header (fixed columns)"),
        }
    }
}

/// Ordered collection of transactions sharing one set of columns
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Columns present in the input, in input order
    pub columns: Vec<Column>,
    pub records: Vec<Transaction>,
    pub layout: Layout,
}

impl Dataset {
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// View over every record
    pub fn view(&self) -> View<'_> {
        View {
            records: self.records.iter().collect(),
        }
    }
}

/// Borrowed subset of a dataset (filtered view, year-filtered base, ...)
#[derive(Debug, Clone, Default)]
pub struct View<'a> {
    records: Vec<&'a Transaction>,
}

impl<'a> View<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.records.iter().copied()
    }

    /// Keep only records matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> View<'a>
    where
        F: Fn(&Transaction) -> bool,
    {
        View {
            records: self.records.iter().copied().filter(|t| predicate(t)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> FromIterator<&'a Transaction> for View<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Transaction>>(iter: I) -> Self {
        View {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_header_round_trip_for_every_column() {
        for column in Column::POSITIONAL {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
    }

    #[test]
    fn test_discount_header_aliases() {
        assert_eq!(Column::from_header("DiscountApplied%"), Some(Column::DiscountApplied));
        assert_eq!(Column::from_header(" DiscountApplied "), Some(Column::DiscountApplied));
        assert_eq!(Column::from_header("Discount"), None);
    }

    #[test]
    fn test_period_from_datetime() {
        let dt = NaiveDate::from_ymd_opt(2023, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let period = Period::from_datetime(&dt);
        assert_eq!(period.year, 2023);
        assert_eq!(period.month_num, 3);
        assert_eq!(period.month, "Mar");
    }

    #[test]
    fn test_view_filter_keeps_order() {
        let records: Vec<Transaction> = (0..5)
            .map(|i| Transaction {
                quantity: Some(i),
                ..Default::default()
            })
            .collect();
        let dataset = Dataset {
            columns: vec![Column::Quantity],
            records,
            layout: Layout::Headered,
        };

        let odd = dataset.view().filter(|t| t.quantity.is_some_and(|q| q % 2 == 1));
        let quantities: Vec<_> = odd.iter().filter_map(|t| t.quantity).collect();
        assert_eq!(quantities, vec![1, 3]);
    }
}
