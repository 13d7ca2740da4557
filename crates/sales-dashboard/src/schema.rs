//! Which dashboard sections a dataset can support

use crate::record::{Column, Dataset};

/// Column availability, computed once after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub revenue: bool,
    pub discount: bool,
    pub category: bool,
    pub location: bool,
    pub product_quantity: bool,
    pub payment_method: bool,
}

/// A dashboard section and the columns it reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    YearlyTotals,
    TopCategories,
    LocationRevenue,
    TopProducts,
    PaymentMethods,
    MonthlyTrend,
}

impl Section {
    pub fn required_columns(self) -> &'static [Column] {
        match self {
            Section::YearlyTotals | Section::MonthlyTrend => &[Column::TotalAmount],
            Section::TopCategories => &[Column::ProductCategory, Column::TotalAmount],
            Section::LocationRevenue => &[Column::StoreLocation, Column::TotalAmount],
            Section::TopProducts => &[Column::ProductId, Column::Quantity],
            Section::PaymentMethods => &[Column::PaymentMethod],
        }
    }
}

impl Capabilities {
    pub fn of(dataset: &Dataset) -> Self {
        let has = |c| dataset.has_column(c);
        Self {
            revenue: has(Column::TotalAmount),
            discount: has(Column::DiscountApplied),
            category: has(Column::ProductCategory),
            location: has(Column::StoreLocation),
            product_quantity: has(Column::ProductId) && has(Column::Quantity),
            payment_method: has(Column::PaymentMethod),
        }
    }

    /// Whether every column the section reads is present
    pub fn supports(&self, section: Section) -> bool {
        match section {
            Section::YearlyTotals | Section::MonthlyTrend => self.revenue,
            Section::TopCategories => self.category && self.revenue,
            Section::LocationRevenue => self.location && self.revenue,
            Section::TopProducts => self.product_quantity,
            Section::PaymentMethods => self.payment_method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::sample_dataset;
    use crate::record::Layout;

    #[test]
    fn test_sample_supports_every_section() {
        let caps = Capabilities::of(&sample_dataset());
        for section in [
            Section::YearlyTotals,
            Section::TopCategories,
            Section::LocationRevenue,
            Section::TopProducts,
            Section::PaymentMethods,
            Section::MonthlyTrend,
        ] {
            assert!(caps.supports(section), "{:?}", section);
        }
    }

    #[test]
    fn test_missing_total_amount_disables_revenue_sections() {
        let dataset = Dataset {
            columns: vec![Column::ProductCategory, Column::StoreLocation, Column::PaymentMethod],
            records: Vec::new(),
            layout: Layout::Headered,
        };
        let caps = Capabilities::of(&dataset);
        assert!(!caps.supports(Section::YearlyTotals));
        assert!(!caps.supports(Section::TopCategories));
        assert!(!caps.supports(Section::LocationRevenue));
        assert!(!caps.supports(Section::MonthlyTrend));
        assert!(!caps.supports(Section::TopProducts));
        assert!(caps.supports(Section::PaymentMethods));
    }

    #[test]
    fn test_required_columns_match_support() {
        let dataset = Dataset {
            columns: vec![Column::ProductId],
            records: Vec::new(),
            layout: Layout::Headered,
        };
        let caps = Capabilities::of(&dataset);
        let all_present = Section::TopProducts
            .required_columns()
            .iter()
            .all(|c| dataset.has_column(*c));
        assert_eq!(caps.supports(Section::TopProducts), all_present);
    }
}
