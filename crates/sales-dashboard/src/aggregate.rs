//! Aggregations behind the KPI row and every chart
//!
//! All functions are pure over a view. Grouping keeps keys in first-seen
//! order and ranking uses a stable sort, so equal totals stay in the order
//! their keys first appeared.

use std::collections::HashMap;

use crate::record::{Transaction, View};

/// One (key, metric) pair of an aggregation result
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub value: f64,
}

/// Headline numbers for the filtered view
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub transactions: usize,
    /// Sum of present TotalAmount values
    pub total_revenue: f64,
    /// Mean of present DiscountApplied(%) values; None when there are none
    pub average_discount: Option<f64>,
}

/// Yearly revenue bar
#[derive(Debug, Clone, PartialEq)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
}

/// Monthly trend point
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotal {
    pub month_num: u32,
    pub month: String,
    pub total: f64,
}

/// Payment method frequency
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentShare {
    pub method: String,
    pub count: usize,
}

pub fn kpi_summary(view: &View) -> KpiSummary {
    let total_revenue = view.iter().filter_map(|t| t.total_amount).sum();

    let discounts: Vec<f64> = view.iter().filter_map(|t| t.discount_percent).collect();
    let average_discount = if discounts.is_empty() {
        None
    } else {
        Some(discounts.iter().sum::<f64>() / discounts.len() as f64)
    };

    KpiSummary {
        transactions: view.len(),
        total_revenue,
        average_discount,
    }
}

/// Revenue per year, ascending by year. Callers pass the unfiltered dataset.
pub fn yearly_totals(view: &View) -> Vec<YearTotal> {
    let mut totals: HashMap<i32, f64> = HashMap::new();
    for t in view.iter() {
        if let (Some(year), Some(amount)) = (t.year(), t.total_amount) {
            *totals.entry(year).or_insert(0.0) += amount;
        }
    }

    let mut result: Vec<_> = totals
        .into_iter()
        .map(|(year, total)| YearTotal { year, total })
        .collect();
    result.sort_by_key(|y| y.year);
    result
}

/// Sum `metric` per `key`, keeping first-seen key order
pub fn group_sum<K, M>(view: &View, key: K, metric: M) -> Vec<Group>
where
    K: Fn(&Transaction) -> Option<&str>,
    M: Fn(&Transaction) -> Option<f64>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for t in view.iter() {
        let (Some(k), Some(v)) = (key(t), metric(t)) else {
            continue;
        };
        match index.get(k) {
            Some(&i) => groups[i].value += v,
            None => {
                index.insert(k.to_string(), groups.len());
                groups.push(Group {
                    key: k.to_string(),
                    value: v,
                });
            }
        }
    }
    groups
}

/// Largest `n` groups, descending; ties keep first-seen order
pub fn top_n(mut groups: Vec<Group>, n: usize) -> Vec<Group> {
    groups.sort_by(|a, b| b.value.total_cmp(&a.value));
    groups.truncate(n);
    groups
}

/// Revenue per product category
pub fn top_categories(view: &View, n: usize) -> Vec<Group> {
    top_n(
        group_sum(view, |t| t.product_category.as_deref(), |t| t.total_amount),
        n,
    )
}

/// Revenue per store location; `view` is already restricted by the location sub-filter
pub fn top_locations(view: &View, n: usize) -> Vec<Group> {
    top_n(
        group_sum(view, |t| t.store_location.as_deref(), |t| t.total_amount),
        n,
    )
}

/// Units sold per product
pub fn top_products(view: &View, n: usize) -> Vec<Group> {
    top_n(
        group_sum(view, |t| t.product_id.as_deref(), |t| t.quantity.map(|q| q as f64)),
        n,
    )
}

/// Row count per payment method, most frequent first
pub fn payment_distribution(view: &View) -> Vec<PaymentShare> {
    let counts = group_sum(view, |t| t.payment_method.as_deref(), |_| Some(1.0));
    top_n(counts, usize::MAX)
        .into_iter()
        .map(|g| PaymentShare {
            method: g.key,
            count: g.value as usize,
        })
        .collect()
}

/// Revenue per (Month_Num, Month), in calendar order
pub fn monthly_trend(view: &View) -> Vec<MonthTotal> {
    let mut index: HashMap<(u32, &str), usize> = HashMap::new();
    let mut result: Vec<MonthTotal> = Vec::new();

    for t in view.iter() {
        let (Some(period), Some(amount)) = (t.period.as_ref(), t.total_amount) else {
            continue;
        };
        let key = (period.month_num, period.month.as_str());
        match index.get(&key) {
            Some(&i) => result[i].total += amount,
            None => {
                index.insert(key, result.len());
                result.push(MonthTotal {
                    month_num: period.month_num,
                    month: period.month.clone(),
                    total: amount,
                });
            }
        }
    }

    result.sort_by(|a, b| a.month_num.cmp(&b.month_num).then_with(|| a.month.cmp(&b.month)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::sample_dataset;
    use crate::normalize::normalize;
    use crate::record::{Column, Dataset, Layout};

    fn sale(category: &str, amount: f64) -> Transaction {
        Transaction {
            product_category: Some(category.to_string()),
            total_amount: Some(amount),
            ..Default::default()
        }
    }

    fn dataset(columns: Vec<Column>, records: Vec<Transaction>) -> Dataset {
        normalize(Dataset {
            columns,
            records,
            layout: Layout::Headered,
        })
    }

    #[test]
    fn test_sample_total_revenue() {
        let dataset = normalize(sample_dataset());
        let kpi = kpi_summary(&dataset.view());
        assert_eq!(kpi.transactions, 100);
        assert_eq!(kpi.total_revenue, 2_000_000_000.0);
        assert_eq!(kpi.average_discount, Some(7.5));
    }

    #[test]
    fn test_kpi_on_empty_view() {
        let kpi = kpi_summary(&View::default());
        assert_eq!(kpi.transactions, 0);
        assert_eq!(kpi.total_revenue, 0.0);
        assert_eq!(kpi.average_discount, None);
    }

    #[test]
    fn test_top_five_of_seven_categories() {
        let records = vec![
            sale("A", 10.0),
            sale("B", 70.0),
            sale("C", 30.0),
            sale("D", 40.0),
            sale("E", 50.0),
            sale("F", 60.0),
            sale("G", 20.0),
            sale("A", 5.0),
        ];
        let dataset = dataset(vec![Column::ProductCategory, Column::TotalAmount], records);
        let top = top_categories(&dataset.view(), 5);

        assert_eq!(top.len(), 5);
        let keys: Vec<_> = top.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "F", "E", "D", "C"]);
        assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![sale("Z", 10.0), sale("A", 10.0), sale("M", 10.0)];
        let dataset = dataset(vec![Column::ProductCategory, Column::TotalAmount], records);
        let keys: Vec<_> = top_categories(&dataset.view(), 5)
            .into_iter()
            .map(|g| g.key)
            .collect();
        assert_eq!(keys, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_missing_keys_and_metrics_are_ignored() {
        let records = vec![
            sale("A", 10.0),
            Transaction {
                product_category: None,
                total_amount: Some(99.0),
                ..Default::default()
            },
            Transaction {
                product_category: Some("A".to_string()),
                total_amount: None,
                ..Default::default()
            },
        ];
        let dataset = dataset(vec![Column::ProductCategory, Column::TotalAmount], records);
        let top = top_categories(&dataset.view(), 5);
        assert_eq!(
            top,
            vec![Group {
                key: "A".to_string(),
                value: 10.0
            }]
        );
    }

    #[test]
    fn test_sample_locations_and_products() {
        let dataset = normalize(sample_dataset());
        let view = dataset.view();

        let locations = top_locations(&view, 10);
        let keys: Vec<_> = locations.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Jakarta", "Surabaya", "Bandung", "Medan"]);
        assert_eq!(locations[0].value, 625_000_000.0);

        let products = top_products(&view, 5);
        assert_eq!(products[0].key, "P001");
        assert_eq!(products[0].value, 3000.0);
        assert_eq!(products.len(), 4);
    }

    #[test]
    fn test_yearly_totals_ascending() {
        let dataset = normalize(sample_dataset());
        let totals = yearly_totals(&dataset.view());
        assert_eq!(totals.iter().map(|y| y.year).collect::<Vec<_>>(), vec![2023, 2024]);
        let sum: f64 = totals.iter().map(|y| y.total).sum();
        assert_eq!(sum, 2_000_000_000.0);
    }

    #[test]
    fn test_payment_distribution_counts() {
        let dataset = normalize(sample_dataset());
        let shares = payment_distribution(&dataset.view());
        assert_eq!(
            shares,
            vec![
                PaymentShare {
                    method: "Cash".to_string(),
                    count: 50
                },
                PaymentShare {
                    method: "Credit Card".to_string(),
                    count: 25
                },
                PaymentShare {
                    method: "E-Wallet".to_string(),
                    count: 25
                },
            ]
        );
    }

    #[test]
    fn test_monthly_trend_in_calendar_order() {
        let dated = |date: &str, amount: f64| Transaction {
            transaction_date: Some(date.to_string()),
            total_amount: Some(amount),
            ..Default::default()
        };
        let records = vec![
            dated("2023-04-01", 1.0),
            dated("2023-01-01", 2.0),
            dated("2023-12-01", 3.0),
            dated("2024-04-15", 4.0),
            dated("bad", 100.0),
        ];
        let dataset = dataset(vec![Column::TransactionDate, Column::TotalAmount], records);
        let trend = monthly_trend(&dataset.view());

        let months: Vec<_> = trend.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["Jan", "Apr", "Dec"]);
        assert_eq!(trend[1].total, 5.0);
        assert!(trend.windows(2).all(|w| w[0].month_num < w[1].month_num));
    }
}
