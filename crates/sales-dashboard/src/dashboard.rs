//! Dashboard presentation: one full render cycle
//!
//! A cycle runs load -> normalize -> filter -> aggregate and hands plain
//! chart/control/table values to a [`Surface`]. The surface only draws.

use crate::aggregate::{self, Group, KpiSummary};
use crate::config::Config;
use crate::constants;
use crate::error::LoadError;
use crate::filter::{self, FilterSelection, MonthSelection};
use crate::format::{format_amount, format_money, format_percent};
use crate::loader::{self, DataSource, LoadOutcome};
use crate::normalize::normalize;
use crate::record::{Dataset, View};
use crate::schema::{Capabilities, Section};

/// UI control with its current options and value
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Select {
        label: String,
        options: Vec<String>,
        selected: String,
    },
    MultiSelect {
        label: String,
        options: Vec<String>,
        selected: Vec<String>,
    },
}

/// KPI tile
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Pie,
    Line,
}

/// One bar, slice or line point
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    /// Text drawn on or beside the point
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

/// Tabular preview
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Drawing backend for a dashboard
pub trait Surface {
    fn header(&mut self, title: &str, subtitle: &str);
    fn section(&mut self, title: &str);
    fn control(&mut self, control: &Control);
    fn metrics(&mut self, metrics: &[Metric]);
    fn chart(&mut self, chart: &Chart);
    fn table(&mut self, table: &Table);
    fn notice(&mut self, level: NoticeLevel, message: &str);
}

/// How a render cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// Dashboard drawn
    Rendered { total_rows: usize, filtered_rows: usize },
    /// No data source; the user was prompted
    AwaitingInput,
}

pub const PROMPT_NO_SOURCE: &str = "Upload a CSV file first, or switch on the sample data.";
pub const NOTICE_NO_DATA: &str = "No data for the selected filters.";

/// Run one full cycle for the current data source and selection
pub fn render_cycle(
    source: &DataSource,
    selection: &FilterSelection,
    config: &Config,
    surface: &mut dyn Surface,
) -> Result<CycleStatus, LoadError> {
    surface.header(&config.title, &config.subtitle);

    let raw = match loader::load(source, config) {
        Ok(LoadOutcome::Loaded(dataset)) => dataset,
        Ok(LoadOutcome::AwaitingInput) => {
            surface.notice(NoticeLevel::Warning, PROMPT_NO_SOURCE);
            return Ok(CycleStatus::AwaitingInput);
        }
        Err(err) => {
            surface.notice(NoticeLevel::Error, &format!("Failed to load data: {}", err));
            return Err(err);
        }
    };

    let dataset = normalize(raw);
    let caps = Capabilities::of(&dataset);
    let filtered = filter::apply(&dataset, selection);

    surface.section("Global Filters");
    surface.control(&year_control(&filtered.year_options, &filtered.year.to_string()));
    surface.control(&month_control(&filtered.month_options, &selection.months));

    surface.section("Key Metrics");
    let kpi = aggregate::kpi_summary(&filtered.view);
    surface.metrics(&kpi_metrics(&kpi, &caps, config));

    surface.section("Annual Sales");
    if !caps.supports(Section::YearlyTotals) {
        unavailable(surface, Section::YearlyTotals);
    } else if dataset.is_empty() {
        surface.notice(NoticeLevel::Info, "The dataset has no rows.");
    } else {
        surface.chart(&yearly_chart(&aggregate::yearly_totals(&dataset.view())));
    }

    if filtered.view.is_empty() {
        surface.notice(NoticeLevel::Warning, NOTICE_NO_DATA);
    } else {
        render_filtered_sections(&filtered.view, selection, &caps, config, surface);
    }

    surface.section("Dataset Preview");
    surface.table(&preview_table(&dataset, config.preview_rows));

    Ok(CycleStatus::Rendered {
        total_rows: dataset.len(),
        filtered_rows: filtered.view.len(),
    })
}

/// Charts that depend on the filtered view, in fixed order
fn render_filtered_sections(
    view: &View,
    selection: &FilterSelection,
    caps: &Capabilities,
    config: &Config,
    surface: &mut dyn Surface,
) {
    surface.section("Top Product Categories");
    if caps.supports(Section::TopCategories) {
        let top = aggregate::top_categories(view, config.top_categories);
        surface.chart(&group_chart(
            format!("Top {} Categories by Revenue", config.top_categories),
            ChartKind::Bar,
            "ProductCategory",
            "TotalAmount",
            &top,
        ));
    } else {
        unavailable(surface, Section::TopCategories);
    }

    surface.section("Revenue by Location");
    if caps.supports(Section::LocationRevenue) {
        // Stale choices stay in the selection but are ignored here
        let options = filter::location_options(view);
        let chosen = filter::present_choices(&options, &selection.locations);
        surface.control(&Control::MultiSelect {
            label: "Store locations".to_string(),
            options,
            selected: chosen.clone(),
        });
        let subset = filter::location_subset(view, &chosen);
        let top = aggregate::top_locations(&subset, config.top_locations);
        surface.chart(&group_chart(
            "Store Locations by Revenue".to_string(),
            ChartKind::HorizontalBar,
            "TotalAmount",
            "StoreLocation",
            &top,
        ));
    } else {
        unavailable(surface, Section::LocationRevenue);
    }

    surface.section("Best-Selling Products");
    if caps.supports(Section::TopProducts) {
        let top = aggregate::top_products(view, config.top_products);
        surface.chart(&group_chart(
            format!("Top {} Products by Quantity", config.top_products),
            ChartKind::Bar,
            "ProductID",
            "Quantity",
            &top,
        ));
    } else {
        unavailable(surface, Section::TopProducts);
    }

    surface.section("Payment Methods");
    if caps.supports(Section::PaymentMethods) {
        surface.chart(&payment_chart(&aggregate::payment_distribution(view)));
    } else {
        unavailable(surface, Section::PaymentMethods);
    }

    surface.section("Monthly Trend");
    if caps.supports(Section::MonthlyTrend) {
        surface.chart(&trend_chart(&aggregate::monthly_trend(view)));
    } else {
        unavailable(surface, Section::MonthlyTrend);
    }
}

fn unavailable(surface: &mut dyn Surface, section: Section) {
    let columns: Vec<_> = section.required_columns().iter().map(|c| c.header()).collect();
    surface.notice(
        NoticeLevel::Info,
        &format!("Chart unavailable: the dataset needs column(s) {}.", columns.join(", ")),
    );
}

// =============================================================================
// Controls and KPIs
// =============================================================================

fn year_control(years: &[i32], selected: &str) -> Control {
    let options = std::iter::once(constants::ALL_YEARS_LABEL.to_string())
        .chain(years.iter().map(|y| y.to_string()))
        .collect();
    Control::Select {
        label: "Year".to_string(),
        options,
        selected: selected.to_string(),
    }
}

fn month_control(options: &[String], months: &MonthSelection) -> Control {
    let selected = match months {
        MonthSelection::All => options.to_vec(),
        MonthSelection::Only(chosen) => filter::present_choices(options, chosen),
    };
    Control::MultiSelect {
        label: "Months".to_string(),
        options: options.to_vec(),
        selected,
    }
}

/// KPI tiles; missing columns and undefined means render a placeholder
pub fn kpi_metrics(kpi: &KpiSummary, caps: &Capabilities, config: &Config) -> Vec<Metric> {
    let revenue = if caps.revenue {
        format_money(kpi.total_revenue, &config.currency_symbol)
    } else {
        constants::MISSING_VALUE.to_string()
    };

    vec![
        Metric {
            label: "Total Transactions".to_string(),
            value: kpi.transactions.to_string(),
        },
        Metric {
            label: "Total Revenue".to_string(),
            value: revenue,
        },
        Metric {
            label: "Average Discount".to_string(),
            value: format_percent(kpi.average_discount, 2),
        },
    ]
}

// =============================================================================
// Charts
// =============================================================================

fn group_chart(title: String, kind: ChartKind, x_label: &str, y_label: &str, groups: &[Group]) -> Chart {
    Chart {
        title,
        kind,
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        points: groups
            .iter()
            .map(|g| ChartPoint {
                label: g.key.clone(),
                value: g.value,
                annotation: format_amount(g.value),
            })
            .collect(),
    }
}

fn yearly_chart(totals: &[aggregate::YearTotal]) -> Chart {
    Chart {
        title: "Total Sales per Year".to_string(),
        kind: ChartKind::Bar,
        x_label: "Year".to_string(),
        y_label: "TotalAmount".to_string(),
        points: totals
            .iter()
            .map(|y| ChartPoint {
                label: y.year.to_string(),
                value: y.total,
                annotation: format_amount(y.total),
            })
            .collect(),
    }
}

/// Pie slices annotated with label and share of the total
pub fn payment_chart(shares: &[aggregate::PaymentShare]) -> Chart {
    let total: usize = shares.iter().map(|s| s.count).sum();
    Chart {
        title: "Payment Method Share".to_string(),
        kind: ChartKind::Pie,
        x_label: "PaymentMethod".to_string(),
        y_label: "Count".to_string(),
        points: shares
            .iter()
            .map(|s| {
                let percent = if total > 0 {
                    s.count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                ChartPoint {
                    label: s.method.clone(),
                    value: s.count as f64,
                    annotation: format!("{} {:.1}%", s.method, percent),
                }
            })
            .collect(),
    }
}

fn trend_chart(months: &[aggregate::MonthTotal]) -> Chart {
    Chart {
        title: "Monthly Sales Trend".to_string(),
        kind: ChartKind::Line,
        x_label: "Month".to_string(),
        y_label: "TotalAmount".to_string(),
        points: months
            .iter()
            .map(|m| ChartPoint {
                label: m.month.clone(),
                value: m.total,
                annotation: format_amount(m.total),
            })
            .collect(),
    }
}

// =============================================================================
// Preview
// =============================================================================

/// First `rows` records of the unfiltered dataset
pub fn preview_table(dataset: &Dataset, rows: usize) -> Table {
    let mut headers: Vec<String> = dataset.columns.iter().map(|c| c.header().to_string()).collect();
    headers.extend(["Year", "Month", "Month_Num"].map(String::from));

    let rows = dataset
        .records
        .iter()
        .take(rows)
        .map(|record| {
            let mut cells: Vec<String> = dataset.columns.iter().map(|c| record.cell(*c)).collect();
            cells.push(record.year().map(|y| y.to_string()).unwrap_or_default());
            cells.push(record.month().unwrap_or_default().to_string());
            cells.push(record.month_num().map(|m| m.to_string()).unwrap_or_default());
            cells
        })
        .collect();

    Table { headers, rows }
}
