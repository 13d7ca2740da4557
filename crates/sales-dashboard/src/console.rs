//! Terminal rendering of the dashboard

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::config::Config;
use crate::dashboard::{Chart, ChartKind, Control, Metric, NoticeLevel, Surface, Table};

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Surface that draws into a text buffer with unicode bars and tables
pub struct ConsoleSurface {
    out: String,
    bar_width: usize,
}

impl ConsoleSurface {
    pub fn new(config: &Config) -> Self {
        Self {
            out: String::new(),
            bar_width: config.bar_width,
        }
    }

    /// Rendered text of everything drawn so far
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn bars(&mut self, chart: &Chart) {
        let max = chart.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        let label_width = chart.points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);

        for point in &chart.points {
            let len = bar_len(point.value, max, self.bar_width);
            self.line(&format!(
                "  {:<width$} │{} {}",
                point.label,
                "█".repeat(len),
                point.annotation,
                width = label_width
            ));
        }
    }

    fn line_chart(&mut self, chart: &Chart) {
        let min = chart.points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = chart.points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);

        let spark: String = chart
            .points
            .iter()
            .map(|p| {
                if max > min {
                    let level = ((p.value - min) / (max - min) * (SPARKS.len() - 1) as f64).round() as usize;
                    SPARKS[level.min(SPARKS.len() - 1)]
                } else {
                    SPARKS[SPARKS.len() / 2]
                }
            })
            .collect();
        self.line(&format!("  {}", spark));

        for point in &chart.points {
            self.line(&format!("  {:<4} {}", point.label, point.annotation));
        }
    }
}

/// Bar length proportional to `value / max`
fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / max) * width as f64).round() as usize
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

impl Surface for ConsoleSurface {
    fn header(&mut self, title: &str, subtitle: &str) {
        let rule = "=".repeat(60);
        self.line(&rule);
        self.line(&format!("{:^60}", title));
        self.line(&format!("{:^60}", subtitle));
        self.line(&rule);
    }

    fn section(&mut self, title: &str) {
        self.line(&format!("\n─┤ {} ├─", title.to_uppercase()));
    }

    fn control(&mut self, control: &Control) {
        match control {
            Control::Select {
                label,
                options,
                selected,
            } => {
                self.line(&format!("  {}: [{}]  options: {}", label, selected, options.join(" | ")));
            }
            Control::MultiSelect {
                label,
                options,
                selected,
            } => {
                let chosen = if selected.is_empty() {
                    "(none)".to_string()
                } else {
                    selected.join(", ")
                };
                self.line(&format!(
                    "  {}: {}  ({} of {} available)",
                    label,
                    chosen,
                    selected.len(),
                    options.len()
                ));
            }
        }
    }

    fn metrics(&mut self, metrics: &[Metric]) {
        let headers: Vec<String> = metrics.iter().map(|m| m.label.clone()).collect();
        let values: Vec<String> = metrics.iter().map(|m| m.value.clone()).collect();
        let table = render_table(&headers, &[values]);
        self.line(&table);
    }

    fn chart(&mut self, chart: &Chart) {
        self.line(&format!("  {} ({} by {})", chart.title, chart.y_label, chart.x_label));
        if chart.points.is_empty() {
            self.line("  (no values)");
            return;
        }
        match chart.kind {
            ChartKind::Bar | ChartKind::HorizontalBar | ChartKind::Pie => self.bars(chart),
            ChartKind::Line => self.line_chart(chart),
        }
    }

    fn table(&mut self, table: &Table) {
        if table.rows.is_empty() {
            self.line("  (no rows)");
            return;
        }
        let rendered = render_table(&table.headers, &table.rows);
        self.line(&rendered);
    }

    fn notice(&mut self, level: NoticeLevel, message: &str) {
        let marker = match level {
            NoticeLevel::Info => "i",
            NoticeLevel::Warning => "!",
            NoticeLevel::Error => "x",
        };
        self.line(&format!("  [{}] {}", marker, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{ChartPoint, render_cycle};
    use crate::filter::FilterSelection;
    use crate::loader::DataSource;

    fn chart(kind: ChartKind, values: &[(&str, f64)]) -> Chart {
        Chart {
            title: "Test".to_string(),
            kind,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            points: values
                .iter()
                .map(|(label, value)| ChartPoint {
                    label: label.to_string(),
                    value: *value,
                    annotation: format!("{:.2}", value),
                })
                .collect(),
        }
    }

    #[test]
    fn test_bar_len_scaling() {
        assert_eq!(bar_len(50.0, 100.0, 40), 20);
        assert_eq!(bar_len(100.0, 100.0, 40), 40);
        assert_eq!(bar_len(-5.0, 100.0, 40), 0);
        assert_eq!(bar_len(5.0, 0.0, 40), 0);
    }

    #[test]
    fn test_bar_chart_longest_bar_is_full_width() {
        let mut surface = ConsoleSurface::new(&Config::default());
        surface.chart(&chart(ChartKind::Bar, &[("A", 10.0), ("B", 5.0)]));
        let out = surface.finish();
        assert!(out.contains(&format!("A │{} 10.00", "█".repeat(40))));
        assert!(out.contains(&format!("B │{} 5.00", "█".repeat(20))));
    }

    #[test]
    fn test_line_chart_sparkline_follows_values() {
        let mut surface = ConsoleSurface::new(&Config::default());
        surface.chart(&chart(ChartKind::Line, &[("Jan", 1.0), ("Feb", 3.0), ("Mar", 2.0)]));
        let out = surface.finish();
        assert!(out.contains("▁█▅"));
        assert!(out.contains("Feb  3.00"));
    }

    #[test]
    fn test_empty_chart_and_table() {
        let mut surface = ConsoleSurface::new(&Config::default());
        surface.chart(&chart(ChartKind::Pie, &[]));
        surface.table(&Table {
            headers: vec!["A".to_string()],
            rows: Vec::new(),
        });
        let out = surface.finish();
        assert!(out.contains("(no values)"));
        assert!(out.contains("(no rows)"));
    }

    #[test]
    fn test_text_items_end_with_newline() {
        let mut surface = ConsoleSurface::new(&Config::default());
        surface.section("Key Metrics");
        surface.control(&Control::MultiSelect {
            label: "Months".to_string(),
            options: vec!["Jan".to_string(), "Feb".to_string()],
            selected: Vec::new(),
        });
        surface.notice(NoticeLevel::Warning, "No data");
        assert_eq!(
            surface.finish(),
            "\n─┤ KEY METRICS ├─\n  Months: (none)  (0 of 2 available)\n  [!] No data\n"
        );
    }

    #[test]
    fn test_full_sample_render() {
        let config = Config::default();
        let mut surface = ConsoleSurface::new(&config);
        render_cycle(&DataSource::Sample, &FilterSelection::default(), &config, &mut surface).unwrap();
        let out = surface.finish();

        assert!(out.contains(&config.title));
        assert!(out.contains("$2,000,000,000.00"));
        assert!(out.contains("Jakarta"));
        assert!(out.contains("Cash 50.0%"));
        assert!(out.contains("─┤ DATASET PREVIEW ├─"));
    }
}
