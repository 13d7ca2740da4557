//! Filter state: year, months and store locations
//!
//! The selection is rebuilt from control values on every interaction and
//! passed by reference into each cycle; nothing here is global.

use std::collections::HashSet;
use std::str::FromStr;

use crate::constants;
use crate::record::{Dataset, View};

/// Year control value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearSelection {
    #[default]
    All,
    Year(i32),
}

impl std::fmt::Display for YearSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearSelection::All => write!(f, "{}", constants::ALL_YEARS_LABEL),
            YearSelection::Year(year) => write!(f, "{}", year),
        }
    }
}

impl FromStr for YearSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case(constants::ALL_YEARS_LABEL) {
            return Ok(YearSelection::All);
        }
        s.parse::<i32>()
            .map(YearSelection::Year)
            .map_err(|_| format!("'{}' is not a year (use a number or 'all')", s))
    }
}

/// Month control value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthSelection {
    /// Every month of the year-filtered base (the control's default)
    #[default]
    All,
    /// Explicit set of month names; empty selects nothing
    Only(Vec<String>),
}

impl MonthSelection {
    fn admits(&self, month: Option<&str>) -> bool {
        match self {
            MonthSelection::All => true,
            MonthSelection::Only(months) => month.is_some_and(|m| months.iter().any(|s| s == m)),
        }
    }
}

/// All filter controls for one render cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub year: YearSelection,
    pub months: MonthSelection,
    /// Store-location sub-filter; empty means no restriction
    pub locations: Vec<String>,
}

impl FilterSelection {
    /// Change the year; month choices reset to every month of the new year
    pub fn select_year(&mut self, year: YearSelection) {
        if self.year != year {
            self.year = year;
            self.months = MonthSelection::All;
        }
    }
}

/// Control options and the filtered view for one cycle
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    /// Distinct years, newest first ("all years" is implied)
    pub year_options: Vec<i32>,
    /// Year actually applied (a stale year falls back to all)
    pub year: YearSelection,
    /// Distinct months of the year-filtered base, first-seen order
    pub month_options: Vec<String>,
    /// Year and month filters applied
    pub view: View<'a>,
}

/// Apply year and month filters to a normalized dataset
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilterOutcome<'a> {
    let year_options = year_options(dataset);

    let year = match selection.year {
        YearSelection::Year(y) if !year_options.contains(&y) => {
            tracing::warn!("year {} not present in dataset, showing all years", y);
            YearSelection::All
        }
        other => other,
    };

    let base = year_filtered(dataset, year);
    let month_options = month_options(&base);
    let view = base.filter(|t| selection.months.admits(t.month()));
    tracing::debug!(
        "filter {} / {:?}: {} of {} rows",
        year,
        selection.months,
        view.len(),
        dataset.len()
    );

    FilterOutcome {
        year_options,
        year,
        month_options,
        view,
    }
}

/// Distinct non-missing years, descending
pub fn year_options(dataset: &Dataset) -> Vec<i32> {
    let mut years: Vec<i32> = dataset
        .records
        .iter()
        .filter_map(|t| t.year())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years
}

/// Year-filtered base
pub fn year_filtered(dataset: &Dataset, year: YearSelection) -> View<'_> {
    match year {
        YearSelection::All => dataset.view(),
        YearSelection::Year(y) => dataset.view().filter(|t| t.year() == Some(y)),
    }
}

/// Distinct non-missing month names in first-seen order
pub fn month_options(base: &View) -> Vec<String> {
    first_seen(base.iter().filter_map(|t| t.month()))
}

/// Distinct store locations of a view in first-seen order
pub fn location_options(view: &View) -> Vec<String> {
    first_seen(view.iter().filter_map(|t| t.store_location.as_deref()))
}

/// Chosen values that are among `options`, in chosen order
pub fn present_choices(options: &[String], chosen: &[String]) -> Vec<String> {
    chosen.iter().filter(|c| options.contains(c)).cloned().collect()
}

/// Restrict a view to the chosen locations; an empty choice keeps everything
pub fn location_subset<'a>(view: &View<'a>, locations: &[String]) -> View<'a> {
    if locations.is_empty() {
        return view.clone();
    }
    view.filter(|t| {
        t.store_location
            .as_deref()
            .is_some_and(|loc| locations.iter().any(|l| l == loc))
    })
}

fn first_seen<'s>(values: impl Iterator<Item = &'s str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
