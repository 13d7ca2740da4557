//! Sales Dashboard
//!
//! Loads retail transactions from a CSV upload or a built-in sample, derives
//! calendar fields, filters by year/month/location and renders KPIs, charts
//! and a preview table through a [`dashboard::Surface`].

pub mod aggregate;
pub mod config;
pub mod console;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod normalize;
pub mod record;
pub mod schema;
pub mod session;

pub use config::Config;
pub use dashboard::{CycleStatus, Surface, render_cycle};
pub use error::LoadError;
pub use filter::{FilterSelection, MonthSelection, YearSelection};
pub use loader::DataSource;
