//! Interactive session: control values carried between render cycles
//!
//! Only the data-source controls and the filter selection survive an
//! interaction. The dataset itself is reloaded on every cycle.

use std::path::PathBuf;
use std::str::FromStr;

use crate::config::Config;
use crate::dashboard::{CycleStatus, Surface, render_cycle};
use crate::error::LoadError;
use crate::filter::{FilterSelection, MonthSelection, YearSelection};
use crate::loader::DataSource;

pub const HELP: &str = "\
Commands:
  year <all|YYYY>           select a year (resets months)
  months <all|none|A,B,..>  select months, e.g. months Jan,Feb
  locations <all|A,B,..>    restrict the location chart
  sample <on|off>           toggle the sample dataset
  upload <path>             load a CSV file
  clear                     forget the uploaded file
  show                      render again
  help                      show this text
  quit                      leave";

/// One user interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Year(YearSelection),
    Months(MonthSelection),
    Locations(Vec<String>),
    Sample(bool),
    Upload(PathBuf),
    Clear,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "year" => rest.parse().map(Command::Year),
            "months" | "month" => Ok(Command::Months(match rest.to_ascii_lowercase().as_str() {
                "" | "all" => MonthSelection::All,
                "none" => MonthSelection::Only(Vec::new()),
                _ => MonthSelection::Only(split_list(rest)),
            })),
            "locations" | "location" => Ok(Command::Locations(match rest.to_ascii_lowercase().as_str() {
                "" | "all" => Vec::new(),
                _ => split_list(rest),
            })),
            "sample" => match rest.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(Command::Sample(true)),
                "off" | "false" | "no" => Ok(Command::Sample(false)),
                _ => Err("usage: sample <on|off>".to_string()),
            },
            "upload" if !rest.is_empty() => Ok(Command::Upload(PathBuf::from(rest))),
            "upload" => Err("usage: upload <path>".to_string()),
            "clear" => Ok(Command::Clear),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}' (try 'help')", other)),
        }
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// What the driver should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Render,
    Help,
    Quit,
}

/// Control state of one user session
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub use_sample: bool,
    pub upload: Option<DataSource>,
    pub selection: FilterSelection,
}

impl Session {
    pub fn new(use_sample: bool, upload: Option<DataSource>, selection: FilterSelection) -> Self {
        Self {
            use_sample,
            upload,
            selection,
        }
    }

    /// Data source implied by the current controls
    pub fn source(&self) -> DataSource {
        DataSource::select(self.use_sample, self.upload.clone())
    }

    /// Update control state from a command
    pub fn apply(&mut self, command: Command) -> Result<Flow, LoadError> {
        match command {
            Command::Year(year) => self.selection.select_year(year),
            Command::Months(months) => self.selection.months = months,
            Command::Locations(locations) => self.selection.locations = locations,
            Command::Sample(on) => self.use_sample = on,
            Command::Upload(path) => {
                self.upload = Some(DataSource::from_path(&path)?);
            }
            Command::Clear => self.upload = None,
            Command::Show => {}
            Command::Help => return Ok(Flow::Help),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Render)
    }

    /// Full render cycle for the current state
    pub fn render(&self, config: &Config, surface: &mut dyn Surface) -> Result<CycleStatus, LoadError> {
        render_cycle(&self.source(), &self.selection, config, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::RecordingSurface;

    fn parse(line: &str) -> Command {
        line.parse().unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("year 2024"), Command::Year(YearSelection::Year(2024)));
        assert_eq!(parse("YEAR all"), Command::Year(YearSelection::All));
        assert_eq!(parse("months Jan, Feb"), Command::Months(MonthSelection::Only(vec!["Jan".into(), "Feb".into()])));
        assert_eq!(parse("months none"), Command::Months(MonthSelection::Only(Vec::new())));
        assert_eq!(parse("months all"), Command::Months(MonthSelection::All));
        assert_eq!(parse("locations Jakarta,Medan"), Command::Locations(vec!["Jakarta".into(), "Medan".into()]));
        assert_eq!(parse("locations all"), Command::Locations(Vec::new()));
        assert_eq!(parse("sample on"), Command::Sample(true));
        assert_eq!(parse("upload data/sales 2024.csv"), Command::Upload(PathBuf::from("data/sales 2024.csv")));
        assert_eq!(parse(""), Command::Show);
        assert_eq!(parse("q"), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!("year soon".parse::<Command>().is_err());
        assert!("sample maybe".parse::<Command>().is_err());
        assert!("upload".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_year_change_resets_months() {
        let mut session = Session::new(true, None, FilterSelection::default());
        session.apply(parse("months Mar")).unwrap();
        session.apply(parse("year 2024")).unwrap();
        assert_eq!(session.selection.year, YearSelection::Year(2024));
        assert_eq!(session.selection.months, MonthSelection::All);
    }

    #[test]
    fn test_sample_toggle_changes_source() {
        let mut session = Session::default();
        assert_eq!(session.source(), DataSource::Nothing);
        session.apply(Command::Sample(true)).unwrap();
        assert_eq!(session.source(), DataSource::Sample);
    }

    #[test]
    fn test_missing_upload_keeps_state() {
        let mut session = Session::new(true, None, FilterSelection::default());
        let path = std::env::temp_dir().join("sales-dashboard-missing-session.csv");
        assert!(session.apply(Command::Upload(path)).is_err());
        assert!(session.upload.is_none());
    }

    #[test]
    fn test_each_interaction_rerenders_from_scratch() {
        let config = Config::default();
        let mut session = Session::new(true, None, FilterSelection::default());

        let mut first = RecordingSurface::default();
        session.render(&config, &mut first).unwrap();

        session.apply(parse("months none")).unwrap();
        let mut second = RecordingSurface::default();
        let status = session.render(&config, &mut second).unwrap();
        assert_eq!(
            status,
            CycleStatus::Rendered {
                total_rows: 100,
                filtered_rows: 0
            }
        );

        session.apply(parse("months all")).unwrap();
        let mut third = RecordingSurface::default();
        session.render(&config, &mut third).unwrap();
        assert_eq!(first.events, third.events);
    }

    #[test]
    fn test_flow() {
        let mut session = Session::default();
        assert_eq!(session.apply(Command::Help).unwrap(), Flow::Help);
        assert_eq!(session.apply(Command::Quit).unwrap(), Flow::Quit);
        assert_eq!(session.apply(Command::Show).unwrap(), Flow::Render);
    }
}
