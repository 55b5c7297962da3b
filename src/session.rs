//! Interactive paint session
//!
//! Holds the editing state of one rendering session: the grid, the selected
//! palette level, and the operations the interactive surface exposes
//! (paint, erase, per-day status, and extraction of the painted days for
//! replay). Terminal rendering draws the five-tier green palette with month
//! labels across the top, Mon/Wed/Fri row labels, and a Less→More legend.

use chrono::NaiveDate;
use console::Style;
use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::grid::{CommitSpec, Grid, GridCell};
use crate::levels::MAX_LEVEL;

/// ANSI 256-color approximations of the five intensity tiers, darkest to
/// brightest green.
const LEVEL_COLORS: [u8; 5] = [236, 22, 28, 34, 40];

pub struct PaintSession {
    grid: Grid,
    palette_level: u8,
}

impl PaintSession {
    /// Start a session over a freshly built grid. The palette starts at
    /// level 1, the lightest paintable tier.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            palette_level: 1,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette_level(&self) -> u8 {
        self.palette_level
    }

    /// Select the palette level applied by subsequent paints.
    pub fn select_level(&mut self, level: u8) -> Result<()> {
        if level > MAX_LEVEL {
            bail!("Level must be between 0 and {MAX_LEVEL}, got {level}");
        }
        self.palette_level = level;
        Ok(())
    }

    /// Paint a day with the palette level, or an explicit one when given.
    pub fn paint(&mut self, date: NaiveDate, level: Option<u8>) -> Result<&GridCell> {
        let level = level.unwrap_or(self.palette_level);
        self.grid.paint_date(date, level)
    }

    /// Reset a day to level 0, excluding it from replay.
    pub fn erase(&mut self, date: NaiveDate) -> Result<&GridCell> {
        self.grid.paint_date(date, 0)
    }

    /// Readout for a day: date, fetched count, current level.
    pub fn status(&self, date: NaiveDate) -> Option<String> {
        self.grid.cell_by_date(date).map(|cell| {
            format!(
                "{}: {} contribution(s), level {}",
                cell.date, cell.count, cell.level
            )
        })
    }

    /// Painted days slated for replay.
    pub fn commit_specs(&self) -> Vec<CommitSpec> {
        self.grid.commit_specs()
    }

    /// Render the grid as styled terminal text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.month_labels());
        for weekday in 0..7 {
            let label = match weekday {
                0 => "Mon",
                2 => "Wed",
                4 => "Fri",
                _ => "   ",
            };
            let _ = write!(out, "{label} ");
            for week in 0..self.grid.weeks() {
                match self.grid.cell(week, weekday) {
                    Some(cell) => {
                        let style =
                            Style::new().color256(LEVEL_COLORS[usize::from(cell.level)]);
                        let _ = write!(out, "{}", style.apply_to("■ "));
                    }
                    None => out.push_str("  "),
                }
            }
            out.push('\n');
        }
        out.push_str(&self.legend());
        out
    }

    fn month_labels(&self) -> String {
        let mut row = vec![b' '; self.grid.weeks() * 2];
        for month in 1..=12 {
            let Some(first) = NaiveDate::from_ymd_opt(self.grid.year(), month, 1) else {
                continue;
            };
            if let Some((week, _)) = self.grid.coord_of(first) {
                let abbr = first.format("%b").to_string();
                let pos = week * 2;
                for (i, byte) in abbr.bytes().enumerate() {
                    if pos + i < row.len() {
                        row[pos + i] = byte;
                    }
                }
            }
        }
        format!("    {}\n", String::from_utf8_lossy(&row).trim_end())
    }

    fn legend(&self) -> String {
        let mut out = String::from("    Less ");
        for color in LEVEL_COLORS {
            let _ = write!(out, "{} ", Style::new().color256(color).apply_to("■"));
        }
        out.push_str("More\n");
        out
    }
}

pub const HELP: &str = "\
Commands:
  show                 repaint the grid
  level <0-4>          select the palette level
  paint <date> [lvl]   paint a day (YYYY-MM-DD) with the palette or an explicit level
  erase <date>         reset a day to level 0
  status <date>        show a day's date, fetched count, and current level
  commit               replay painted days as backdated commits and push
  quit                 leave without committing";

/// One line of user input in the interactive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show,
    Level(u8),
    Paint(NaiveDate, Option<u8>),
    Erase(NaiveDate),
    Status(NaiveDate),
    Commit,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().ok_or_else(|| "Empty command".to_string())?;
        let command = match verb {
            "show" => Self::Show,
            "level" => Self::Level(parse_level_arg(parts.next())?),
            "paint" => {
                let date = parse_date_arg(parts.next())?;
                let level = parts.next().map(parse_level_raw).transpose()?;
                Self::Paint(date, level)
            }
            "erase" => Self::Erase(parse_date_arg(parts.next())?),
            "status" => Self::Status(parse_date_arg(parts.next())?),
            "commit" => Self::Commit,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(format!(
                    "Unknown command '{other}'. Type 'help' for the command list."
                ));
            }
        };
        if let Some(extra) = parts.next() {
            return Err(format!("Unexpected argument '{extra}'"));
        }
        Ok(command)
    }
}

fn parse_date_arg(raw: Option<&str>) -> Result<NaiveDate, String> {
    let raw = raw.ok_or_else(|| "Expected a date argument (YYYY-MM-DD)".to_string())?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{raw}'. Use YYYY-MM-DD (e.g. '2025-03-15')"))
}

fn parse_level_arg(raw: Option<&str>) -> Result<u8, String> {
    parse_level_raw(raw.ok_or_else(|| format!("Expected a level argument (0-{MAX_LEVEL})"))?)
}

fn parse_level_raw(raw: &str) -> Result<u8, String> {
    match raw.parse::<u8>() {
        Ok(level) if level <= MAX_LEVEL => Ok(level),
        _ => Err(format!(
            "Invalid level '{raw}'. Levels run 0 through {MAX_LEVEL}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Contributions, DayActivity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session_for_2024() -> PaintSession {
        let mut contributions = Contributions::new();
        contributions.insert("2024-03-05".to_string(), DayActivity { level: 2, count: 17 });
        PaintSession::new(Grid::build(2024, &contributions).unwrap())
    }

    #[test]
    fn test_palette_defaults_to_level_one() {
        let mut session = session_for_2024();
        assert_eq!(session.palette_level(), 1);
        session.paint(date(2024, 6, 1), None).unwrap();
        assert_eq!(session.grid().cell_by_date(date(2024, 6, 1)).unwrap().level, 1);
    }

    #[test]
    fn test_select_level_then_paint() {
        let mut session = session_for_2024();
        session.select_level(4).unwrap();
        session.paint(date(2024, 6, 1), None).unwrap();
        assert_eq!(session.grid().cell_by_date(date(2024, 6, 1)).unwrap().level, 4);
    }

    #[test]
    fn test_select_level_rejects_out_of_range() {
        let mut session = session_for_2024();
        assert!(session.select_level(5).is_err());
    }

    #[test]
    fn test_paint_then_erase_excludes_from_specs() {
        let mut session = session_for_2024();
        session.paint(date(2024, 6, 1), Some(3)).unwrap();
        assert_eq!(session.commit_specs().len(), 2); // seeded cell + painted cell

        session.erase(date(2024, 6, 1)).unwrap();
        let specs = session.commit_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].date, date(2024, 3, 5));
    }

    #[test]
    fn test_status_readout() {
        let session = session_for_2024();
        assert_eq!(
            session.status(date(2024, 3, 5)).unwrap(),
            "2024-03-05: 17 contribution(s), level 2"
        );
        assert!(session.status(date(2025, 1, 1)).is_none());
    }

    #[test]
    fn test_render_shape() {
        let session = session_for_2024();
        let rendered = console::strip_ansi_codes(&session.render()).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        // Month label row + 7 weekday rows + legend
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Jan"));
        assert!(lines[0].contains("Dec"));
        assert!(lines[1].starts_with("Mon "));
        assert!(lines[3].starts_with("Wed "));
        assert!(lines[5].starts_with("Fri "));
        assert!(lines[8].contains("Less"));
        assert!(lines[8].contains("More"));
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("show".parse::<Command>().unwrap(), Command::Show);
        assert_eq!("level 3".parse::<Command>().unwrap(), Command::Level(3));
        assert_eq!(
            "paint 2024-03-05".parse::<Command>().unwrap(),
            Command::Paint(date(2024, 3, 5), None)
        );
        assert_eq!(
            "paint 2024-03-05 4".parse::<Command>().unwrap(),
            Command::Paint(date(2024, 3, 5), Some(4))
        );
        assert_eq!(
            "erase 2024-03-05".parse::<Command>().unwrap(),
            Command::Erase(date(2024, 3, 5))
        );
        assert_eq!(
            "status 2024-03-05".parse::<Command>().unwrap(),
            Command::Status(date(2024, 3, 5))
        );
        assert_eq!("commit".parse::<Command>().unwrap(), Command::Commit);
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("?".parse::<Command>().unwrap(), Command::Help);
    }

    #[test]
    fn test_command_parsing_errors() {
        assert!("".parse::<Command>().is_err());
        assert!("scribble".parse::<Command>().is_err());
        assert!("level".parse::<Command>().is_err());
        assert!("level 7".parse::<Command>().is_err());
        assert!("paint not-a-date".parse::<Command>().is_err());
        assert!("paint 2024-03-05 9".parse::<Command>().is_err());
        assert!("show extra".parse::<Command>().is_err());
    }
}
