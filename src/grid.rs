//! Calendar grid mapper
//!
//! Lays one year of days out on the week/weekday grid used by contribution
//! calendars. The grid is Monday-anchored: week 0 starts on the Monday on or
//! before January 1, and weekday 0 is Monday. Days belonging to a
//! neighboring year are omitted entirely; the surviving cells keep their
//! (week, weekday) coordinates, so column alignment is preserved.
//!
//! Cells live in an explicit arena looked up by coordinate, never by any
//! rendering-handle identity.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate};

use crate::fetch::Contributions;
use crate::levels::MAX_LEVEL;

/// One day of the target year at a (week, weekday) coordinate.
///
/// `level` is the only user-mutable field; `count` is informational and
/// `date` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub week: usize,
    pub weekday: usize,
    pub date: NaiveDate,
    pub level: u8,
    pub count: u32,
}

/// A painted day slated for replay as one or more backdated commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSpec {
    pub date: NaiveDate,
    pub level: u8,
}

#[derive(Debug)]
pub struct Grid {
    year: i32,
    start_day: NaiveDate,
    weeks: usize,
    cells: Vec<GridCell>,
}

impl Grid {
    /// Build the grid for `year`, seeding each day from `contributions`
    /// (keyed `YYYY-MM-DD`) and defaulting absent days to level 0, count 0.
    pub fn build(year: i32, contributions: &Contributions) -> Result<Self> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
            .with_context(|| format!("Year {year} is out of range"))?;
        let dec31 = NaiveDate::from_ymd_opt(year, 12, 31)
            .with_context(|| format!("Year {year} is out of range"))?;

        let start_day = jan1 - Duration::days(i64::from(jan1.weekday().num_days_from_monday()));
        let weeks = ((dec31 - start_day).num_days() / 7 + 1) as usize;

        let mut cells = Vec::with_capacity(366);
        for week in 0..weeks {
            for weekday in 0..7 {
                let date = start_day + Duration::days((week * 7 + weekday) as i64);
                if date.year() != year {
                    continue;
                }
                let key = date.format("%Y-%m-%d").to_string();
                let (level, count) = contributions
                    .get(&key)
                    .map_or((0, 0), |day| (day.level, day.count));
                cells.push(GridCell {
                    week,
                    weekday,
                    date,
                    level,
                    count,
                });
            }
        }

        Ok(Self {
            year,
            start_day,
            weeks,
            cells,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of week columns spanning the year.
    pub fn weeks(&self) -> usize {
        self.weeks
    }

    /// All cells in (week, weekday) order, which equals ascending date
    /// order under the Monday anchor.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// The (week, weekday) coordinate a date would occupy, if it falls
    /// within the grid span. The coordinate may belong to an omitted
    /// out-of-year day; [`Grid::cell`] then returns `None`.
    pub fn coord_of(&self, date: NaiveDate) -> Option<(usize, usize)> {
        let offset = (date - self.start_day).num_days();
        if offset < 0 {
            return None;
        }
        let week = (offset / 7) as usize;
        if week >= self.weeks {
            return None;
        }
        Some((week, (offset % 7) as usize))
    }

    /// Look up a cell by coordinate.
    pub fn cell(&self, week: usize, weekday: usize) -> Option<&GridCell> {
        self.index_of(week, weekday).map(|i| &self.cells[i])
    }

    /// Look up a cell by its date.
    pub fn cell_by_date(&self, date: NaiveDate) -> Option<&GridCell> {
        let (week, weekday) = self.coord_of(date)?;
        self.cell(week, weekday)
    }

    /// Overwrite the level of the cell holding `date`. Level 0 erases.
    pub fn paint_date(&mut self, date: NaiveDate, level: u8) -> Result<&GridCell> {
        if level > MAX_LEVEL {
            bail!("Level must be between 0 and {MAX_LEVEL}, got {level}");
        }
        let index = self
            .coord_of(date)
            .and_then(|(week, weekday)| self.index_of(week, weekday))
            .with_context(|| format!("{date} is not part of {}", self.year))?;
        self.cells[index].level = level;
        Ok(&self.cells[index])
    }

    /// Painted days (level > 0) as commit specs, in ascending date order.
    pub fn commit_specs(&self) -> Vec<CommitSpec> {
        self.cells
            .iter()
            .filter(|cell| cell.level > 0)
            .map(|cell| CommitSpec {
                date: cell.date,
                level: cell.level,
            })
            .collect()
    }

    fn index_of(&self, week: usize, weekday: usize) -> Option<usize> {
        self.cells
            .binary_search_by_key(&(week, weekday), |cell| (cell.week, cell.weekday))
            .ok()
    }
}
