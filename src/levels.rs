//! Mapping from paint intensity level to replayed commit count
//!
//! A painted cell at level 1–4 expands into a fixed number of backdated
//! commits; level 0 generates nothing. The table is configurable but must
//! stay strictly increasing so darker cells always mean more commits.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Highest paintable intensity level (levels run 0 through 4).
pub const MAX_LEVEL: u8 = 4;

/// Commit counts for levels 1 through 4, in order.
///
/// # Example
/// ```
/// use gitcanvas::LevelMap;
///
/// let levels = LevelMap::default();
/// assert_eq!(levels.commits_for(3), 6);
/// assert_eq!(levels.commits_for(0), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct LevelMap([u32; 4]);

impl Default for LevelMap {
    fn default() -> Self {
        Self([1, 3, 6, 10])
    }
}

impl LevelMap {
    /// Build a level table, rejecting tables that are not strictly
    /// increasing or that start at zero.
    pub fn new(table: [u32; 4]) -> Result<Self> {
        if table[0] == 0 {
            bail!("level 1 must generate at least one commit");
        }
        if !table.windows(2).all(|w| w[0] < w[1]) {
            bail!("level table must be strictly increasing, got {table:?}");
        }
        Ok(Self(table))
    }

    /// Number of commits replayed for `level`. Level 0 (and anything
    /// outside the paintable range) yields zero.
    pub fn commits_for(&self, level: u8) -> u32 {
        match level {
            1..=MAX_LEVEL => self.0[usize::from(level - 1)],
            _ => 0,
        }
    }
}

impl TryFrom<[u32; 4]> for LevelMap {
    type Error = String;

    fn try_from(table: [u32; 4]) -> Result<Self, Self::Error> {
        Self::new(table).map_err(|e| e.to_string())
    }
}

impl From<LevelMap> for [u32; 4] {
    fn from(map: LevelMap) -> Self {
        map.0
    }
}
