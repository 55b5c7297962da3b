//! gitcanvas Library
//!
//! Fetches a GitHub user's public contribution calendar, lets the caller
//! repaint it as a grid of 0–4 intensity levels, and replays the painted
//! pattern as backdated commits pushed to a remote.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Fetch layer**: `fetch` module - calendar scraping over HTTP with two
//!   recognized markup shapes
//! - **Domain layer**: `grid`, `levels`, and `session` modules - week/weekday
//!   grid math, the level-to-commit mapping, and interactive editing state
//! - **Replay layer**: `replay` module - backdated commits and push via
//!   libgit2
//!
//! # Example
//!
//! ```no_run
//! use anyhow::Result;
//! use gitcanvas::{Grid, PaintSession, fetch};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = fetch::http_client()?;
//!     let contributions = fetch::fetch_contributions(&client, "octocat", 2024).await?;
//!     let mut session = PaintSession::new(Grid::build(2024, &contributions)?);
//!     session.paint("2024-03-05".parse()?, Some(3))?;
//!     println!("{}", session.render());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod fetch;
pub mod grid;
pub mod levels;
pub mod replay;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use fetch::{Contributions, DayActivity, FetchError};
pub use grid::{CommitSpec, Grid, GridCell};
pub use levels::LevelMap;
pub use replay::Replayer;
pub use session::{Command, PaintSession};
