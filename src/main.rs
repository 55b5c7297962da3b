//! gitcanvas - Main Entry Point
//!
//! Thin CLI wrapper around the `gitcanvas` library: parse arguments, prompt
//! for anything missing, then run the fetch → paint → replay flow.

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::Parser;
use dialoguer::Input;
use gitcanvas::{Command, Config, Grid, PaintSession, Replayer, fetch, session};
use std::path::PathBuf;

/// Paint a GitHub contribution calendar and replay it as backdated commits
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target year (prompted for when omitted)
    year: Option<i32>,

    /// GitHub username (prompted for when omitted)
    username: Option<String>,

    /// Path to the configuration file
    #[arg(long, default_value = "gitcanvas.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let year = match args.year {
        Some(year) => year,
        None => Input::new()
            .with_prompt("Year")
            .default(chrono::Local::now().year())
            .interact_text()?,
    };

    let username = match args.username {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("Username must not be empty");
            }
            name
        }
        None => Input::<String>::new()
            .with_prompt("GitHub username")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("Username must not be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?
            .trim()
            .to_string(),
    };

    let client = fetch::http_client()?;
    let contributions = fetch::fetch_contributions(&client, &username, year)
        .await
        .context("Failed to fetch the contribution calendar")?;
    if contributions.is_empty() {
        println!("{username} has no contributions in {year}; starting from a blank grid.");
    }

    let mut paint_session = PaintSession::new(Grid::build(year, &contributions)?);
    println!("{}", paint_session.render());
    println!("{}", session::HELP);

    loop {
        let line: String = Input::new().with_prompt("canvas").interact_text()?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Show => println!("{}", paint_session.render()),
            Command::Help => println!("{}", session::HELP),
            Command::Level(level) => {
                paint_session.select_level(level)?;
                println!("Palette level set to {level}");
            }
            Command::Paint(date, level) => match paint_session.paint(date, level) {
                Ok(cell) => println!("{} painted at level {}", cell.date, cell.level),
                Err(e) => println!("{e}"),
            },
            Command::Erase(date) => match paint_session.erase(date) {
                Ok(cell) => println!("{} reset to level 0", cell.date),
                Err(e) => println!("{e}"),
            },
            Command::Status(date) => match paint_session.status(date) {
                Some(readout) => println!("{readout}"),
                None => println!("{date} is not part of {year}"),
            },
            Command::Commit => {
                let specs = paint_session.commit_specs();
                if specs.is_empty() {
                    println!("No days painted; nothing to commit.");
                    continue;
                }
                let replayer = Replayer::open(&config)?;
                let created = replayer.replay(&specs)?;
                replayer.push()?;
                println!(
                    "Replayed {created} commit(s) and pushed {} to {}.",
                    config.branch, config.remote
                );
                break;
            }
            Command::Quit => break,
        }
    }

    Ok(())
}
