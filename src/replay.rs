//! Backdated commit replay
//!
//! Turns painted days into real commits: one tracking-file line and one
//! commit per replayed unit, with author and committer signatures both
//! pinned to the target day at noon UTC, followed by a push of the
//! configured branch.
//!
//! Failure policy is all-or-nothing: the first failed git operation aborts
//! the whole replay and propagates with context.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use git2::{Repository, Signature, Time};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::grid::CommitSpec;
use crate::levels::LevelMap;

pub struct Replayer {
    repo: Repository,
    branch: String,
    remote: String,
    tracking_file: String,
    levels: LevelMap,
}

impl Replayer {
    /// Open the repository named by the configuration.
    pub fn open(config: &Config) -> Result<Self> {
        let repo = Repository::discover(&config.repo_path).with_context(|| {
            format!("No git repository found at {}", config.repo_path.display())
        })?;
        Ok(Self {
            repo,
            branch: config.branch.clone(),
            remote: config.remote.clone(),
            tracking_file: config.tracking_file.clone(),
            levels: config.levels.clone(),
        })
    }

    /// Replay all specs in ascending date order. Specs may arrive in any
    /// order; they are sorted here so earlier dates always commit first.
    ///
    /// # Returns
    /// The number of commits created
    pub fn replay(&self, specs: &[CommitSpec]) -> Result<usize> {
        let mut ordered: Vec<CommitSpec> = specs.to_vec();
        ordered.sort_by_key(|spec| spec.date);

        let mut created = 0;
        for spec in &ordered {
            let total = self.levels.commits_for(spec.level);
            for seq in 1..=total {
                self.append_tracking_line(spec, seq, total)?;
                self.commit_backdated(spec, seq, total)?;
                created += 1;
            }
        }
        Ok(created)
    }

    /// Push the configured branch to the configured remote.
    pub fn push(&self) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(&self.remote)
            .with_context(|| format!("Failed to find remote '{}'", self.remote))?;

        let refspec = format!("refs/heads/{}", self.branch);
        remote
            .push(&[&refspec], None)
            .with_context(|| format!("Failed to push {} to {}", self.branch, self.remote))?;
        Ok(())
    }

    fn tracking_path(&self) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .context("Repository has no working directory")?;
        Ok(workdir.join(&self.tracking_file))
    }

    fn append_tracking_line(&self, spec: &CommitSpec, seq: u32, total: u32) -> Result<()> {
        let path = self.tracking_path()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writeln!(file, "Pixel {} {}/{} lvl {}", spec.date, seq, total, spec.level)
            .with_context(|| format!("Failed to append to {}", path.display()))?;
        Ok(())
    }

    fn commit_backdated(&self, spec: &CommitSpec, seq: u32, total: u32) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_path(Path::new(&self.tracking_file))?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_commit = match self.repo.head() {
            Ok(head) => {
                let oid = head.target().context("HEAD has no target")?;
                Some(self.repo.find_commit(oid)?)
            }
            Err(_) => None, // unborn branch
        };

        let signature = self.backdated_signature(spec.date)?;
        let message = format!("Pixel {} ({}/{})", spec.date, seq, total);

        let parents: Vec<_> = parent_commit.iter().collect();
        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                &message,
                &tree,
                &parents,
            )
            .with_context(|| format!("Failed to commit for {}", spec.date))?;
        Ok(())
    }

    /// Signature whose timestamp is `date` at 12:00 UTC. Name and email
    /// come from the repository configuration when set.
    fn backdated_signature(&self, date: NaiveDate) -> Result<Signature<'static>> {
        let config = self.repo.config()?;

        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "gitcanvas".to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "gitcanvas@localhost".to_string());

        let midday = date
            .and_hms_opt(12, 0, 0)
            .with_context(|| format!("Invalid commit timestamp for {date}"))?;
        let time = Time::new(midday.and_utc().timestamp(), 0);
        Signature::new(&name, &email, &time).context("Failed to create backdated signature")
    }
}
