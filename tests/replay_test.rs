//! Integration tests for the backdated commit replay
//!
//! These run against real temporary repositories and verify commit counts
//! per level, message and tracking-file formats, the pinned
//! author/committer timestamps, and the push step.

use chrono::NaiveDate;
use git2::{Repository, Signature, Time};
use gitcanvas::{CommitSpec, Config, LevelMap, Replayer};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    // Configure git user for the test repo
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (temp_dir, repo)
}

fn create_initial_commit(repo: &Repository, temp_dir: &TempDir) {
    let file_path = temp_dir.path().join("seed.txt");
    fs::write(&file_path, "initial content").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("seed.txt")).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    // Use a fixed time for signature to avoid CI issues
    let time = Time::new(1_700_000_000, 0);
    let signature = Signature::new("Test User", "test@example.com", &time).unwrap();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial commit",
        &tree,
        &[],
    )
    .unwrap();
}

fn config_for(temp_dir: &TempDir, repo: &Repository) -> Config {
    // Follow whatever default branch name the local git created
    let branch = repo.head().unwrap().shorthand().unwrap().to_string();
    Config {
        repo_path: temp_dir.path().to_path_buf(),
        branch,
        ..Config::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn spec(y: i32, m: u32, d: u32, level: u8) -> CommitSpec {
    CommitSpec {
        date: date(y, m, d),
        level,
    }
}

#[test]
fn test_replay_commit_counts_per_level() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let replayer = Replayer::open(&config_for(&temp_dir, &repo)).unwrap();
    // level 2 -> 3 commits, level 1 -> 1 commit
    let created = replayer
        .replay(&[spec(2024, 3, 5, 2), spec(2024, 3, 4, 1)])
        .unwrap();
    assert_eq!(created, 4);

    let mut revwalk = repo.revwalk().unwrap();
    revwalk.push_head().unwrap();
    assert_eq!(revwalk.count(), 5); // initial + 4 replayed
}

#[test]
fn test_commits_are_backdated_to_noon() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let replayer = Replayer::open(&config_for(&temp_dir, &repo)).unwrap();
    replayer.replay(&[spec(2024, 3, 5, 1)]).unwrap();

    let head = repo.head().unwrap();
    let commit = repo.find_commit(head.target().unwrap()).unwrap();

    let expected = date(2024, 3, 5)
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp();
    assert_eq!(commit.author().when().seconds(), expected);
    assert_eq!(commit.committer().when().seconds(), expected);
    assert_eq!(commit.author().name().unwrap(), "Test User");
    assert_eq!(commit.message().unwrap(), "Pixel 2024-03-05 (1/1)");
}

#[test]
fn test_tracking_file_lines() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let replayer = Replayer::open(&config_for(&temp_dir, &repo)).unwrap();
    replayer.replay(&[spec(2024, 3, 5, 2)]).unwrap();

    let content = fs::read_to_string(temp_dir.path().join("canvas.txt")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Pixel 2024-03-05 1/3 lvl 2");
    assert_eq!(lines[1], "Pixel 2024-03-05 2/3 lvl 2");
    assert_eq!(lines[2], "Pixel 2024-03-05 3/3 lvl 2");
}

#[test]
fn test_replay_orders_by_date_ascending() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let replayer = Replayer::open(&config_for(&temp_dir, &repo)).unwrap();
    // Deliberately unsorted input
    replayer
        .replay(&[spec(2024, 6, 1, 1), spec(2024, 1, 15, 1), spec(2024, 3, 5, 1)])
        .unwrap();

    // Walking from HEAD yields newest first; timestamps must be descending
    let mut revwalk = repo.revwalk().unwrap();
    revwalk.push_head().unwrap();
    let times: Vec<i64> = revwalk
        .map(|oid| {
            repo.find_commit(oid.unwrap())
                .unwrap()
                .author()
                .when()
                .seconds()
        })
        .collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
}

#[test]
fn test_replay_on_unborn_branch() {
    // No initial commit: the first replayed commit has no parent
    let (temp_dir, repo) = setup_test_repo();

    let config = Config {
        repo_path: temp_dir.path().to_path_buf(),
        ..Config::default()
    };
    let replayer = Replayer::open(&config).unwrap();
    let created = replayer.replay(&[spec(2024, 1, 1, 1)]).unwrap();
    assert_eq!(created, 1);

    let head = repo.head().unwrap();
    let commit = repo.find_commit(head.target().unwrap()).unwrap();
    assert_eq!(commit.parent_count(), 0);
}

#[test]
fn test_custom_level_table() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let config = Config {
        levels: LevelMap::new([2, 4, 8, 16]).unwrap(),
        ..config_for(&temp_dir, &repo)
    };
    let replayer = Replayer::open(&config).unwrap();
    let created = replayer.replay(&[spec(2024, 5, 1, 1)]).unwrap();
    assert_eq!(created, 2);
}

#[test]
fn test_empty_specs_create_nothing() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let replayer = Replayer::open(&config_for(&temp_dir, &repo)).unwrap();
    assert_eq!(replayer.replay(&[]).unwrap(), 0);
    assert!(!temp_dir.path().join("canvas.txt").exists());
}

#[test]
fn test_open_fails_outside_a_repository() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        repo_path: temp_dir.path().to_path_buf(),
        ..Config::default()
    };
    assert!(Replayer::open(&config).is_err());
}

#[test]
fn test_push_to_local_remote() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let remote_dir = TempDir::new().unwrap();
    Repository::init_bare(remote_dir.path()).unwrap();
    repo.remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    let config = config_for(&temp_dir, &repo);
    let replayer = Replayer::open(&config).unwrap();
    replayer.replay(&[spec(2024, 1, 15, 1)]).unwrap();
    replayer.push().unwrap();

    let pushed = Repository::open_bare(remote_dir.path()).unwrap();
    let reference = pushed
        .find_reference(&format!("refs/heads/{}", config.branch))
        .unwrap();
    let local_head = repo.head().unwrap().target().unwrap();
    assert_eq!(reference.target().unwrap(), local_head);
}

#[test]
fn test_push_fails_without_remote() {
    let (temp_dir, repo) = setup_test_repo();
    create_initial_commit(&repo, &temp_dir);

    let replayer = Replayer::open(&config_for(&temp_dir, &repo)).unwrap();
    assert!(replayer.push().is_err());
}
