//! Git change context for the current build.
//!
//! Locates the point where the current branch forked from the base branch
//! and reports what changed since then. Used both to classify build targets
//! and to print a change summary at the start of pull request builds.
use git2::{BranchType, DiffStatsFormat, Oid, Sort};
use log::*;
use std::{collections::BTreeSet, fmt, path::Path};

#[cfg(test)]
use mockall::automock;

use crate::Result;

const SHORT_SHA_LEN: usize = 7;
const DIFF_STAT_WIDTH: usize = 80;

fn short_sha(oid: Oid) -> String {
    let sha = oid.to_string();
    sha[..SHORT_SHA_LEN.min(sha.len())].to_string()
}

/// What changed on the current branch since it forked from the base branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Short sha of `HEAD`.
    pub head: String,
    /// Branch the change is compared against.
    pub base_branch: String,
    /// Short sha of the merge base between `HEAD` and the base branch.
    pub fork_point: String,
    /// `git diff --stat` style summary of changed files.
    pub diff_stat: String,
    /// One line per commit since the fork point, newest first.
    pub commits: Vec<String>,
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Testing the following changes at commit {}", self.head)?;
        writeln!(f, "{}", self.diff_stat.trim_end())?;
        writeln!(
            f,
            "Commit log since branch was forked from {} at {}:",
            self.base_branch, self.fork_point
        )?;
        for commit in &self.commits {
            writeln!(f, "{commit}")?;
        }
        Ok(())
    }
}

/// Local git repository the build runs in.
pub struct Repository {
    base_branch: String,
    repo: git2::Repository,
}

impl Repository {
    /// Open the repository containing `path` and compare against
    /// `base_branch`.
    pub fn open(path: &Path, base_branch: &str) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        debug!("opened repository at {}", repo.path().display());
        Ok(Self {
            base_branch: base_branch.to_string(),
            repo,
        })
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        Ok(self.repo.head()?.peel_to_commit()?)
    }

    // Prefer the remote tracking branch since CI checkouts rarely carry an
    // up-to-date local copy of the base branch.
    fn base_commit(&self) -> Result<git2::Commit<'_>> {
        let remote_name = format!("origin/{}", self.base_branch);

        if let Ok(branch) = self.repo.find_branch(&remote_name, BranchType::Remote)
        {
            return Ok(branch.get().peel_to_commit()?);
        }

        debug!(
            "remote branch {remote_name} not found: falling back to local {}",
            self.base_branch
        );

        let branch =
            self.repo.find_branch(&self.base_branch, BranchType::Local)?;

        Ok(branch.get().peel_to_commit()?)
    }

    /// Commit the current branch forked from.
    pub fn fork_point(&self) -> Result<Oid> {
        let head = self.head_commit()?;
        let base = self.base_commit()?;
        Ok(self.repo.merge_base(head.id(), base.id())?)
    }

    fn diff_since_fork_point(&self) -> Result<git2::Diff<'_>> {
        let fork_tree = self.repo.find_commit(self.fork_point()?)?.tree()?;
        let head_tree = self.head_commit()?.tree()?;

        Ok(self.repo.diff_tree_to_tree(
            Some(&fork_tree),
            Some(&head_tree),
            None,
        )?)
    }

    /// Repository relative paths changed since the fork point, sorted.
    pub fn changed_files(&self) -> Result<Vec<String>> {
        let diff = self.diff_since_fork_point()?;
        let mut files = BTreeSet::new();

        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path() {
                    files.insert(path.to_string_lossy().to_string());
                }
            }
        }

        Ok(files.into_iter().collect())
    }

    pub fn change_summary(&self) -> Result<ChangeSummary> {
        let head = self.head_commit()?;
        let fork_point = self.fork_point()?;

        let stats = self.diff_since_fork_point()?.stats()?;
        let diff_stat = stats
            .to_buf(DiffStatsFormat::FULL, DIFF_STAT_WIDTH)?
            .as_str()
            .unwrap_or_default()
            .to_string();

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(head.id())?;
        walk.hide(fork_point)?;

        let mut commits = vec![];

        for oid in walk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(format!(
                "{} {}",
                short_sha(commit.id()),
                commit.summary().unwrap_or_default()
            ));
        }

        Ok(ChangeSummary {
            head: short_sha(head.id()),
            base_branch: self.base_branch.clone(),
            fork_point: short_sha(fork_point),
            diff_stat,
            commits,
        })
    }
}

/// Prints a human readable summary of the change under test.
#[cfg_attr(test, automock)]
pub trait ChangeReporter {
    fn print_change_summary(&self, label: &str) -> Result<()>;
}

/// Writes the git change summary to standard output.
pub struct GitChangeReporter<'a> {
    repo: &'a Repository,
}

impl<'a> GitChangeReporter<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }
}

impl ChangeReporter for GitChangeReporter<'_> {
    fn print_change_summary(&self, label: &str) -> Result<()> {
        let summary = self.repo.change_summary()?;
        println!("{label}: {summary}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::TempDir;

    use super::*;

    struct TestRepo {
        tmp_dir: TempDir,
        repo: git2::Repository,
    }

    impl TestRepo {
        fn new() -> Self {
            let tmp_dir = TempDir::new().unwrap();
            let mut opts = git2::RepositoryInitOptions::new();
            opts.initial_head("master");
            let repo =
                git2::Repository::init_opts(tmp_dir.path(), &opts).unwrap();
            Self { tmp_dir, repo }
        }

        fn commit_file(&self, path: &str, message: &str) -> Oid {
            let full_path = self.tmp_dir.path().join(path);
            fs::create_dir_all(full_path.parent().unwrap()).unwrap();
            fs::write(&full_path, message).unwrap();

            let mut index = self.repo.index().unwrap();
            index.add_path(Path::new(path)).unwrap();
            index.write().unwrap();

            let tree_id = index.write_tree().unwrap();
            let tree = self.repo.find_tree(tree_id).unwrap();
            let sig =
                git2::Signature::now("Tester", "tester@example.com").unwrap();

            let parents = match self.repo.head() {
                Ok(head) => vec![head.peel_to_commit().unwrap()],
                Err(_) => vec![],
            };
            let parent_refs = parents.iter().collect::<Vec<&git2::Commit>>();

            self.repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
                .unwrap()
        }

        fn start_branch(&self, name: &str) {
            let head = self.repo.head().unwrap().peel_to_commit().unwrap();
            self.repo.branch(name, &head, false).unwrap();
            self.repo.set_head(&format!("refs/heads/{name}")).unwrap();
        }

        fn open(&self) -> Repository {
            Repository::open(self.tmp_dir.path(), "master").unwrap()
        }
    }

    #[test]
    fn changed_files_lists_files_since_fork_point() {
        let test_repo = TestRepo::new();
        test_repo.commit_file("README.md", "initial");
        test_repo.start_branch("feature");
        test_repo.commit_file("src/runtime.js", "feat: runtime");
        test_repo.commit_file("test/unit/test-runtime.js", "test: runtime");

        let repo = test_repo.open();
        let files = repo.changed_files().unwrap();

        assert_eq!(
            files,
            vec![
                "src/runtime.js".to_string(),
                "test/unit/test-runtime.js".to_string()
            ]
        );
    }

    #[test]
    fn changed_files_is_empty_on_base_branch() {
        let test_repo = TestRepo::new();
        test_repo.commit_file("README.md", "initial");
        test_repo.commit_file("src/runtime.js", "feat: runtime");

        let repo = test_repo.open();

        assert!(repo.changed_files().unwrap().is_empty());
    }

    #[test]
    fn change_summary_reports_commits_since_fork() {
        let test_repo = TestRepo::new();
        let fork = test_repo.commit_file("README.md", "initial");
        test_repo.start_branch("feature");
        test_repo.commit_file("src/a.js", "first change");
        let head = test_repo.commit_file("src/b.js", "second change");

        let repo = test_repo.open();
        let summary = repo.change_summary().unwrap();

        assert_eq!(summary.head, short_sha(head));
        assert_eq!(summary.fork_point, short_sha(fork));
        assert_eq!(summary.base_branch, "master");
        assert_eq!(summary.commits.len(), 2);
        assert!(summary.commits[0].ends_with("second change"));
        assert!(summary.commits[1].ends_with("first change"));
        assert!(summary.diff_stat.contains("2 files changed"));

        let rendered = summary.to_string();
        assert!(rendered.contains("forked from master"));
        assert!(rendered.contains("first change"));
    }

    #[test]
    fn changed_files_fails_for_missing_base_branch() {
        let test_repo = TestRepo::new();
        test_repo.commit_file("README.md", "initial");

        let repo =
            Repository::open(test_repo.tmp_dir.path(), "does-not-exist")
                .unwrap();

        assert!(repo.changed_files().is_err());
    }

    #[test]
    fn open_fails_outside_repository() {
        let tmp_dir = TempDir::new().unwrap();
        assert!(Repository::open(tmp_dir.path(), "master").is_err());
    }
}
