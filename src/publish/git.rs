//! Publishing artifacts to an orphan branch
//!
//! The branch is rebuilt from scratch on every run and force-pushed, so the
//! remote only ever holds one commit with the archive and its digest.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::archive::{MD5_FILE, ZIP_FILE};
use super::command::Command;
use crate::{MadDbError, Result};

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "db";
pub const COMMIT_MESSAGE: &str = "BOT: Releasing new MAD database.";

/// What happened when publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The branch was force-pushed
    Published,
    /// The remote branch already holds identical content
    NothingToUpdate,
}

/// Git publisher bound to a working tree
#[derive(Debug, Clone)]
pub struct GitPublisher {
    pub repo_dir: PathBuf,
    pub remote: String,
    pub branch: String,
    pub commit_message: String,
}

impl GitPublisher {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            commit_message: COMMIT_MESSAGE.to_string(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    fn git<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Command::new("git").args(args).current_dir(&self.repo_dir)
    }

    fn remote_ref(&self) -> String {
        format!("refs/remotes/{}/{}", self.remote, self.branch)
    }

    /// Switch to a fresh orphan branch and drop every tracked file from the
    /// index and the working tree.
    ///
    /// Run this before the artifacts are written into `repo_dir`, otherwise a
    /// tracked copy of them on the current branch would be removed as well.
    pub fn prepare_branch(&self) -> Result<()> {
        info!("Creating orphan branch {} in {}", self.branch, self.repo_dir.display());

        self.git(["checkout", "--orphan", self.branch.as_str()]).run()?;
        self.git(["rm", "-r", "-f", "-q", "--ignore-unmatch", "."]).run()?;
        Ok(())
    }

    /// Commit `mad_db.json.zip` and its digest on the orphan branch and
    /// force-push it unless the remote tip already has the same tree.
    ///
    /// Expects [`prepare_branch`](Self::prepare_branch) to have run and both
    /// files to exist in `repo_dir`.
    pub fn publish(&self) -> Result<PublishOutcome> {
        for file in [ZIP_FILE, MD5_FILE] {
            if !self.repo_dir.join(file).is_file() {
                return Err(MadDbError::Config(format!(
                    "{} not found in {}",
                    file,
                    self.repo_dir.display()
                )));
            }
        }

        info!("Publishing to {}/{}", self.remote, self.branch);

        self.git(["add", MD5_FILE]).run()?;
        self.git(["add", ZIP_FILE]).run()?;

        let commit = self
            .git(["commit", "-m", self.commit_message.as_str()])
            .execute()?;
        if !commit.success {
            warn!("git commit exited with {:?}, continuing", commit.exit_code);
        }

        let refspec = format!("+refs/heads/{}:{}", self.branch, self.remote_ref());
        let fetch = self
            .git(["fetch", self.remote.as_str(), refspec.as_str()])
            .execute()?;

        if fetch.success {
            let diff = self
                .git(["diff", "--quiet", "HEAD", self.remote_ref().as_str()])
                .execute()?;
            match diff.exit_code {
                Some(0) => {
                    println!("Nothing to be updated.");
                    info!("Remote branch {} is up to date", self.branch);
                    return Ok(PublishOutcome::NothingToUpdate);
                }
                Some(1) => {}
                code => {
                    return Err(MadDbError::CommandFailed {
                        command: format!("git diff --quiet HEAD {}", self.remote_ref()),
                        code,
                    })
                }
            }
        } else {
            info!("Remote branch {} not found, publishing fresh", self.branch);
        }

        self.git([
            "push",
            "--force",
            self.remote.as_str(),
            self.branch.as_str(),
        ])
        .run()?;

        info!("Published {} to {}/{}", ZIP_FILE, self.remote, self.branch);
        Ok(PublishOutcome::Published)
    }
}

/// Copy the archive and digest into the repository when built elsewhere
pub fn stage_artifacts(zip: &Path, md5: &Path, repo_dir: &Path) -> Result<()> {
    for (source, name) in [(zip, ZIP_FILE), (md5, MD5_FILE)] {
        let dest = repo_dir.join(name);
        if dest.exists() && std::fs::canonicalize(source)? == std::fs::canonicalize(&dest)? {
            continue;
        }
        std::fs::copy(source, &dest)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let publisher = GitPublisher::new(".");
        assert_eq!(publisher.remote, "origin");
        assert_eq!(publisher.branch, "db");
        assert_eq!(publisher.commit_message, "BOT: Releasing new MAD database.");
        assert_eq!(publisher.remote_ref(), "refs/remotes/origin/db");
    }

    #[test]
    fn test_missing_artifacts_fail_before_git() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = GitPublisher::new(temp_dir.path()).publish().unwrap_err();
        assert!(matches!(err, MadDbError::Config(_)));
    }

    #[test]
    fn test_stage_artifacts_copies_and_skips_self() {
        let build_dir = tempfile::TempDir::new().unwrap();
        let repo_dir = tempfile::TempDir::new().unwrap();
        let zip = build_dir.path().join(ZIP_FILE);
        let md5 = build_dir.path().join(MD5_FILE);
        std::fs::write(&zip, b"PK").unwrap();
        std::fs::write(&md5, "abc").unwrap();

        stage_artifacts(&zip, &md5, repo_dir.path()).unwrap();
        assert_eq!(std::fs::read(repo_dir.path().join(ZIP_FILE)).unwrap(), b"PK");

        // Staging into the directory the files already live in leaves them intact
        stage_artifacts(&zip, &md5, build_dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&md5).unwrap(), "abc");
    }
}
