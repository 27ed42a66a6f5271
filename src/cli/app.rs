use clap::Parser;
use std::path::PathBuf;

use crate::config::{BuildConfig, RotationSource, DEFAULT_MAD_DIR, DEFAULT_ROTATIONS_URL};
use crate::publish::git::{DEFAULT_BRANCH, DEFAULT_REMOTE};

/// mad-db: MAD arcade set database generator
#[derive(Parser, Debug)]
#[command(name = "mad-db")]
#[command(version)]
#[command(about = "Builds the MAD set database and publishes it to a git branch")]
#[command(
    long_about = "Scans a tree of .mad descriptor files, backfills rotations from the remote rotation list, writes mad_db.json.zip with its MD5 and force-pushes both to an orphan branch."
)]
pub struct Cli {
    /// Directory scanned recursively for .mad files
    #[arg(long, default_value = DEFAULT_MAD_DIR)]
    pub mad_dir: PathBuf,

    /// URL of the `setname,rotN` rotation list
    #[arg(long, default_value = DEFAULT_ROTATIONS_URL)]
    pub rotations_url: String,

    /// Read the rotation list from a local file instead of the URL
    #[arg(long, conflicts_with = "rotations_url")]
    pub rotations_file: Option<PathBuf>,

    /// Directory the JSON, zip and md5 artifacts are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Git working tree to publish from
    #[arg(long, default_value = ".")]
    pub repo_dir: PathBuf,

    /// Git remote to push to
    #[arg(long, default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Orphan branch holding the published artifacts
    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Build the artifacts but skip all git steps
    #[arg(long)]
    pub no_publish: bool,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Resolve the parsed flags into a run configuration
    pub fn into_config(self) -> BuildConfig {
        let rotations = match self.rotations_file {
            Some(path) => RotationSource::File(path),
            None => RotationSource::Url(self.rotations_url),
        };

        BuildConfig {
            mad_dir: self.mad_dir,
            rotations,
            output_dir: self.output_dir,
            repo_dir: self.repo_dir,
            remote: self.remote,
            branch: self.branch,
            publish: !self.no_publish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_arguments_is_default_config() {
        let cli = Cli::parse_from(["mad-db"]);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.into_config(), BuildConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "mad-db",
            "--mad-dir",
            "descriptors",
            "--rotations-file",
            "rot.csv",
            "--output-dir",
            "out",
            "--remote",
            "upstream",
            "--branch",
            "release",
            "--no-publish",
        ]);

        let config = cli.into_config();
        assert_eq!(config.mad_dir, PathBuf::from("descriptors"));
        assert_eq!(config.rotations, RotationSource::File(PathBuf::from("rot.csv")));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.repo_dir, PathBuf::from("."));
        assert_eq!(config.remote, "upstream");
        assert_eq!(config.branch, "release");
        assert!(!config.publish);
    }

    #[test]
    fn test_rotation_sources_conflict() {
        let result = Cli::try_parse_from([
            "mad-db",
            "--rotations-url",
            "http://example.invalid/rot.csv",
            "--rotations-file",
            "rot.csv",
        ]);
        assert!(result.is_err());
    }
}
