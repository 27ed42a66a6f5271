use tracing::info;

use crate::config::{BuildConfig, RotationSource};
use crate::engine::{find_mad_files, merge_rotations, read_mad_files};
use crate::model::RotationTable;
use crate::publish::{stage_artifacts, write_artifacts, GitPublisher, PublishOutcome};
use crate::rotation::{fetch_rotations, load_rotations};
use crate::Result;

/// Summary of one generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub mad_files: usize,
    pub sets: usize,
    pub rotations: usize,
    pub backfilled: usize,
    pub digest: String,
    /// `None` when publishing was disabled
    pub outcome: Option<PublishOutcome>,
}

/// Handler for the full fetch, scan, merge, package and publish pipeline
pub struct BuildCommand {
    pub config: BuildConfig,
}

impl BuildCommand {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    async fn rotations(&self) -> Result<RotationTable> {
        match &self.config.rotations {
            RotationSource::Url(url) => fetch_rotations(url).await,
            RotationSource::File(path) => load_rotations(path),
        }
    }

    pub async fn execute(&self) -> Result<BuildReport> {
        let config = &self.config;

        let rotations = self.rotations().await?;

        let paths = find_mad_files(&config.mad_dir)?;
        let mut database = read_mad_files(&paths);
        let backfilled = merge_rotations(&mut database, &rotations);

        let publisher = config.publish.then(|| {
            GitPublisher::new(&config.repo_dir)
                .with_remote(config.remote.as_str())
                .with_branch(config.branch.as_str())
        });

        // The orphan branch wipes tracked files, so it must exist before the
        // artifacts are written.
        if let Some(publisher) = &publisher {
            publisher.prepare_branch()?;
        }

        let artifacts = write_artifacts(&database, &config.output_dir)?;

        let outcome = match &publisher {
            Some(publisher) => {
                stage_artifacts(&artifacts.zip, &artifacts.md5, &config.repo_dir)?;
                Some(publisher.publish()?)
            }
            None => {
                info!("Publishing disabled, artifacts left in {}", config.output_dir.display());
                None
            }
        };

        Ok(BuildReport {
            mad_files: paths.len(),
            sets: database.len(),
            rotations: rotations.len(),
            backfilled,
            digest: artifacts.digest,
            outcome,
        })
    }
}
