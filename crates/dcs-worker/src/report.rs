//! Detection reports: the worker's output boundary.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dcs_models::{EngagementEstimate, Moment};

use crate::error::WorkerResult;

/// One detected moment with its engagement projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentReport {
    #[serde(flatten)]
    pub moment: Moment,
    pub engagement: EngagementEstimate,
}

/// Per-stream detection result, serialized to one JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Unique id of this detection run
    pub run_id: Uuid,
    /// Source path/URL the stream was read from
    pub source: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    pub moment_count: usize,
    pub moments: Vec<MomentReport>,
}

impl DetectionReport {
    pub fn new(source: impl Into<String>, moments: Vec<(Moment, EngagementEstimate)>) -> Self {
        let moments: Vec<MomentReport> = moments
            .into_iter()
            .map(|(moment, engagement)| MomentReport { moment, engagement })
            .collect();

        Self {
            run_id: Uuid::new_v4(),
            source: source.into(),
            generated_at: Utc::now(),
            moment_count: moments.len(),
            moments,
        }
    }

    /// An empty report for a stream that produced no moments,
    /// including streams that failed to decode.
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.moments.is_empty()
    }

    /// Write the report as `report-<run_id>.json` under `dir`,
    /// creating the directory if needed. Returns the written path.
    pub async fn write_to_dir(&self, dir: impl AsRef<Path>) -> WorkerResult<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(format!("report-{}.json", self.run_id));
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(&path, json).await?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use dcs_models::{MomentMetadata, ScoreSet};

    use super::*;

    fn sample_report() -> DetectionReport {
        let moment = Moment::new(
            12.0,
            30.0,
            ScoreSet::new(0.8, 0.7, 0.9),
            MomentMetadata::default(),
        );
        let estimate = EngagementEstimate {
            engagement_score: 0.81,
            estimated_views: 5052,
            share_probability: 0.972,
            retention_score: 0.729,
            platform_suitability: BTreeSet::new(),
        };
        DetectionReport::new("stream.mp4", vec![(moment, estimate)])
    }

    #[test]
    fn test_report_counts_moments() {
        let report = sample_report();
        assert_eq!(report.moment_count, 1);
        assert!(!report.is_empty());
        assert!(DetectionReport::empty("s.mp4").is_empty());
    }

    #[test]
    fn test_report_serializes_flattened_moments() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();
        let first = &json["moments"][0];
        assert!(first["timestamp"].is_number());
        assert!(first["engagement"]["estimated_views"].is_number());
    }

    #[tokio::test]
    async fn test_write_to_dir_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let path = report.write_to_dir(dir.path()).await.unwrap();

        let raw = tokio::fs::read(&path).await.unwrap();
        let parsed: DetectionReport = serde_json::from_slice(&raw).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.moment_count, 1);
    }
}
