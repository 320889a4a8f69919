//! Moment detection: sliding a batch window over a decoded stream.

use tokio::sync::watch;
use tracing::{debug, error, info};

use dcs_models::{DetectionConfig, Moment, MomentMetadata};

use crate::classify::classify_content_type;
use crate::collaborators::StreamSource;
use crate::duration::DurationPlanner;
use crate::error::DetectResult;
use crate::overlap::OverlapResolver;
use crate::platforms::recommend_platforms;
use crate::scorer::SegmentScorer;

/// Detector tunables independent of the detection thresholds.
#[derive(Debug, Clone, Copy)]
pub struct DetectorOptions {
    /// Frames per scoring window. Independent of fps: the window
    /// covers `batch_size / fps` seconds of stream time.
    pub batch_size: u32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self { batch_size: 32 }
    }
}

/// Slides a fixed-size batch window over a stream and emits candidate
/// moments that clear the configured thresholds.
///
/// A detection run is synchronous and single-threaded per stream:
/// batches are scored strictly in timestamp order, and the complete
/// candidate list is handed to overlap resolution afterwards. Each
/// run owns its own config snapshot; re-running with different config
/// produces independent results.
pub struct MomentDetector {
    config: DetectionConfig,
    scorer: SegmentScorer,
    planner: DurationPlanner,
    options: DetectorOptions,
}

impl MomentDetector {
    /// Build a detector, rejecting invalid configuration before any
    /// run starts.
    pub fn new(
        config: DetectionConfig,
        scorer: SegmentScorer,
        options: DetectorOptions,
    ) -> DetectResult<Self> {
        config.validate()?;
        let planner = DurationPlanner::new(&config);

        Ok(Self {
            config,
            scorer,
            planner,
            options,
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect candidate moments in timestamp order.
    ///
    /// Fail-soft boundary: a stream that cannot be decoded yields an
    /// empty sequence with a logged error, never a panic or an `Err`.
    /// Callers must not assume non-empty output signals success. The
    /// call is not restartable; a fresh call re-decodes the stream.
    pub async fn detect(&self, source: &dyn StreamSource, path: &str) -> Vec<Moment> {
        self.detect_cancellable(source, path, None).await
    }

    /// Same as [`detect`](Self::detect), with best-effort cooperative
    /// cancellation checked at each batch boundary. On cancellation
    /// the candidates collected so far are returned.
    pub async fn detect_cancellable(
        &self,
        source: &dyn StreamSource,
        path: &str,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Vec<Moment> {
        match self.scan(source, path, cancel).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(source = path, error = %e, "Moment detection failed, returning empty result");
                Vec::new()
            }
        }
    }

    /// Detect, then reduce candidates to a non-overlapping set ranked
    /// by viral probability.
    pub async fn detect_and_resolve(
        &self,
        source: &dyn StreamSource,
        path: &str,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Vec<Moment> {
        let candidates = self.detect_cancellable(source, path, cancel).await;
        OverlapResolver::new().resolve(&candidates)
    }

    async fn scan(
        &self,
        source: &dyn StreamSource,
        path: &str,
        cancel: Option<watch::Receiver<bool>>,
    ) -> DetectResult<Vec<Moment>> {
        let stream = source.open(path).await?;
        let mut reader = stream.reader;
        let stream_len = stream.duration_secs;

        let batch_window = self.options.batch_size as f64 / self.config.fps;
        let mut candidates = Vec::new();

        loop {
            if cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
                info!(
                    source = path,
                    candidates = candidates.len(),
                    "Detection cancelled, returning partial candidates"
                );
                break;
            }

            // A mid-stream decode error keeps the candidates collected
            // so far rather than aborting the run.
            let segment = match reader.next_segment().await {
                Ok(Some(segment)) => segment,
                Ok(None) => break,
                Err(e) => {
                    error!(
                        source = path,
                        candidate_count = candidates.len(),
                        error = %e,
                        "Decode failed mid-stream, keeping partial results"
                    );
                    break;
                }
            };

            let timestamp = segment.index as f64 * batch_window;
            let (scores, audio_sentiment, tensor) = self.scorer.score_with_context(&segment).await;

            // Either signal alone qualifies the window (strict >).
            let qualifies = scores.viral_probability > self.config.viral_threshold
                || scores.interest > self.config.interest_threshold;
            if !qualifies {
                continue;
            }

            let mut duration = self.planner.plan(scores.interest, scores.viral_probability);
            if stream_len > 0.0 {
                // A moment never extends past the end of the stream.
                if timestamp >= stream_len {
                    continue;
                }
                duration = duration.min(stream_len - timestamp);
            }

            let metadata = MomentMetadata {
                audio_sentiment,
                content_type: classify_content_type(tensor.as_ref()),
                recommended_platforms: recommend_platforms(duration, &scores),
            };

            debug!(
                source = path,
                batch = segment.index,
                timestamp,
                duration,
                viral = scores.viral_probability,
                interest = scores.interest,
                "Candidate moment detected"
            );

            candidates.push(Moment::new(timestamp, duration, scores, metadata));
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use ndarray::Array3;

    use super::*;
    use crate::collaborators::{
        DecodedStream, MockSentimentClassifier, MockViralPredictor, FeatureExtractor,
        FeatureTensor, SegmentReader, SentimentScore,
    };
    use crate::error::DetectError;
    use crate::segment::{AudioBatch, FrameBatch, Segment};

    /// Stream source yielding a scripted number of segments.
    struct ScriptedSource {
        segments: usize,
        duration_secs: f64,
    }

    struct ScriptedReader {
        remaining: usize,
        next_index: usize,
    }

    #[async_trait]
    impl SegmentReader for ScriptedReader {
        async fn next_segment(&mut self) -> DetectResult<Option<Segment>> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            let index = self.next_index;
            self.next_index += 1;

            Ok(Some(Segment {
                index,
                start_secs: index as f64,
                frames: FrameBatch {
                    width: 2,
                    height: 2,
                    frame_count: 1,
                    pixels: vec![0; 12],
                },
                audio: AudioBatch::silent(16_000),
            }))
        }
    }

    #[async_trait]
    impl StreamSource for ScriptedSource {
        async fn open(&self, _source: &str) -> DetectResult<DecodedStream> {
            Ok(DecodedStream {
                duration_secs: self.duration_secs,
                reader: Box::new(ScriptedReader {
                    remaining: self.segments,
                    next_index: 0,
                }),
            })
        }
    }

    /// Source whose open always fails with a decode error.
    struct UnreadableSource;

    #[async_trait]
    impl StreamSource for UnreadableSource {
        async fn open(&self, source: &str) -> DetectResult<DecodedStream> {
            Err(DetectError::decode(format!("cannot read {source}")))
        }
    }

    /// Feature extractor yielding a constant activation, so interest
    /// equals the activation exactly.
    struct ConstantFeatures(f32);

    #[async_trait]
    impl FeatureExtractor for ConstantFeatures {
        async fn extract(&self, _frames: &FrameBatch) -> DetectResult<FeatureTensor> {
            Ok(Array3::from_elem((1, 4, 2), self.0))
        }
    }

    fn detector(interest: f32, viral: f64, config: DetectionConfig) -> MomentDetector {
        let mut sentiment = MockSentimentClassifier::new();
        sentiment.expect_classify().returning(|_| {
            Ok(SentimentScore {
                label: "NEUTRAL".to_string(),
                score: 0.6,
            })
        });

        let mut predictor = MockViralPredictor::new();
        predictor
            .expect_predict()
            .returning(move |_: &[f64]| Ok(viral));

        let scorer = SegmentScorer::new(
            Arc::new(ConstantFeatures(interest)),
            Arc::new(sentiment),
            Arc::new(predictor),
        );

        MomentDetector::new(config, scorer, DetectorOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_at_construction() {
        let config = DetectionConfig {
            min_clip_duration: 90.0,
            max_clip_duration: 60.0,
            ..Default::default()
        };
        let mut sentiment = MockSentimentClassifier::new();
        sentiment.expect_classify().never();
        let mut predictor = MockViralPredictor::new();
        predictor.expect_predict().never();

        let scorer = SegmentScorer::new(
            Arc::new(ConstantFeatures(0.5)),
            Arc::new(sentiment),
            Arc::new(predictor),
        );
        assert!(MomentDetector::new(config, scorer, DetectorOptions::default()).is_err());
    }

    #[tokio::test]
    async fn test_undecodable_stream_yields_empty_not_error() {
        let det = detector(0.9, 0.9, DetectionConfig::default());
        let moments = det.detect(&UnreadableSource, "missing.mp4").await;
        assert!(moments.is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream_yields_empty() {
        let det = detector(0.9, 0.9, DetectionConfig::default());
        let source = ScriptedSource {
            segments: 0,
            duration_secs: 0.0,
        };
        assert!(det.detect(&source, "empty.mp4").await.is_empty());
    }

    #[tokio::test]
    async fn test_viral_at_threshold_does_not_qualify() {
        // interest low, viral exactly at the threshold: strict >
        let config = DetectionConfig::default();
        let det = detector(0.1, config.viral_threshold, config);
        let source = ScriptedSource {
            segments: 3,
            duration_secs: 600.0,
        };
        assert!(det.detect(&source, "s.mp4").await.is_empty());
    }

    #[tokio::test]
    async fn test_viral_just_above_threshold_qualifies() {
        let config = DetectionConfig::default();
        let det = detector(0.1, config.viral_threshold + 1e-6, config);
        let source = ScriptedSource {
            segments: 3,
            duration_secs: 600.0,
        };
        assert_eq!(det.detect(&source, "s.mp4").await.len(), 3);
    }

    #[tokio::test]
    async fn test_interest_alone_qualifies() {
        // viral far below threshold, interest above: OR semantics
        let det = detector(0.75, 0.1, DetectionConfig::default());
        let source = ScriptedSource {
            segments: 2,
            duration_secs: 600.0,
        };
        assert_eq!(det.detect(&source, "s.mp4").await.len(), 2);
    }

    #[tokio::test]
    async fn test_timestamps_follow_batch_index() {
        let det = detector(0.9, 0.9, DetectionConfig::default());
        let source = ScriptedSource {
            segments: 3,
            duration_secs: 600.0,
        };
        let moments = det.detect(&source, "s.mp4").await;

        // batch_size 32 at 30 fps
        let window = 32.0 / 30.0;
        let timestamps: Vec<f64> = moments.iter().map(|m| m.timestamp).collect();
        assert_eq!(timestamps, vec![0.0, window, 2.0 * window]);
    }

    #[tokio::test]
    async fn test_duration_capped_at_stream_end() {
        let det = detector(0.9, 0.9, DetectionConfig::default());
        // two windows, stream only 3 seconds long
        let source = ScriptedSource {
            segments: 2,
            duration_secs: 3.0,
        };
        let moments = det.detect(&source, "s.mp4").await;

        assert!(!moments.is_empty());
        for m in &moments {
            assert!(m.end() <= 3.0 + 1e-9);
        }
    }

    #[tokio::test]
    async fn test_metadata_attached_to_candidates() {
        let det = detector(0.9, 0.9, DetectionConfig::default());
        let source = ScriptedSource {
            segments: 1,
            duration_secs: 600.0,
        };
        let moments = det.detect(&source, "s.mp4").await;

        let metadata = &moments[0].metadata;
        assert!((metadata.audio_sentiment.neutral - 0.6).abs() < 1e-9);
        assert!(!metadata.recommended_platforms.is_empty());
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_returns_no_candidates() {
        let det = detector(0.9, 0.9, DetectionConfig::default());
        let source = ScriptedSource {
            segments: 5,
            duration_secs: 600.0,
        };

        let (tx, rx) = watch::channel(true);
        let moments = det.detect_cancellable(&source, "s.mp4", Some(rx)).await;
        drop(tx);
        assert!(moments.is_empty());
    }

    #[tokio::test]
    async fn test_detect_and_resolve_outputs_disjoint_set() {
        let config = DetectionConfig {
            // long minimum so consecutive windows overlap
            min_clip_duration: 30.0,
            max_clip_duration: 60.0,
            ..Default::default()
        };
        let det = detector(0.9, 0.9, config);
        let source = ScriptedSource {
            segments: 6,
            duration_secs: 600.0,
        };
        let moments = det.detect_and_resolve(&source, "s.mp4", None).await;

        assert!(!moments.is_empty());
        for (i, a) in moments.iter().enumerate() {
            for b in moments.iter().skip(i + 1) {
                assert!(!a.overlaps(b));
            }
        }
    }
}
