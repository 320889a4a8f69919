//! FFmpeg-backed stream decoding.
//!
//! Two child processes per stream: one decoding video to raw RGB24 at
//! the analysis resolution and sample rate, one decoding audio to
//! mono s16le at 16 kHz. The reader slices both pipes into aligned
//! fixed-size batches.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, warn};

use crate::collaborators::{DecodedStream, SegmentReader, StreamSource};
use crate::error::{DetectError, DetectResult};
use crate::segment::{AudioBatch, FrameBatch, Segment};

/// Audio sample rate fed to the sentiment model.
pub const AUDIO_SAMPLE_RATE: u32 = 16_000;

/// Stream metadata from ffprobe.
#[derive(Debug, Clone)]
pub struct StreamMeta {
    /// Duration in seconds (0.0 when the container does not report one)
    pub duration_secs: f64,
    /// Source width in pixels
    pub width: u32,
    /// Source height in pixels
    pub height: u32,
    /// Source frame rate
    pub fps: f64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Decode tuning: the analysis geometry and batching every stream is
/// normalized to, independent of the source's own resolution or rate.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Analysis frame width
    pub width: u32,
    /// Analysis frame height
    pub height: u32,
    /// Analysis sampling rate in frames per second
    pub fps: f64,
    /// Frames per segment
    pub batch_size: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            width: 224,
            height: 224,
            fps: 30.0,
            batch_size: 32,
        }
    }
}

/// Probe a stream for metadata.
pub async fn probe_stream(source: &str) -> DetectResult<StreamMeta> {
    which::which("ffprobe").map_err(|_| DetectError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(source)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(DetectError::Decode {
            message: format!("ffprobe failed for {source}"),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    meta_from_probe_json(&output.stdout)
}

fn meta_from_probe_json(raw: &[u8]) -> DetectResult<StreamMeta> {
    let probe: FfprobeOutput = serde_json::from_slice(raw)?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| DetectError::decode("no video stream found"))?;

    let duration_secs = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let fps = video_stream
        .avg_frame_rate
        .as_ref()
        .or(video_stream.r_frame_rate.as_ref())
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    Ok(StreamMeta {
        duration_secs,
        width: video_stream.width.unwrap_or(0),
        height: video_stream.height.unwrap_or(0),
        fps,
    })
}

/// Parse a frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    s.parse().ok()
}

/// Stream source decoding through ffmpeg child processes.
#[derive(Debug, Clone, Default)]
pub struct FfmpegStreamSource {
    options: DecodeOptions,
}

impl FfmpegStreamSource {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    fn spawn_video(&self, source: &str) -> DetectResult<Child> {
        let filter = format!(
            "fps={},scale={}:{}",
            self.options.fps, self.options.width, self.options.height
        );

        let child = Command::new("ffmpeg")
            .args(["-v", "error", "-i", source, "-vf", &filter])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(child)
    }

    fn spawn_audio(&self, source: &str) -> DetectResult<Child> {
        let rate = AUDIO_SAMPLE_RATE.to_string();
        let child = Command::new("ffmpeg")
            .args(["-v", "error", "-i", source, "-vn"])
            .args(["-f", "s16le", "-acodec", "pcm_s16le", "-ac", "1", "-ar", &rate, "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(child)
    }
}

#[async_trait]
impl StreamSource for FfmpegStreamSource {
    async fn open(&self, source: &str) -> DetectResult<DecodedStream> {
        // Local paths are checked up front; URLs are left to ffmpeg.
        if !source.contains("://") && !Path::new(source).exists() {
            return Err(DetectError::StreamNotFound(PathBuf::from(source)));
        }

        which::which("ffmpeg").map_err(|_| DetectError::FfmpegNotFound)?;

        let meta = probe_stream(source).await?;
        debug!(
            source,
            duration = meta.duration_secs,
            width = meta.width,
            height = meta.height,
            fps = meta.fps,
            "Opened stream"
        );

        let mut video = self.spawn_video(source)?;
        let video_out = video
            .stdout
            .take()
            .ok_or_else(|| DetectError::decode("ffmpeg video stdout not captured"))?;

        let mut audio = self.spawn_audio(source)?;
        let audio_out = audio
            .stdout
            .take()
            .ok_or_else(|| DetectError::decode("ffmpeg audio stdout not captured"))?;

        let frame_bytes = FrameBatch::frame_bytes(self.options.width, self.options.height);
        // s16le mono: 2 bytes per sample
        let audio_bytes_per_batch = (AUDIO_SAMPLE_RATE as f64 * self.options.batch_size as f64
            / self.options.fps) as usize
            * 2;

        let reader = FfmpegSegmentReader {
            video,
            video_out,
            audio: Some(audio),
            audio_out: Some(audio_out),
            options: self.options,
            frame_bytes,
            audio_bytes_per_batch,
            next_index: 0,
        };

        Ok(DecodedStream {
            duration_secs: meta.duration_secs,
            reader: Box::new(reader),
        })
    }
}

struct FfmpegSegmentReader {
    video: Child,
    video_out: ChildStdout,
    audio: Option<Child>,
    audio_out: Option<ChildStdout>,
    options: DecodeOptions,
    frame_bytes: usize,
    audio_bytes_per_batch: usize,
    next_index: usize,
}

impl FfmpegSegmentReader {
    /// Drain the video child's stderr after EOF and turn a failed exit
    /// into a decode error.
    async fn finish_video(&mut self) -> DetectResult<()> {
        let status = self.video.wait().await?;
        if status.success() {
            return Ok(());
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = self.video.stderr.take() {
            let mut raw = Vec::new();
            if pipe.read_to_end(&mut raw).await.is_ok() {
                stderr = String::from_utf8_lossy(&raw).to_string();
            }
        }

        Err(DetectError::Decode {
            message: format!("ffmpeg exited with {status}"),
            stderr: (!stderr.is_empty()).then_some(stderr),
        })
    }

    /// Read the audio window aligned with the current batch. Missing
    /// or exhausted audio degrades to a silent window.
    async fn read_audio_window(&mut self) -> AudioBatch {
        let Some(out) = self.audio_out.as_mut() else {
            return AudioBatch::silent(AUDIO_SAMPLE_RATE);
        };

        let mut buf = vec![0u8; self.audio_bytes_per_batch];
        match read_up_to(out, &mut buf).await {
            Ok(0) => {
                // Audio ended before video (or the stream has no audio
                // track); drop the pipe and continue silent.
                self.audio_out = None;
                if let Some(mut child) = self.audio.take() {
                    if let Err(e) = child.wait().await {
                        warn!(error = %e, "Audio decoder did not exit cleanly");
                    }
                }
                AudioBatch::silent(AUDIO_SAMPLE_RATE)
            }
            Ok(n) => {
                buf.truncate(n - n % 2);
                AudioBatch {
                    sample_rate: AUDIO_SAMPLE_RATE,
                    samples: buf,
                }
            }
            Err(e) => {
                warn!(error = %e, "Audio read failed, continuing without audio");
                self.audio_out = None;
                AudioBatch::silent(AUDIO_SAMPLE_RATE)
            }
        }
    }
}

#[async_trait]
impl SegmentReader for FfmpegSegmentReader {
    async fn next_segment(&mut self) -> DetectResult<Option<Segment>> {
        let want = self.frame_bytes * self.options.batch_size as usize;
        let mut pixels = vec![0u8; want];
        let got = read_up_to(&mut self.video_out, &mut pixels).await?;

        // Whole frames only; a trailing partial frame is dropped.
        let frame_count = (got / self.frame_bytes) as u32;
        if frame_count == 0 {
            self.finish_video().await?;
            return Ok(None);
        }
        pixels.truncate(frame_count as usize * self.frame_bytes);

        let audio = self.read_audio_window().await;

        let index = self.next_index;
        self.next_index += 1;

        Ok(Some(Segment {
            index,
            start_secs: index as f64 * self.options.batch_size as f64 / self.options.fps,
            frames: FrameBatch {
                width: self.options.width,
                height: self.options.height,
                frame_count,
                pixels,
            },
            audio,
        }))
    }
}

/// Fill `buf` as far as the pipe allows, returning the bytes read.
/// Returns less than `buf.len()` only at end of stream.
async fn read_up_to<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
