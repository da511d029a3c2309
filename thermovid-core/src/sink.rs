// ============================================================================
// thermovid-core/src/sink.rs
// ============================================================================
//
// VIDEO SINK: FFmpeg Process Management and Abstraction
//
// This module provides the video sink abstraction the pipeline writes
// rendered frames into, and a concrete implementation that spawns an ffmpeg
// process (via ffmpeg-sidecar) reading raw RGB frames from stdin and
// encoding an H.264 MP4 file.
//
// The sink is a scoped resource bound to one output file: frames are
// accepted in strict order via next_frame, and close finalizes the encoder
// exactly once. Dropping an unclosed sink kills the encoder and removes the
// partial output so it can never be mistaken for a finished file.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ChildStdin;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use image::RgbImage;

use crate::error::{CoreError, CoreResult};

/// A strictly sequential, append-only stream of RGB frames ending in a
/// single finalization step.
pub trait VideoSink {
    /// Appends one frame. Frames must all have the dimensions the sink was
    /// opened with.
    fn next_frame(&mut self, image: &RgbImage) -> CoreResult<()>;

    /// Finalizes and flushes the output. Must be called exactly once, and
    /// only after every frame has been submitted.
    fn close(&mut self) -> CoreResult<()>;
}

/// Trait for opening sinks, following the dependency injection pattern used
/// for frame sources: the conversion driver is generic over the factory so
/// tests can substitute an encoder that needs no ffmpeg binary.
pub trait SinkFactory {
    type Sink: VideoSink;

    /// Opens a sink bound to `output_path` for frames of the given geometry.
    fn open(
        &self,
        output_path: &Path,
        width: u32,
        height: u32,
        frame_rate: u32,
    ) -> CoreResult<Self::Sink>;
}

/// Factory producing [`FfmpegSink`]s. The default in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegSinkFactory;

impl SinkFactory for FfmpegSinkFactory {
    type Sink = FfmpegSink;

    fn open(
        &self,
        output_path: &Path,
        width: u32,
        height: u32,
        frame_rate: u32,
    ) -> CoreResult<Self::Sink> {
        FfmpegSink::open(output_path, width, height, frame_rate)
    }
}

/// Video sink encoding H.264 MP4 through an ffmpeg child process.
pub struct FfmpegSink {
    child: FfmpegChild,
    stdin: Option<ChildStdin>,
    output_path: PathBuf,
    width: u32,
    height: u32,
    finished: bool,
}

impl FfmpegSink {
    /// Spawns ffmpeg for the given output path and frame geometry.
    ///
    /// The encoder reads rawvideo rgb24 from stdin, so no intermediate
    /// image files are written.
    pub fn open(output_path: &Path, width: u32, height: u32, frame_rate: u32) -> CoreResult<Self> {
        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner()
            .args(["-nostats", "-loglevel", "error"])
            .format("rawvideo")
            .pix_fmt("rgb24")
            .size(width, height)
            .rate(frame_rate as f32)
            .input("pipe:0")
            .codec_video("libx264")
            .args(["-pix_fmt", "yuv420p", "-movflags", "+faststart"])
            .overwrite()
            .output(output_path.to_string_lossy().as_ref());

        log::debug!("Spawning encoder: {cmd:?}");
        let mut child = cmd
            .spawn()
            .map_err(|e| CoreError::CommandStart("ffmpeg".to_string(), e))?;
        let stdin = child.take_stdin().ok_or_else(|| {
            CoreError::SinkWrite("ffmpeg child has no stdin handle".to_string())
        })?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            output_path: output_path.to_path_buf(),
            width,
            height,
            finished: false,
        })
    }

    fn drain_stderr(&mut self) -> String {
        let mut stderr_text = String::new();
        if let Some(mut stderr) = self.child.take_stderr() {
            let _ = stderr.read_to_string(&mut stderr_text);
        }
        stderr_text.trim().to_string()
    }
}

impl VideoSink for FfmpegSink {
    fn next_frame(&mut self, image: &RgbImage) -> CoreResult<()> {
        if (image.width(), image.height()) != (self.width, self.height) {
            return Err(CoreError::SinkWrite(format!(
                "frame is {}x{} but sink was opened for {}x{}",
                image.width(),
                image.height(),
                self.width,
                self.height
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| CoreError::SinkWrite("sink is already closed".to_string()))?;
        stdin
            .write_all(image.as_raw())
            .map_err(|e| CoreError::SinkWrite(format!("failed writing frame to encoder: {e}")))
    }

    fn close(&mut self) -> CoreResult<()> {
        // Dropping stdin signals EOF so the encoder can flush and exit.
        drop(self.stdin.take());
        let stderr_text = self.drain_stderr();
        let status = self
            .child
            .wait()
            .map_err(|e| CoreError::SinkWrite(format!("failed waiting for encoder: {e}")))?;
        if !status.success() {
            return Err(CoreError::CommandFailed(
                "ffmpeg".to_string(),
                if stderr_text.is_empty() {
                    format!("exit status {status}")
                } else {
                    format!("exit status {status}: {stderr_text}")
                },
            ));
        }
        self.finished = true;
        log::debug!("Encoder finalized {}", self.output_path.display());
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // Aborted conversion: kill the encoder and remove the partial
        // output so it is never mistaken for a finished file.
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
        if self.output_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.output_path) {
                log::warn!(
                    "Failed to remove partial output {}: {}",
                    self.output_path.display(),
                    e
                );
            }
        }
    }
}

// FfmpegSink needs an ffmpeg binary to exercise, so its coverage lives in
// the pipeline tests' mock sink plus manual runs against real recordings.
