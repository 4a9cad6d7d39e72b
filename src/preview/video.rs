//! The external video encoder boundary.
//!
//! The renderer only ever talks to a `VideoEncoder`; `FfmpegEncoder` is the
//! process-backed implementation. A missing binary is the one failure the
//! renderer recovers from, so it gets its own error variant.

use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ImgcolError;

/// **CONTRACT:** Runs the encoder with the given arguments and blocks until it exits.
///
/// Must return `ExternalEncoderUnavailable` when the encoder itself cannot be
/// found and `ExternalEncoderFailure` for every other failure.
pub trait VideoEncoder {
    fn run(&self, args: &[OsString]) -> Result<(), ImgcolError>;
}

/// Invokes an `ffmpeg` binary as a subprocess. No timeout is applied.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(binary: impl AsRef<OsStr>) -> Self {
        Self {
            binary: PathBuf::from(binary.as_ref()),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn run(&self, args: &[OsString]) -> Result<(), ImgcolError> {
        let output = match Command::new(&self.binary).args(args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ImgcolError::ExternalEncoderUnavailable(format!(
                    "{}: {}",
                    self.binary.display(),
                    e
                )))
            }
            Err(e) => {
                return Err(ImgcolError::ExternalEncoderFailure(format!(
                    "could not start {}: {}",
                    self.binary.display(),
                    e
                )))
            }
        };

        if output.status.success() {
            Ok(())
        } else {
            Err(ImgcolError::ExternalEncoderFailure(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// The fixed argument list that turns numbered PNG frames into an H.264 mp4.
pub fn video_args(framerate: u32, input_pattern: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-framerate".to_string(),
        framerate.to_string(),
        "-i".to_string(),
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(input_pattern.as_os_str().to_owned());
    args.extend(
        [
            // Browsers do not play ffmpeg's default codec.
            "-vcodec",
            "h264",
            // yuv420p for compatibility with simple players.
            "-pix_fmt",
            "yuv420p",
            // H.264 needs even dimensions.
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}
