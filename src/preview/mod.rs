// In: src/preview/mod.rs

//! HTML previews of decoded image records.
//!
//! Single images become a base64 PNG `<img>` thumbnail. Frame stacks become
//! an mp4 `<video>` encoded by an external encoder, or an animated GIF
//! `<img>` when that encoder is not installed.

pub mod colormap;
pub mod thumbnail;
pub mod video;

use std::ffi::OsString;
use std::io::Cursor;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat};

use crate::config::PreviewConfig;
use crate::error::ImgcolError;
use crate::types::PixelArray;
use crate::utils::encode_base64;

pub use thumbnail::create_thumbnail;
pub use video::{video_args, FfmpegEncoder, VideoEncoder};

/// Returned instead of an empty animation.
pub const NO_FRAMES_MESSAGE: &str = "Video with 0 frames.";

/// Renders decoded pixel arrays as HTML fragments.
pub struct PreviewRenderer<E: VideoEncoder> {
    config: PreviewConfig,
    use_colormap: bool,
    encoder: E,
}

impl<E: VideoEncoder> PreviewRenderer<E> {
    pub fn new(config: PreviewConfig, use_colormap: bool, encoder: E) -> Self {
        Self {
            config,
            use_colormap,
            encoder,
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// A `(h, w, c)` image as a thumbnail `<img>` tag.
    pub fn render_single(&self, image: &PixelArray) -> Result<String, ImgcolError> {
        let thumb = create_thumbnail(image, self.use_colormap, self.config.thumbnail_size)?;
        let mut png = Cursor::new(Vec::new());
        thumb.write_to(&mut png, ImageFormat::Png)?;
        Ok(format!(
            r#"<img src="data:image/png;base64,{}" alt="Img" />"#,
            encode_base64(png.get_ref())
        ))
    }

    /// A `(frames, h, w, c)` stack as a `<video>`, a GIF `<img>`, or, for a
    /// single frame, the same output as [`PreviewRenderer::render_single`].
    pub fn render_batch(&self, frames: &PixelArray) -> Result<String, ImgcolError> {
        if frames.ndim() != 4 {
            return Err(ImgcolError::UnsupportedInput(format!(
                "frame sequences must be (frames, height, width, channels), got shape {:?}",
                frames.shape()
            )));
        }
        let num_frames = frames.len_of_first_axis();
        if num_frames == 1 {
            return self.render_single(&frames.frame(0)?);
        }

        let thumbs = (0..num_frames)
            .map(|i| {
                let frame = frames.frame(i)?;
                create_thumbnail(&frame, self.use_colormap, self.config.thumbnail_size)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if thumbs.is_empty() {
            return Ok(NO_FRAMES_MESSAGE.to_string());
        }

        // Probe for the encoder; only a missing binary falls back to GIF.
        match self.encoder.run(&[OsString::from("-version")]) {
            Ok(()) => self.render_video(&thumbs),
            Err(ImgcolError::ExternalEncoderUnavailable(reason)) => {
                log::warn!("FFMPEG not detected ({}). Falling back on GIF.", reason);
                self.render_gif(&thumbs)
            }
            Err(e) => Err(e),
        }
    }

    fn render_gif(&self, thumbs: &[DynamicImage]) -> Result<String, ImgcolError> {
        let delay = Delay::from_numer_denom_ms(self.config.frame_delay_ms(), 1);
        let mut gif = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut gif);
            encoder.set_repeat(Repeat::Infinite)?;
            encoder.encode_frames(
                thumbs
                    .iter()
                    .map(|thumb| Frame::from_parts(thumb.to_rgba8(), 0, 0, delay)),
            )?;
        }
        Ok(format!(
            r#"<img src="data:image/gif;base64,{}" alt="Gif" />"#,
            encode_base64(&gif)
        ))
    }

    fn render_video(&self, thumbs: &[DynamicImage]) -> Result<String, ImgcolError> {
        // One extra digit over the frame count, e.g. 12 frames -> img000.png..img011.png.
        let num_digits = thumbs.len().to_string().len() + 1;

        // Removed on drop, whichever way this function returns.
        let video_dir = tempfile::tempdir()?;
        for (i, thumb) in thumbs.iter().enumerate() {
            let path = video_dir
                .path()
                .join(format!("img{:0width$}.png", i, width = num_digits));
            thumb.save_with_format(&path, ImageFormat::Png)?;
        }

        let input_pattern = video_dir.path().join(format!("img%0{}d.png", num_digits));
        let output = video_dir.path().join("output.mp4");
        let args = video_args(self.config.effective_framerate(), &input_pattern, &output);

        log::info!(
            "encoding {} preview frames to {}",
            thumbs.len(),
            output.display()
        );
        self.encoder.run(&args)?;
        let video = std::fs::read(&output)?;

        Ok(format!(
            concat!(
                r#"<video height="{}" width="{}" controls loop autoplay muted playsinline>"#,
                r#"<source src="data:video/mp4;base64,{}"  type="video/mp4" >"#,
                "</video>"
            ),
            self.config.thumbnail_size,
            self.config.video_width,
            encode_base64(&video)
        ))
    }
}

impl Default for PreviewRenderer<FfmpegEncoder> {
    fn default() -> Self {
        let config = PreviewConfig::default();
        let encoder = FfmpegEncoder::new(&config.ffmpeg_binary);
        Self::new(config, false, encoder)
    }
}
