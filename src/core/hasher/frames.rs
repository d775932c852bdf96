//! Per-frame fingerprints of frame sequences (animated GIF, APNG).
//!
//! Every frame is decoded (GIF/APNG frames are composited from their
//! predecessors, so skipping is not possible), but only every
//! `frame_stride`-th frame is hashed. Any decode failure fails the whole
//! sequence; a partial sequence is never returned.

use super::decode::{MediaDecoder, MediaFormat};
use super::traits::{ImageHasher, PerceptualHash};
use crate::error::HashError;
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, DynamicImage, Frames};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Hashes sampled frames of a frame sequence
pub struct FrameSequenceHasher {
    hasher: Box<dyn ImageHasher>,
    /// Hash every n-th frame (always >= 1)
    frame_stride: usize,
    /// Stop after this many hashes
    max_frames: Option<usize>,
}

impl FrameSequenceHasher {
    /// Create a sequence hasher. A stride of 0 is treated as 1.
    pub fn new(hasher: Box<dyn ImageHasher>, frame_stride: usize, max_frames: Option<usize>) -> Self {
        Self {
            hasher,
            frame_stride: frame_stride.max(1),
            max_frames,
        }
    }

    pub fn frame_stride(&self) -> usize {
        self.frame_stride
    }

    pub fn max_frames(&self) -> Option<usize> {
        self.max_frames
    }

    /// Hash the sampled frames of `path`, one hash per sampled frame.
    pub fn hash_file(&self, path: &Path) -> Result<Vec<PerceptualHash>, HashError> {
        let format = MediaFormat::from_path(path);
        if !format.supports_frames() {
            return Err(HashError::UnsupportedFormat {
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("<none>")
                    .to_string(),
            });
        }

        let hashes = match format {
            MediaFormat::Gif => {
                let decoder = GifDecoder::new(Self::open(path)?)
                    .map_err(|e| Self::decode_error(path, e))?;
                self.hash_frames(path, decoder.into_frames())?
            }
            _ => {
                let decoder = PngDecoder::new(Self::open(path)?)
                    .map_err(|e| Self::decode_error(path, e))?;
                let animated = decoder.is_apng().map_err(|e| Self::decode_error(path, e))?;

                if animated {
                    let apng = decoder.apng().map_err(|e| Self::decode_error(path, e))?;
                    self.hash_frames(path, apng.into_frames())?
                } else {
                    drop(decoder);
                    vec![self.hasher.hash_image(&MediaDecoder::decode(path)?)?]
                }
            }
        };

        if hashes.is_empty() {
            return Err(HashError::EmptyMedia {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), frames = hashes.len(), "hashed frame sequence");
        Ok(hashes)
    }

    fn hash_frames(&self, path: &Path, frames: Frames<'_>) -> Result<Vec<PerceptualHash>, HashError> {
        let mut hashes = Vec::new();

        for (index, frame) in frames.enumerate() {
            if self.max_frames.is_some_and(|max| hashes.len() >= max) {
                break;
            }

            let frame = frame.map_err(|e| Self::decode_error(path, e))?;
            if index % self.frame_stride != 0 {
                continue;
            }

            let image = DynamicImage::ImageRgba8(frame.into_buffer());
            hashes.push(self.hasher.hash_image(&image)?);
        }

        Ok(hashes)
    }

    fn open(path: &Path) -> Result<BufReader<File>, HashError> {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })
    }

    fn decode_error(path: &Path, error: image::ImageError) -> HashError {
        HashError::DecodeError {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }
    }
}
