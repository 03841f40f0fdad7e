// thumbsmith/src/ops/raster.rs
use super::{ImageOps, ResizeMode};
use crate::core::{Result, ThumbError};
use crate::geometry::{Anchor, CanonicalRect};
use crate::strategy::{EncodeFormat, FillColor, QualityPreset, ResampleKernel, Rotation};
use image::imageops::FilterType;
use jpeg_encoder::{ColorType, Encoder as JpegEncoder};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// In-process raster backend built on the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterOps;

impl RasterOps {
    pub fn new() -> Self {
        Self
    }

    fn filter_for(&self, quality: QualityPreset) -> FilterType {
        // The interpolation half of the preset has no counterpart in the
        // `image` crate; the kernel choice drives the filter. Lanczos2 has
        // no direct equivalent either and maps to Lanczos3.
        match quality.kernel {
            ResampleKernel::Nearest => FilterType::Nearest,
            ResampleKernel::Cubic => FilterType::CatmullRom,
            ResampleKernel::Lanczos2 | ResampleKernel::Lanczos3 => FilterType::Lanczos3,
        }
    }

    /// Aspect-preserving dimensions that fully cover `target`. One axis
    /// matches exactly, the other may exceed.
    fn cover_dimensions(&self, source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
        let (src_w, src_h) = source;
        let (tgt_w, tgt_h) = target;

        let src_aspect = src_w as f64 / src_h as f64;
        let tgt_aspect = tgt_w as f64 / tgt_h as f64;

        if src_aspect > tgt_aspect {
            let h = tgt_h;
            let w = (h as f64 * src_aspect).round() as u32;
            (w.max(tgt_w), h)
        } else {
            let w = tgt_w;
            let h = (w as f64 / src_aspect).round() as u32;
            (w, h.max(tgt_h))
        }
    }
}

impl ImageOps for RasterOps {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes)
            .map_err(|e| ThumbError::ProcessingError(format!("Failed to decode image: {}", e)))
    }

    fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        mode: ResizeMode,
        quality: QualityPreset,
    ) -> Result<DynamicImage> {
        if width == 0 || height == 0 {
            return Err(ThumbError::ImageOp(format!(
                "Resize target {}x{} has an empty axis",
                width, height
            )));
        }

        let filter = self.filter_for(quality);

        log::debug!(
            "Resizing {}x{} to {}x{} ({:?})",
            image.width(),
            image.height(),
            width,
            height,
            mode
        );

        let resized = match mode {
            ResizeMode::Cover => {
                let (w, h) =
                    self.cover_dimensions((image.width(), image.height()), (width, height));
                image.resize_exact(w, h, filter)
            }
            ResizeMode::Within => image.resize(width, height, filter),
            ResizeMode::Exact => image.resize_exact(width, height, filter),
        };

        Ok(resized)
    }

    fn crop_to_anchor(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        anchor: Anchor,
    ) -> Result<DynamicImage> {
        if width > image.width() || height > image.height() {
            return Err(ThumbError::ImageOp(format!(
                "Crop {}x{} exceeds image {}x{}",
                width,
                height,
                image.width(),
                image.height()
            )));
        }

        let (x, y) = anchor.crop_origin((image.width(), image.height()), (width, height));
        Ok(image.crop_imm(x, y, width, height))
    }

    fn pad_to_size(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
        fill: FillColor,
    ) -> Result<DynamicImage> {
        if image.width() > width || image.height() > height {
            return Err(ThumbError::ImageOp(format!(
                "Cannot pad image {}x{} onto smaller canvas {}x{}",
                image.width(),
                image.height(),
                width,
                height
            )));
        }

        let mut canvas =
            RgbaImage::from_pixel(width, height, Rgba([fill.r, fill.g, fill.b, fill.a]));
        let offset_x = (width - image.width()) / 2;
        let offset_y = (height - image.height()) / 2;
        image::imageops::overlay(
            &mut canvas,
            &image.to_rgba8(),
            offset_x as i64,
            offset_y as i64,
        );

        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn extract_rect(&self, image: &DynamicImage, rect: CanonicalRect) -> Result<DynamicImage> {
        let within = rect
            .left
            .checked_add(rect.width)
            .is_some_and(|r| r <= image.width())
            && rect
                .top
                .checked_add(rect.height)
                .is_some_and(|b| b <= image.height());

        if rect.width == 0 || rect.height == 0 || !within {
            return Err(ThumbError::ImageOp(format!(
                "Extract region {}x{}+{}+{} lies outside image {}x{}",
                rect.width,
                rect.height,
                rect.left,
                rect.top,
                image.width(),
                image.height()
            )));
        }

        Ok(image.crop_imm(rect.left, rect.top, rect.width, rect.height))
    }

    fn rotate(&self, image: &DynamicImage, rotation: Rotation) -> Result<DynamicImage> {
        let rotated = match rotation.degrees() {
            0 => image.clone(),
            90 => image.rotate90(),
            180 => image.rotate180(),
            270 => image.rotate270(),
            other => {
                return Err(ThumbError::ImageOp(format!(
                    "Unsupported rotation: {} degrees",
                    other
                )))
            }
        };
        Ok(rotated)
    }

    fn encode(&self, image: &DynamicImage, format: EncodeFormat, level: u8) -> Result<Vec<u8>> {
        let level = format.clamp_level(level);

        match format {
            EncodeFormat::Jpeg => {
                // JPEG has no alpha channel; flatten before encoding.
                let rgb = image.to_rgb8();
                let width = u16::try_from(rgb.width()).map_err(|_| jpeg_too_large(&rgb))?;
                let height = u16::try_from(rgb.height()).map_err(|_| jpeg_too_large(&rgb))?;

                let mut buffer = Vec::new();
                let mut encoder = JpegEncoder::new(&mut buffer, level);
                encoder.set_progressive(true);
                encoder
                    .encode(rgb.as_raw(), width, height, ColorType::Rgb)
                    .map_err(|e| {
                        ThumbError::ProcessingError(format!("JPEG encoding failed: {}", e))
                    })?;
                Ok(buffer)
            }
            EncodeFormat::Png => {
                let mut buffer = Cursor::new(Vec::new());
                image.write_to(&mut buffer, ImageFormat::Png)?;

                // oxipng handles the deflate level and Adam7 interlacing;
                // its presets run 0-6.
                let mut options = oxipng::Options::from_preset(level.saturating_sub(1).min(6));
                options.interlace = Some(oxipng::Interlacing::Adam7);
                optimize_png(&buffer.into_inner(), &options)
            }
        }
    }
}

fn jpeg_too_large(rgb: &image::RgbImage) -> ThumbError {
    ThumbError::ImageOp(format!(
        "Image {}x{} exceeds the JPEG dimension limit of 65535",
        rgb.width(),
        rgb.height()
    ))
}

fn optimize_png(data: &[u8], options: &oxipng::Options) -> Result<Vec<u8>> {
    oxipng::optimize_from_memory(data, options)
        .map_err(|e| ThumbError::ProcessingError(format!("PNG optimization failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    #[test]
    fn cover_resize_reaches_both_axes() {
        let ops = RasterOps::new();
        let img = solid(100, 50, [10, 20, 30, 255]);
        let out = ops
            .resize(&img, 40, 40, ResizeMode::Cover, QualityPreset::NEAREST)
            .unwrap();
        assert!(out.width() >= 40 && out.height() >= 40);
        assert!(out.width() == 40 || out.height() == 40);
    }

    #[test]
    fn within_resize_stays_inside_the_box() {
        let ops = RasterOps::new();
        let img = solid(100, 50, [10, 20, 30, 255]);
        let out = ops
            .resize(&img, 40, 40, ResizeMode::Within, QualityPreset::DEFAULT)
            .unwrap();
        assert_eq!((out.width(), out.height()), (40, 20));
    }

    #[test]
    fn exact_resize_ignores_aspect() {
        let ops = RasterOps::new();
        let img = solid(100, 50, [10, 20, 30, 255]);
        let out = ops
            .resize(&img, 33, 44, ResizeMode::Exact, QualityPreset::DEFAULT)
            .unwrap();
        assert_eq!((out.width(), out.height()), (33, 44));
    }

    #[test]
    fn anchored_crop_picks_the_right_region() {
        let ops = RasterOps::new();
        // Left half red, right half blue.
        let mut buf = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        for y in 0..2 {
            for x in 2..4 {
                buf.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        let img = DynamicImage::ImageRgba8(buf);

        let west = ops.crop_to_anchor(&img, 2, 2, Anchor::West).unwrap();
        assert_eq!(west.to_rgba8().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));

        let east = ops.crop_to_anchor(&img, 2, 2, Anchor::East).unwrap();
        assert_eq!(east.to_rgba8().get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn oversized_crop_is_rejected() {
        let ops = RasterOps::new();
        let img = solid(4, 4, [0, 0, 0, 255]);
        assert!(ops.crop_to_anchor(&img, 8, 4, Anchor::Center).is_err());
    }

    #[test]
    fn pad_centers_content_and_fills_corners() {
        let ops = RasterOps::new();
        let img = solid(2, 2, [1, 2, 3, 255]);
        let out = ops.pad_to_size(&img, 6, 6, FillColor::WHITE).unwrap();
        assert_eq!((out.width(), out.height()), (6, 6));
        let rgba = out.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(rgba.get_pixel(3, 3), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn extract_out_of_bounds_fails() {
        let ops = RasterOps::new();
        let img = solid(10, 10, [0, 0, 0, 255]);
        let rect = CanonicalRect {
            left: 8,
            top: 0,
            width: 5,
            height: 5,
        };
        assert!(matches!(
            ops.extract_rect(&img, rect),
            Err(ThumbError::ImageOp(_))
        ));
    }

    #[test]
    fn quarter_rotations_transpose_dimensions() {
        let ops = RasterOps::new();
        let img = solid(6, 3, [0, 0, 0, 255]);
        let out = ops.rotate(&img, Rotation::from_degrees(90)).unwrap();
        assert_eq!((out.width(), out.height()), (3, 6));
        let out = ops.rotate(&img, Rotation::from_degrees(0)).unwrap();
        assert_eq!((out.width(), out.height()), (6, 3));
    }

    #[test]
    fn encoded_output_is_the_forced_format() {
        let ops = RasterOps::new();
        let img = solid(8, 8, [100, 150, 200, 255]);

        let jpeg = ops.encode(&img, EncodeFormat::Jpeg, 90).unwrap();
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            image::ImageFormat::Jpeg
        );

        let png = ops.encode(&img, EncodeFormat::Png, 6).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn jpeg_output_uses_progressive_scans() {
        let ops = RasterOps::new();
        let img = solid(16, 16, [100, 150, 200, 255]);
        let jpeg = ops.encode(&img, EncodeFormat::Jpeg, 90).unwrap();

        // A progressive stream starts its frame with SOF2 (FF C2); a
        // baseline one uses SOF0 (FF C0).
        let marker = |m: u8| jpeg.windows(2).any(|w| w == [0xFF, m]);
        assert!(marker(0xC2), "missing progressive SOF2 marker");
        assert!(!marker(0xC0), "unexpected baseline SOF0 marker");
    }
}
