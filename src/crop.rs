//! Aspect-ratio cropping and PNG export.

use crate::error::ApiError;
use image::{DynamicImage, ImageFormat, ImageReader};
use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use tracing::debug;

/// Width-to-height ratio, e.g. `16:9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Result<Self, ApiError> {
        if width == 0 || height == 0 {
            return Err(ApiError::Validation(format!(
                "aspect ratio components must be positive: {}:{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }
}

impl FromStr for AspectRatio {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Portrait print format, the one preset with a fractional side.
        if s.trim() == "1:1.4" {
            return AspectRatio::new(10, 14);
        }
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| ApiError::Validation(format!("aspect ratio must be W:H, got {}", s)))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| ApiError::Validation(format!("bad aspect component {:?}: {}", part, e)))
        };
        AspectRatio::new(parse(w)?, parse(h)?)
    }
}

/// Ratios offered by the crop command.
pub const ASPECT_PRESETS: [&str; 8] = ["3:2", "2:3", "1:1", "4:3", "16:9", "3:4", "9:16", "1:1.4"];

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Allowed range for the crop center so the crop stays inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CenterRange {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

/// Largest crop of a given ratio that fits the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropFit {
    pub width: u32,
    pub height: u32,
    pub center_range: CenterRange,
}

/// Largest rectangle of `aspect` inside a `width`x`height` image.
///
/// Full height when it fits, full width otherwise. At least one side always
/// spans the image.
pub fn largest_crop_fit(width: u32, height: u32, aspect: AspectRatio) -> CropFit {
    let (a, b) = (aspect.width as u64, aspect.height as u64);
    let width_by_height = height as u64 * a / b;

    let (crop_w, crop_h) = if width_by_height <= width as u64 {
        (width_by_height as u32, height)
    } else {
        (width, (width as u64 * b / a) as u32)
    };

    CropFit {
        width: crop_w,
        height: crop_h,
        center_range: CenterRange {
            min_x: crop_w / 2,
            max_x: width - crop_w / 2,
            min_y: crop_h / 2,
            max_y: height - crop_h / 2,
        },
    }
}

/// Center of a `(left, top, width, height)` rectangle.
pub fn crop_center(rect: (f64, f64, f64, f64)) -> (f64, f64) {
    let (left, top, width, height) = rect;
    (left + width / 2.0, top + height / 2.0)
}

/// Image dimensions read from the header only.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), ApiError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Crop `bytes` to the largest `aspect` rectangle around `center` and encode as PNG.
///
/// The center defaults to the middle of the image and is clamped into the
/// allowed range.
pub fn crop_to_png(
    bytes: &[u8],
    aspect: AspectRatio,
    center: Option<(u32, u32)>,
) -> Result<Vec<u8>, ApiError> {
    let image = image::load_from_memory(bytes)?;
    encode_png(&crop_image(&image, aspect, center))
}

/// Exact rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn center(&self) -> (f64, f64) {
        crop_center((
            self.left as f64,
            self.top as f64,
            self.width as f64,
            self.height as f64,
        ))
    }

    fn fits(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.left as u64 + self.width as u64 <= width as u64
            && self.top as u64 + self.height as u64 <= height as u64
    }
}

impl FromStr for CropRect {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let invalid =
            || ApiError::Validation(format!("Invalid crop rectangle: {} (expected L,T,W,H)", s));
        let [left, top, width, height] = parts.as_slice() else {
            return Err(invalid());
        };
        let num = |v: &str| v.parse::<u32>().map_err(|_| invalid());
        Ok(Self {
            left: num(*left)?,
            top: num(*top)?,
            width: num(*width)?,
            height: num(*height)?,
        })
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.width, self.height)
    }
}

/// Crop exactly `rect` out of `bytes` and encode as PNG.
pub fn crop_rect_to_png(bytes: &[u8], rect: CropRect) -> Result<Vec<u8>, ApiError> {
    let image = image::load_from_memory(bytes)?;
    if !rect.fits(image.width(), image.height()) {
        return Err(ApiError::Validation(format!(
            "Crop rectangle {} does not fit a {}x{} image",
            rect,
            image.width(),
            image.height()
        )));
    }
    encode_png(&image.crop_imm(rect.left, rect.top, rect.width, rect.height))
}

fn encode_png(cropped: &DynamicImage) -> Result<Vec<u8>, ApiError> {
    let mut out = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    debug!(
        width = cropped.width(),
        height = cropped.height(),
        bytes = out.len(),
        "Exported PNG crop"
    );
    Ok(out)
}

fn crop_image(image: &DynamicImage, aspect: AspectRatio, center: Option<(u32, u32)>) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    let fit = largest_crop_fit(w, h, aspect);
    let range = fit.center_range;
    let (cx, cy) = center.unwrap_or((w / 2, h / 2));
    let cx = cx.clamp(range.min_x, range.max_x.max(range.min_x));
    let cy = cy.clamp(range.min_y, range.max_y.max(range.min_y));

    let left = (cx - fit.width / 2).min(w - fit.width);
    let top = (cy - fit.height / 2).min(h - fit.height);
    image.crop_imm(left, top, fit.width, fit.height)
}

/// Export file name with a `.png` extension.
pub fn png_file_name(stem: &str) -> String {
    let stem = stem.trim();
    let stem = if stem.is_empty() { "crop" } else { stem };
    if stem.to_ascii_lowercase().ends_with(".png") {
        stem.to_string()
    } else {
        format!("{}.png", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_parse_aspect_ratio() {
        let ar: AspectRatio = "16:9".parse().unwrap();
        assert_eq!(ar, AspectRatio { width: 16, height: 9 });
        assert_eq!(ar.to_string(), "16:9");
        assert!("16x9".parse::<AspectRatio>().is_err());
        assert!(matches!("0:1".parse::<AspectRatio>(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_every_preset_parses() {
        for preset in ASPECT_PRESETS {
            assert!(preset.parse::<AspectRatio>().is_ok(), "{}", preset);
        }
        assert_eq!(
            "1:1.4".parse::<AspectRatio>().unwrap(),
            AspectRatio::new(10, 14).unwrap()
        );
    }

    #[test]
    fn test_largest_fit_height_bound() {
        let fit = largest_crop_fit(1920, 1080, AspectRatio::new(1, 1).unwrap());
        assert_eq!((fit.width, fit.height), (1080, 1080));
        assert_eq!(fit.center_range.min_x, 540);
        assert_eq!(fit.center_range.max_x, 1380);
        assert_eq!((fit.center_range.min_y, fit.center_range.max_y), (540, 540));
    }

    #[test]
    fn test_largest_fit_width_bound() {
        let fit = largest_crop_fit(1000, 1000, AspectRatio::new(16, 9).unwrap());
        assert_eq!((fit.width, fit.height), (1000, 562));
    }

    #[test]
    fn test_crop_center() {
        assert_eq!(crop_center((10.0, 20.0, 100.0, 50.0)), (60.0, 45.0));
    }

    #[test]
    fn test_crop_to_png_dimensions_and_clamp() {
        let source = png(40, 20);
        let out = crop_to_png(&source, AspectRatio::new(1, 1).unwrap(), Some((0, 0))).unwrap();
        let cropped = image::load_from_memory(&out).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (20, 20));
        // Clamped to the left edge: the whole crop is red.
        assert_eq!(cropped.to_rgba8().get_pixel(19, 10), &Rgba([255, 0, 0, 255]));
        assert_eq!(image_dimensions(&out).unwrap(), (20, 20));
    }

    #[test]
    fn test_odd_crop_width_stays_inside() {
        let source = png(10, 5);
        let out = crop_to_png(&source, AspectRatio::new(1, 1).unwrap(), Some((100, 100))).unwrap();
        assert_eq!(image_dimensions(&out).unwrap(), (5, 5));
    }

    #[test]
    fn test_exact_rect_crop() {
        let rect: CropRect = "5, 2, 10, 6".parse().unwrap();
        assert_eq!(rect.center(), (10.0, 5.0));
        let out = crop_rect_to_png(&png(40, 20), rect).unwrap();
        assert_eq!(image_dimensions(&out).unwrap(), (10, 6));
    }

    #[test]
    fn test_rect_outside_image_is_rejected() {
        let rect: CropRect = "35,0,10,10".parse().unwrap();
        assert!(matches!(
            crop_rect_to_png(&png(40, 20), rect),
            Err(ApiError::Validation(_))
        ));
        assert!("1,2,3".parse::<CropRect>().is_err());
        assert!(!"0,0,0,5".parse::<CropRect>().unwrap().fits(10, 10));
    }

    #[test]
    fn test_png_file_name() {
        assert_eq!(png_file_name("cover"), "cover.png");
        assert_eq!(png_file_name("cover.PNG"), "cover.PNG");
        assert_eq!(png_file_name("  "), "crop.png");
    }

    #[test]
    fn test_garbage_bytes_are_image_errors() {
        assert!(matches!(
            crop_to_png(b"not an image", AspectRatio::new(1, 1).unwrap(), None),
            Err(ApiError::Image(_))
        ));
    }
}
