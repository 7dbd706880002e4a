//! Feature extraction backed by the `image` crate.
//!
//! One decode per photo, then:
//! - pHash (64 bits, DCT-preprocessed mean hash) via `image_hasher`
//! - Laplacian variance as the blur score
//! - Shannon entropy of a grayscale histogram
//! - BT.601 luminance mean/variance and HSV skin-tone share

use super::{ColorStats, FastDecoder, FeatureExtractor, FeatureRecord, ImageHashValue};
use crate::core::config::SweepConfig;
use crate::core::scanner::PhotoFile;
use crate::error::ExtractError;
use image::{DynamicImage, GrayImage, RgbImage};
use image_hasher::{HashAlg, HasherConfig};

/// pHash grid edge; 8x8 gives a 64-bit hash
const HASH_SIZE: u32 = 8;

/// Extracts features by decoding the photo from disk
pub struct ImageFeatureExtractor {
    hasher: image_hasher::Hasher,
    /// Longest edge used for blur/entropy/color analysis (smaller = faster)
    analysis_size: u32,
    entropy_bins: usize,
}

impl ImageFeatureExtractor {
    pub fn new(config: &SweepConfig) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self {
            hasher,
            analysis_size: config.analysis_size,
            entropy_bins: config.entropy_bins,
        }
    }

    /// Compute the features of an already-decoded image
    pub fn analyze_image(
        &self,
        photo: &PhotoFile,
        image: &DynamicImage,
    ) -> Result<FeatureRecord, ExtractError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ExtractError::EmptyImage {
                path: photo.path.clone(),
            });
        }

        let hash = ImageHashValue::new(self.hasher.hash_image(image).as_bytes().to_vec());

        let resized = if image.width().max(image.height()) > self.analysis_size {
            image.resize(
                self.analysis_size,
                self.analysis_size,
                image::imageops::FilterType::Triangle,
            )
        } else {
            image.clone()
        };

        let gray = resized.to_luma8();
        let blur_score = laplacian_variance(&gray);
        let entropy = histogram_entropy(&gray, self.entropy_bins);
        let color = color_stats(&resized.to_rgb8());

        tracing::debug!(
            path = %photo.path.display(),
            hash = %hash.to_hex(),
            blur_score,
            entropy,
            "features extracted"
        );

        Ok(FeatureRecord {
            path: photo.path.clone(),
            hash: Some(hash),
            blur_score,
            entropy,
            color,
            size_bytes: photo.size,
            modified: photo.modified,
        })
    }
}

impl FeatureExtractor for ImageFeatureExtractor {
    fn extract(&self, photo: &PhotoFile) -> Result<FeatureRecord, ExtractError> {
        let image = FastDecoder::decode(&photo.path)?;
        self.analyze_image(photo, &image)
    }
}

/// Variance of the 4-neighbour Laplacian. Sharp images have strong edges
/// and therefore a high variance.
fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    // Laplacian kernel: [0, 1, 0; 1, -4, 1; 0, 1, 0]
    let mut values = Vec::with_capacity(((width - 2) * (height - 2)) as usize);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = gray.get_pixel(x, y)[0] as f64;
            let top = gray.get_pixel(x, y - 1)[0] as f64;
            let bottom = gray.get_pixel(x, y + 1)[0] as f64;
            let left = gray.get_pixel(x - 1, y)[0] as f64;
            let right = gray.get_pixel(x + 1, y)[0] as f64;
            values.push(top + bottom + left + right - 4.0 * center);
        }
    }

    variance(&values)
}

/// Shannon entropy (bits) of a `bins`-bucket grayscale histogram.
/// Ranges from 0 (single tone) to log2(bins).
fn histogram_entropy(gray: &GrayImage, bins: usize) -> f64 {
    let total = (gray.width() * gray.height()) as usize;
    if total == 0 || bins == 0 {
        return 0.0;
    }

    let mut histogram = vec![0usize; bins];
    for pixel in gray.pixels() {
        let bin = (pixel[0] as usize * bins / 256).min(bins - 1);
        histogram[bin] += 1;
    }

    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

fn color_stats(rgb: &RgbImage) -> Option<ColorStats> {
    let total = (rgb.width() * rgb.height()) as usize;
    if total == 0 {
        return None;
    }

    let mut luminances = Vec::with_capacity(total);
    let mut skin_pixels = 0usize;

    for pixel in rgb.pixels() {
        let r = pixel[0] as f64 / 255.0;
        let g = pixel[1] as f64 / 255.0;
        let b = pixel[2] as f64 / 255.0;

        // ITU-R BT.601
        luminances.push(0.299 * r + 0.587 * g + 0.114 * b);

        if is_skin_tone(r, g, b) {
            skin_pixels += 1;
        }
    }

    let mean_luminance = luminances.iter().sum::<f64>() / total as f64;

    Some(ColorStats {
        mean_luminance,
        luminance_variance: variance(&luminances),
        skin_tone_percentage: skin_pixels as f64 / total as f64,
    })
}

/// HSV skin heuristic: hue 0-50 degrees, saturation 0.23-0.68, value >= 0.35
fn is_skin_tone(r: f64, g: f64, b: f64) -> bool {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    (0.0..=50.0).contains(&h) && (0.23..=0.68).contains(&s) && v >= 0.35
}

fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }

    (h, s, max)
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
