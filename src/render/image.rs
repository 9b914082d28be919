//! Owned float framebuffer with color, alpha and depth channels.
//!
//! Pixels are addressed as `(row, col)` with row 0 at the top. Accessors are
//! bounds-checked: reads outside the image return `None` and writes outside the
//! image are silently ignored, so rasterizers can hand over unclipped spans.
//!
//! # Depth Channel
//!
//! The depth channel stores `1/z` for each pixel. Larger values are closer to
//! the viewer, and [`Image::reset`] clears depth to `0.0` (infinitely far).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder};

use crate::colors::{self, Color};
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};

/// One framebuffer pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FPixel {
    pub rgb: Color,
    pub a: f32,
    /// Stored as `1/z`; see the module docs.
    pub z: f32,
}

impl Default for FPixel {
    fn default() -> Self {
        Self {
            rgb: colors::BLACK,
            a: 1.0,
            z: 0.0,
        }
    }
}

/// Row-major grid of [`FPixel`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pixels: Vec<FPixel>,
    rows: usize,
    cols: usize,
}

impl Image {
    /// Allocates a `rows x cols` image cleared to black.
    ///
    /// Fails with [`RenderError::DegenerateImage`] if either dimension is zero
    /// and with [`RenderError::Allocation`] if the pixel storage cannot be
    /// reserved.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(RenderError::DegenerateImage { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(RenderError::Allocation { bytes: usize::MAX })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Allocation {
                bytes: len.saturating_mul(std::mem::size_of::<FPixel>()),
            })?;
        pixels.resize(len, FPixel::default());

        Ok(Self { pixels, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn pixels(&self) -> &[FPixel] {
        &self.pixels
    }

    #[inline]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols {
            Some(row as usize * self.cols + col as usize)
        } else {
            None
        }
    }

    // ============ Whole-image operations ============

    /// Black color, alpha 1, depth infinitely far.
    pub fn reset(&mut self) {
        self.pixels.fill(FPixel::default());
    }

    /// [`Image::reset`] but with the configured background color.
    pub fn clear_with(&mut self, config: &RenderConfig) {
        self.pixels.fill(FPixel {
            rgb: config.background,
            ..FPixel::default()
        });
    }

    pub fn fill_rgb(&mut self, color: Color) {
        self.pixels.iter_mut().for_each(|p| p.rgb = color);
    }

    pub fn fill_alpha(&mut self, a: f32) {
        self.pixels.iter_mut().for_each(|p| p.a = a);
    }

    pub fn fill_depth(&mut self, z: f32) {
        self.pixels.iter_mut().for_each(|p| p.z = z);
    }

    // ============ Pixel access ============

    #[inline]
    pub fn pixel(&self, row: i32, col: i32) -> Option<FPixel> {
        self.index(row, col).map(|i| self.pixels[i])
    }

    #[inline]
    pub fn set_pixel(&mut self, row: i32, col: i32, pixel: FPixel) {
        if let Some(i) = self.index(row, col) {
            self.pixels[i] = pixel;
        }
    }

    #[inline]
    pub fn color(&self, row: i32, col: i32) -> Option<Color> {
        self.pixel(row, col).map(|p| p.rgb)
    }

    #[inline]
    pub fn set_color(&mut self, row: i32, col: i32, color: Color) {
        if let Some(i) = self.index(row, col) {
            self.pixels[i].rgb = color;
        }
    }

    #[inline]
    pub fn alpha(&self, row: i32, col: i32) -> Option<f32> {
        self.pixel(row, col).map(|p| p.a)
    }

    #[inline]
    pub fn set_alpha(&mut self, row: i32, col: i32, a: f32) {
        if let Some(i) = self.index(row, col) {
            self.pixels[i].a = a;
        }
    }

    #[inline]
    pub fn depth(&self, row: i32, col: i32) -> Option<f32> {
        self.pixel(row, col).map(|p| p.z)
    }

    #[inline]
    pub fn set_depth(&mut self, row: i32, col: i32, z: f32) {
        if let Some(i) = self.index(row, col) {
            self.pixels[i].z = z;
        }
    }

    /// Writes `color` only if `inv_z` is closer than the stored depth, and
    /// records the new depth. Returns whether the pixel was written.
    #[inline]
    pub fn set_color_with_depth(&mut self, row: i32, col: i32, inv_z: f32, color: Color) -> bool {
        match self.index(row, col) {
            Some(i) if inv_z > self.pixels[i].z => {
                self.pixels[i].z = inv_z;
                self.pixels[i].rgb = color;
                true
            }
            _ => false,
        }
    }

    /// Number of pixels whose color differs from `background`.
    pub fn count_not(&self, background: Color) -> usize {
        self.pixels.iter().filter(|p| p.rgb != background).count()
    }

    // ============ PPM I/O ============

    /// Packs the color channels into 8-bit RGB triples, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.rgb.to_rgb8()).collect()
    }

    /// Writes a binary PPM (`P6`, max value 255).
    ///
    /// The whole image is encoded before the call returns; if encoding fails
    /// the partially written file is removed.
    pub fn write_ppm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_rgb8();

        let result = (|| -> Result<()> {
            let mut writer = BufWriter::new(File::create(path)?);
            PnmEncoder::new(&mut writer)
                .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
                .write_image(&bytes, self.cols as u32, self.rows as u32, ExtendedColorType::Rgb8)?;
            writer.flush()?;
            Ok(())
        })();

        if result.is_err() {
            std::fs::remove_file(path).ok();
        } else {
            log::debug!("wrote {}x{} image to {}", self.cols, self.rows, path.display());
        }
        result
    }

    /// Reads an 8-bit raster (any format the `image` crate recognizes from the
    /// extension, PPM included) into a new image with alpha 1 and far depth.
    pub fn read_ppm<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raster = image::open(path)?.to_rgb8();
        let (width, height) = raster.dimensions();

        let mut img = Image::new(height as usize, width as usize)?;
        for (dst, src) in img.pixels.iter_mut().zip(raster.pixels()) {
            dst.rgb = Color::from_rgb8(src.0);
        }
        log::debug!("read {}x{} image from {}", width, height, path.display());
        Ok(img)
    }
}
