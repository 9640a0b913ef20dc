//! Image buffer and file output.
//!
//! The text dump is the reference output: three row-major channel blocks
//! (red, green, blue), values separated by single spaces, one image row per
//! line and a blank line after each block. The PNG is a preview of the same
//! values.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use kdtrace_math::Color;

use crate::error::OutputError;

/// Row-major image of linear colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Write the three channel blocks.
    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for channel in 0..3 {
            for y in 0..self.height {
                for x in 0..self.width {
                    let value = self.get(x, y)[channel];
                    write!(out, "{} ", format_general(f64::from(value)))?;
                }
                writeln!(out)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        self.write_text(&mut out)?;
        out.flush()?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    /// Quantize to 8 bits per channel, truncating `255 * v`.
    pub fn to_rgb8(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let color = self.get(x, y);
            image::Rgb([
                quantize(color.x),
                quantize(color.y),
                quantize(color.z),
            ])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        self.to_rgb8().save(path.as_ref())?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}

#[inline]
fn quantize(v: f32) -> u8 {
    (255.0 * v.clamp(0.0, 1.0)) as u8
}

/// Significant digits used by [`format_general`].
const PRECISION: i32 = 6;

/// Format a number the way C's `%g` does with six significant digits:
/// fixed notation for decimal exponents in [-4, 6), scientific otherwise,
/// trailing zeros removed.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
