use serde::{Deserialize, Serialize};

/// Errors produced when wrapping raw pixel buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height}, channels={channels})")]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
    },
    #[error("invalid image buffer length (expected {expected} bytes, got {got})")]
    InvalidBufferLength { expected: usize, got: usize },
}

/// 8-bit RGB color used by the overlay renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
}

/// Borrowed interleaved 8-bit image, row-major, `len = width * height * channels`.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

/// Owned interleaved 8-bit image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

fn expected_len(width: usize, height: usize, channels: usize) -> Result<usize, ImageError> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(ImageError::InvalidDimensions {
            width,
            height,
            channels,
        });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(ImageError::InvalidDimensions {
            width,
            height,
            channels,
        })
}

impl<'a> ImageView<'a> {
    /// Wrap a raw buffer, checking dimensions and length.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: &'a [u8],
    ) -> Result<Self, ImageError> {
        let view = Self {
            width,
            height,
            channels,
            data,
        };
        view.validate()?;
        Ok(view)
    }

    /// Check that the dimensions are positive and consistent with the buffer.
    pub fn validate(&self) -> Result<(), ImageError> {
        let expected = expected_len(self.width, self.height, self.channels)?;
        if self.data.len() != expected {
            return Err(ImageError::InvalidBufferLength {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    /// Pixel at `(x, y)`; `None` outside the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        self.data.get(start..start + self.channels)
    }

    /// Copy the half-open region `x0..x1`, `y0..y1`.
    ///
    /// The region is clipped to the image; returns `None` if nothing is left.
    pub fn crop(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> Option<ImageBuffer> {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        let row_len = (x1 - x0) * self.channels;
        let mut data = Vec::with_capacity(row_len * (y1 - y0));
        for y in y0..y1 {
            let start = (y * self.width + x0) * self.channels;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Some(ImageBuffer {
            width: x1 - x0,
            height: y1 - y0,
            channels: self.channels,
            data,
        })
    }

    /// Convert to a 3-channel RGB copy.
    ///
    /// 1 channel is replicated, 2 channels are treated as gray + alpha,
    /// 4 channels drop alpha. Other layouts take the first three channels.
    pub fn to_rgb(&self) -> ImageBuffer {
        let n = self.width * self.height;
        let mut data = Vec::with_capacity(n * 3);
        for px in self.data.chunks_exact(self.channels.max(1)).take(n) {
            match px.len() {
                1 | 2 => data.extend_from_slice(&[px[0], px[0], px[0]]),
                _ => data.extend_from_slice(&px[..3]),
            }
        }
        ImageBuffer {
            width: self.width,
            height: self.height,
            channels: 3,
            data,
        }
    }
}

impl ImageBuffer {
    /// Allocate an image filled with `value` in every channel.
    pub fn filled(
        width: usize,
        height: usize,
        channels: usize,
        value: u8,
    ) -> Result<Self, ImageError> {
        let len = expected_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![value; len],
        })
    }

    /// Take ownership of a raw buffer, checking dimensions and length.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        ImageView::new(width, height, channels, &data)?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    /// Set an RGB color at `(x, y)`; silently ignores out-of-image positions.
    ///
    /// Gray images receive the color's mean intensity.
    #[inline]
    pub fn put_rgb(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let start = (y as usize * self.width + x as usize) * self.channels;
        let px = &mut self.data[start..start + self.channels];
        let [r, g, b] = color.0;
        match px.len() {
            1 | 2 => px[0] = ((r as u16 + g as u16 + b as u16) / 3) as u8,
            _ => px[..3].copy_from_slice(&[r, g, b]),
        }
    }
}
