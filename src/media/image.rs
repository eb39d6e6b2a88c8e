// SPDX-License-Identifier: MPL-2.0
//! Decoding of downloaded photo bytes into displayable handles.

use crate::error::Result;
use iced::widget::image;
use image_rs::ImageReader;
use std::io::Cursor;

/// A downloaded image ready to hand to Iced, with its pixel size.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    /// Encoded size, used for cache accounting.
    pub byte_len: usize,
}

impl ImageData {
    /// Reads the dimensions from the image header and wraps the encoded bytes.
    ///
    /// Only the header is parsed here; Iced decodes the pixels when the image
    /// is first drawn.
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self> {
        let (width, height) = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()?
            .into_dimensions()?;
        let byte_len = bytes.len();
        Ok(Self {
            handle: image::Handle::from_bytes(bytes),
            width,
            height,
            byte_len,
        })
    }

    /// Width divided by height (1.0 for degenerate images).
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Largest size with this aspect ratio that fits in `bounds`.
    #[must_use]
    pub fn fit_size(&self, bounds: iced::Size) -> iced::Size {
        if self.width == 0 || self.height == 0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return iced::Size::ZERO;
        }
        let scale = (bounds.width / self.width as f32).min(bounds.height / self.height as f32);
        iced::Size::new(self.width as f32 * scale, self.height as f32 * scale)
    }
}

#[cfg(test)]
pub(crate) fn encoded_png(width: u32, height: u32) -> Vec<u8> {
    let buffer = image_rs::RgbaImage::from_pixel(width, height, image_rs::Rgba([40, 80, 120, 255]));
    let mut out = Cursor::new(Vec::new());
    image_rs::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut out, image_rs::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn reads_dimensions_from_png_header() {
        let data = ImageData::from_encoded(encoded_png(40, 20)).expect("decode");
        assert_eq!((data.width, data.height), (40, 20));
        assert_eq!(data.aspect_ratio(), 2.0);
        assert!(data.byte_len > 0);
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let err = ImageData::from_encoded(b"definitely not an image".to_vec()).unwrap_err();
        assert!(matches!(err, Error::Image(_) | Error::Io(_)));
    }

    #[test]
    fn fit_size_preserves_ratio() {
        let data = ImageData::from_encoded(encoded_png(400, 200)).expect("decode");
        let fitted = data.fit_size(iced::Size::new(100.0, 100.0));
        assert_eq!(fitted, iced::Size::new(100.0, 50.0));
        assert_eq!(data.fit_size(iced::Size::ZERO), iced::Size::ZERO);
    }
}
