//! Decoding of still images received on the image topics.

use eframe::egui::ColorImage;

use crate::bus::EncodedImage;
use crate::error::DecodeError;

/// Decode encoded image bytes into an egui image.
pub fn decode_color_image(encoded: &EncodedImage) -> Result<ColorImage, DecodeError> {
    let rgba = ::image::load_from_memory(&encoded.0)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Latest decoded image for one channel, waiting to be uploaded as a texture.
#[derive(Default)]
pub struct ImageSlot {
    pending: Option<ColorImage>,
    size: Option<[usize; 2]>,
    received: u64,
}

impl ImageSlot {
    /// Decode and store the image, replacing any image not yet shown.
    ///
    /// A payload that fails to decode leaves the slot unchanged.
    pub fn replace(&mut self, encoded: &EncodedImage) -> Result<(), DecodeError> {
        let img = decode_color_image(encoded)?;
        self.size = Some(img.size);
        self.pending = Some(img);
        self.received += 1;
        Ok(())
    }

    /// Take the image for upload; `None` if nothing new arrived.
    pub fn take_pending(&mut self) -> Option<ColorImage> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Pixel size of the most recent image.
    pub fn size(&self) -> Option<[usize; 2]> {
        self.size
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}
