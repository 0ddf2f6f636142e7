use crate::foundation::core::ImageId;
use crate::foundation::error::{GbufError, GbufResult};

/// Raster image owned by a buffer's image table.
///
/// `depth` is the number of 8-bit channels per pixel: 1 (gray), 3 (RGB) or 4 (RGBA).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageEntry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel.
    pub depth: u8,
    /// Row-major pixel bytes, top row first.
    pub pixels: Vec<u8>,
}

impl ImageEntry {
    /// `true` when `other` has the same width, height and depth.
    pub fn same_shape(&self, width: u32, height: u32, depth: u8) -> bool {
        self.width == width && self.height == height && self.depth == depth
    }
}

/// Borrowed pixel data handed to [`ImageTable::add`] and [`ImageTable::replace`].
#[derive(Clone, Copy, Debug)]
pub struct ImageData<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel.
    pub depth: u8,
    /// Row-major pixel bytes, `width * height * depth` long.
    pub pixels: &'a [u8],
}

impl ImageData<'_> {
    fn validate(&self) -> GbufResult<()> {
        if !matches!(self.depth, 1 | 3 | 4) {
            return Err(GbufError::validation(format!(
                "image depth must be 1, 3 or 4 channels, got {}",
                self.depth
            )));
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(usize::from(self.depth)))
            .ok_or_else(|| GbufError::validation("image dimensions overflow"))?;
        if self.pixels.len() != expected {
            return Err(GbufError::validation(format!(
                "image pixel data is {} bytes, expected {expected}",
                self.pixels.len()
            )));
        }
        Ok(())
    }
}

fn copy_pixels(src: &[u8]) -> GbufResult<Vec<u8>> {
    let mut v = Vec::new();
    v.try_reserve_exact(src.len())
        .map_err(|_| GbufError::AllocationFailure {
            requested: src.len(),
        })?;
    v.extend_from_slice(src);
    Ok(v)
}

/// Side table of raster images referenced by position from image records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageTable {
    entries: Vec<ImageEntry>,
}

impl ImageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `data` into a new entry; the id is the previous table length.
    pub fn add(&mut self, data: ImageData<'_>) -> GbufResult<ImageId> {
        data.validate()?;
        let id = ImageId(self.entries.len() as u32);
        let pixels = copy_pixels(data.pixels)?;
        self.entries.push(ImageEntry {
            width: data.width,
            height: data.height,
            depth: data.depth,
            pixels,
        });
        Ok(id)
    }

    /// Look up an entry.
    pub fn find(&self, id: ImageId) -> Option<&ImageEntry> {
        self.entries.get(id.0 as usize)
    }

    /// Look up an entry, reporting [`GbufError::MissingImage`] when absent.
    pub fn get(&self, id: ImageId) -> GbufResult<&ImageEntry> {
        self.find(id).ok_or(GbufError::MissingImage(id))
    }

    /// Replace the pixels of an existing entry.
    ///
    /// Same-shaped data is copied over the existing allocation; anything else reallocates.
    pub fn replace(&mut self, id: ImageId, data: ImageData<'_>) -> GbufResult<()> {
        data.validate()?;
        let entry = self
            .entries
            .get_mut(id.0 as usize)
            .ok_or(GbufError::MissingImage(id))?;
        if entry.same_shape(data.width, data.height, data.depth) {
            entry.pixels.copy_from_slice(data.pixels);
        } else {
            entry.pixels = copy_pixels(data.pixels)?;
            entry.width = data.width;
            entry.height = data.height;
            entry.depth = data.depth;
        }
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/images.rs"]
mod tests;
