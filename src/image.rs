use crate::refs::{ObjectReferences, RefType};
use image::{DynamicImage, GenericImageView};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

/// A decoded raster image, ready to be placed on a label
#[derive(Debug, Clone)]
pub struct Image {
    pub image: DynamicImage,
    pub width: f32,
    pub height: f32,
}

struct EncodeOutput {
    grey: bool,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Decode PNG or JPEG bytes
    pub fn decode(data: &[u8]) -> Result<Image, image::ImageError> {
        let image = image::load_from_memory(data)?;
        Ok(Image::new_raster(image))
    }

    pub fn new_raster(image: DynamicImage) -> Image {
        let width = image.width() as f32;
        let height = image.height() as f32;
        Image {
            image,
            width,
            height,
        }
    }

    /// Flate-compress the pixels, keeping greyscale images (every QR code) in one channel
    fn encode_raster(&self) -> EncodeOutput {
        let level = CompressionLevel::DefaultLevel as u8;
        let image = &self.image;

        let mask = image.color().has_alpha().then(|| {
            let alphas: Vec<_> = image.pixels().map(|p| (p.2).0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });

        let grey = !image.color().has_color();
        let bytes = if grey {
            compress_to_vec_zlib(image.to_luma8().as_raw(), level)
        } else {
            compress_to_vec_zlib(image.to_rgb8().as_raw(), level)
        };

        EncodeOutput { grey, bytes, mask }
    }

    /// Write the image as an XObject. Interpolation is turned off so that code modules stay
    /// crisp however far the image is scaled up.
    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode_raster();

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(Filter::FlateDecode);
        image.width(self.width as i32);
        image.height(self.height as i32);
        if encoded.grey {
            image.color_space().device_gray();
        } else {
            image.color_space().device_rgb();
        }
        image.bits_per_component(8);
        image.interpolate(false);

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }

        image.finish();

        // add a transparency mask if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
            s_mask.interpolate(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_generated_codes() {
        let png = crate::qr::generate("MED1", 2).unwrap();
        let image = Image::decode(&png).unwrap();
        assert_eq!(image.width, image.height);
        assert!(image.width > 0.0);
        assert!(!image.image.color().has_color());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Image::decode(b"not an image").is_err());
    }
}
