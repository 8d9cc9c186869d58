//! Scoped drawing surface over an RGBA raster.

use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, Pixmap, PremultipliedColorU8};

use super::OverlayError;

/// A tiny-skia pixmap borrowed from an [`RgbaImage`].
///
/// tiny-skia works on premultiplied pixels while `image` stores straight
/// alpha, so the raster is converted on [`acquire`](Self::acquire) and
/// written back when the canvas is dropped. Only pixels that were drawn on
/// are written back; the premultiply round trip is lossy for translucent
/// pixels, so untouched ones keep their original value. The image cannot be
/// touched while the canvas exists.
pub struct OverlayCanvas<'a> {
    target: &'a mut RgbaImage,
    pixmap: Pixmap,
}

impl<'a> OverlayCanvas<'a> {
    pub fn acquire(target: &'a mut RgbaImage) -> Result<Self, OverlayError> {
        let (width, height) = target.dimensions();
        let mut pixmap =
            Pixmap::new(width, height).ok_or(OverlayError::Canvas { width, height })?;

        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(target.pixels()) {
            *dst = premultiply(src);
        }

        Ok(Self { target, pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

fn premultiply(pixel: &Rgba<u8>) -> PremultipliedColorU8 {
    let [r, g, b, a] = pixel.0;
    ColorU8::from_rgba(r, g, b, a).premultiply()
}

impl Drop for OverlayCanvas<'_> {
    fn drop(&mut self) {
        // The target is unchanged since acquire, so it still holds the
        // value each pixel was converted from.
        for (dst, src) in self.target.pixels_mut().zip(self.pixmap.pixels()) {
            if premultiply(dst) == *src {
                continue;
            }
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::{Color, Paint, Rect, Transform};

    #[test]
    fn test_untouched_canvas_keeps_opaque_pixels() {
        let mut image = RgbaImage::from_fn(16, 8, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
        let before = image.clone();
        {
            let canvas = OverlayCanvas::acquire(&mut image).unwrap();
            assert_eq!(canvas.pixmap().width(), 16);
            assert_eq!(canvas.pixmap().height(), 8);
        }
        assert_eq!(image, before);
    }

    #[test]
    fn test_untouched_canvas_keeps_translucent_pixels() {
        let mut image = RgbaImage::from_fn(16, 8, |x, y| {
            Rgba([200, 100 + x as u8, 51, 1 + (y as u8) * 30])
        });
        let before = image.clone();
        {
            let _canvas = OverlayCanvas::acquire(&mut image).unwrap();
        }
        assert_eq!(image, before);
    }

    #[test]
    fn test_drawing_leaves_other_translucent_pixels_alone() {
        let background = Rgba([200, 100, 51, 7]);
        let mut image = RgbaImage::from_pixel(10, 10, background);
        {
            let mut canvas = OverlayCanvas::acquire(&mut image).unwrap();
            let mut paint = Paint::default();
            paint.set_color(Color::WHITE);
            let rect = Rect::from_xywh(0.0, 0.0, 5.0, 10.0).unwrap();
            canvas
                .pixmap_mut()
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
        assert_eq!(image.get_pixel(2, 5), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(7, 5), &background);
    }

    #[test]
    fn test_drawing_written_back_on_drop() {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        {
            let mut canvas = OverlayCanvas::acquire(&mut image).unwrap();
            let mut paint = Paint::default();
            paint.set_color(Color::WHITE);
            let rect = Rect::from_xywh(0.0, 0.0, 5.0, 10.0).unwrap();
            canvas
                .pixmap_mut()
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
        assert_eq!(image.get_pixel(2, 5), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(7, 5), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut image = RgbaImage::new(0, 0);
        assert_eq!(
            OverlayCanvas::acquire(&mut image).err(),
            Some(OverlayError::Canvas {
                width: 0,
                height: 0
            })
        );
    }
}
