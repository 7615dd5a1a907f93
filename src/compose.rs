//! Text layer creation and alpha compositing.
//!
//! All buffers here hold straight (non-premultiplied) RGBA8. Blending is the
//! Porter-Duff source-over operator, rounded to the nearest integer.

use image::{Rgba, RgbaImage};

use crate::{Error, Result};

/// Channel-wise inverse of `colour`'s RGB with the given alpha.
pub fn inverse(colour: Rgba<u8>, alpha: u8) -> Rgba<u8> {
	let [r, g, b, _] = colour.0;
	Rgba([255 - r, 255 - g, 255 - b, alpha])
}

/// A layer the size of the background, tinted with the inverse of the text colour.
pub fn text_layer(width: u32, height: u32, text_colour: Rgba<u8>, tint_alpha: u8) -> RgbaImage {
	RgbaImage::from_pixel(width, height, inverse(text_colour, tint_alpha))
}

/// Blend `src` over `dst` in place.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
	let src_a = src.0[3] as f32 / 255.0;
	if src_a <= 0.0 {
		return;
	}
	let dst_a = dst.0[3] as f32 / 255.0;
	let out_a = src_a + dst_a * (1.0 - src_a);

	for c in 0..3 {
		let blended = (src.0[c] as f32 * src_a + dst.0[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
		dst.0[c] = blended.round().clamp(0.0, 255.0) as u8;
	}
	dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Composite `layer` over `background`.
pub fn compose(background: &RgbaImage, layer: &RgbaImage) -> Result<RgbaImage> {
	if background.dimensions() != layer.dimensions() {
		return Err(Error::DimensionMismatch {
			background: background.dimensions(),
			layer: layer.dimensions(),
		});
	}

	let mut out = background.clone();
	for (dst, src) in out.pixels_mut().zip(layer.pixels()) {
		blend_over(dst, *src);
	}
	Ok(out)
}
