//! Font size selection.

use crate::{Error, Result, typeset::Typesetter};

pub const MIN_FONT_SIZE: u32 = 1;
pub const MAX_FONT_SIZE: u32 = 4096;

/// Largest size at which `sample` stays narrower than `width_fraction` of the
/// canvas, then shrunk until it is no taller than `height_fraction` of it.
///
/// Width is non-decreasing in size, so the bound is found by doubling to bracket
/// it and bisecting inside the bracket. Never returns less than [`MIN_FONT_SIZE`].
pub fn fit_font<T: Typesetter>(typesetter: &T, sample: &str, canvas_width: u32, canvas_height: u32, width_fraction: f32, height_fraction: f32) -> Result<u32> {
	if sample.trim().is_empty() {
		return Err(Error::Render("cannot fit a font to empty text".to_owned()));
	}
	let max_width = width_fraction * canvas_width as f32;
	let max_height = height_fraction * canvas_height as f32;
	let fits_width = |size: u32| -> Result<bool> { Ok(typesetter.extent(sample, size)?.width < max_width) };

	let mut size = if !fits_width(MIN_FONT_SIZE)? {
		MIN_FONT_SIZE
	} else {
		// invariant: `good` fits, `bad` doesn't (or is past the cap)
		let mut good = MIN_FONT_SIZE;
		let mut bad = MIN_FONT_SIZE * 2;
		while bad <= MAX_FONT_SIZE && fits_width(bad)? {
			good = bad;
			bad *= 2;
		}
		let mut bad = bad.min(MAX_FONT_SIZE + 1);
		while bad - good > 1 {
			let mid = good + (bad - good) / 2;
			if fits_width(mid)? {
				good = mid;
			} else {
				bad = mid;
			}
		}
		good
	};

	while size > MIN_FONT_SIZE && typesetter.extent(sample, size)?.height > max_height {
		size -= 1;
	}
	Ok(size)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::typeset::{TextExtent, testing::BlockTypesetter};

	/// Very tall, narrow glyphs, to exercise the height cap.
	struct TallTypesetter;

	impl Typesetter for TallTypesetter {
		fn extent(&self, text: &str, size: u32) -> Result<TextExtent> {
			Ok(TextExtent {
				width: text.len() as f32 * size as f32 * 0.1,
				height: size as f32 * 3.0,
				..Default::default()
			})
		}

		fn draw(&self, _: &mut image::RgbaImage, _: &[crate::typeset::TextRun]) -> Result<()> {
			Ok(())
		}
	}

	fn width_at(text: &str, size: u32) -> f32 {
		BlockTypesetter.extent(text, size).unwrap().width
	}

	#[test]
	fn size_is_the_tight_width_bound() {
		for text in ["Test.", "a much longer line of quote text", "x"] {
			for canvas_width in [320, 800, 1600, 2560] {
				let size = fit_font(&BlockTypesetter, text, canvas_width, 100_000, 0.8, 0.3).unwrap();
				let limit = 0.8 * canvas_width as f32;
				assert!(width_at(text, size) < limit, "{text:?} @ {canvas_width}: {size}");
				assert!(width_at(text, size + 1) >= limit, "{text:?} @ {canvas_width}: {size} is not tight");
			}
		}
	}

	#[test]
	fn height_cap_shrinks_the_size() {
		let size = fit_font(&TallTypesetter, "ab", 1600, 900, 0.8, 0.3).unwrap();
		assert_eq!(size, 90);
	}

	#[test]
	fn never_below_the_floor() {
		let long = "w".repeat(10_000);
		assert_eq!(fit_font(&BlockTypesetter, &long, 100, 100, 0.8, 0.3).unwrap(), MIN_FONT_SIZE);
	}

	#[test]
	fn empty_sample_is_rejected() {
		assert!(matches!(fit_font(&BlockTypesetter, "  ", 1600, 900, 0.8, 0.3), Err(Error::Render(_))));
	}
}
