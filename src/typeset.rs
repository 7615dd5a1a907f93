//! Text measurement and rasterisation.
//!
//! The renderer only decides *where* text goes; a [`Typesetter`] knows how big a
//! string is at a given size and how to put it on a canvas. [`SvgTypesetter`]
//! does both through usvg/resvg with a single font file loaded into fontdb.

use std::{collections::HashMap, path::Path, sync::Arc};

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::{Error, Result, compose::blend_over};

/// Rendered size of a string. `left`/`top` locate the text box relative to the
/// pen origin on the baseline, so `top` is usually negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
	pub width: f32,
	pub height: f32,
	pub left: f32,
	pub top: f32,
}

/// One positioned draw of `text`, with `(x, y)` the top-left corner of its box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
	pub text: String,
	pub x: f32,
	pub y: f32,
	pub size: u32,
	pub colour: Rgba<u8>,
}

pub trait Typesetter {
	fn extent(&self, text: &str, size: u32) -> Result<TextExtent>;

	/// Draw `runs` in order, each blended over what is already on the canvas.
	fn draw(&self, canvas: &mut RgbaImage, runs: &[TextRun]) -> Result<()>;
}

impl<T: Typesetter + ?Sized> Typesetter for &T {
	fn extent(&self, text: &str, size: u32) -> Result<TextExtent> {
		(**self).extent(text, size)
	}

	fn draw(&self, canvas: &mut RgbaImage, runs: &[TextRun]) -> Result<()> {
		(**self).draw(canvas, runs)
	}
}

pub struct SvgTypesetter {
	family: String,
	options: usvg::Options<'static>,
}

impl SvgTypesetter {
	pub fn from_file(path: &Path) -> Result<Self> {
		let mut fontdb = fontdb::Database::new();
		fontdb
			.load_font_file(path)
			.map_err(|e| Error::Render(format!("cannot load font {}: {e}", path.display())))?;
		let family = fontdb
			.faces()
			.find_map(|face| face.families.first().map(|(name, _)| name.clone()))
			.ok_or_else(|| Error::Render(format!("no usable font face in {}", path.display())))?;
		debug!(%family, path = %path.display(), "loaded font");

		let mut options = usvg::Options::default();
		options.fontdb = Arc::new(fontdb);
		Ok(Self { family, options })
	}

	pub fn family(&self) -> &str {
		&self.family
	}

	fn text_element(&self, text: &str, x: f32, baseline: f32, size: u32, colour: Rgba<u8>) -> String {
		let [r, g, b, a] = colour.0;
		format!(
			r#"<text x="{x}" y="{baseline}" font-family="{}" font-size="{size}" fill="rgb({r},{g},{b})" fill-opacity="{}" xml:space="preserve">{}</text>"#,
			escape_xml(&self.family),
			a as f32 / 255.0,
			escape_xml(text),
		)
	}

	fn parse(&self, width: u32, height: u32, body: &str) -> Result<usvg::Tree> {
		let svg = format!(r#"<?xml version="1.0" encoding="UTF-8"?><svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">{body}</svg>"#);
		usvg::Tree::from_str(&svg, &self.options).map_err(|e| Error::Render(format!("svg text layout failed: {e}")))
	}
}

impl Typesetter for SvgTypesetter {
	fn extent(&self, text: &str, size: u32) -> Result<TextExtent> {
		if text.trim().is_empty() {
			return Ok(TextExtent::default());
		}
		let tree = self.parse(1, 1, &self.text_element(text, 0.0, 0.0, size, Rgba([0, 0, 0, 255])))?;
		let bbox = tree.root().bounding_box();
		if bbox.width() <= 0.0 {
			return Err(Error::Render(format!("font '{}' produced no glyphs for {text:?}", self.family)));
		}
		Ok(TextExtent {
			width: bbox.width(),
			height: bbox.height(),
			left: bbox.x(),
			top: bbox.y(),
		})
	}

	fn draw(&self, canvas: &mut RgbaImage, runs: &[TextRun]) -> Result<()> {
		let mut extents: HashMap<(&str, u32), TextExtent> = HashMap::new();
		let mut body = String::new();
		for run in runs {
			let extent = match extents.get(&(run.text.as_str(), run.size)) {
				Some(extent) => *extent,
				None => {
					let extent = self.extent(&run.text, run.size)?;
					extents.insert((run.text.as_str(), run.size), extent);
					extent
				}
			};
			if extent.width <= 0.0 {
				continue;
			}
			body.push_str(&self.text_element(&run.text, run.x - extent.left, run.y - extent.top, run.size, run.colour));
		}
		if body.is_empty() {
			return Ok(());
		}

		let (width, height) = canvas.dimensions();
		let tree = self.parse(width, height, &body)?;
		let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| Error::Render(format!("cannot allocate {width}x{height} pixmap")))?;
		resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

		// resvg output is premultiplied; the canvas is straight alpha
		for (x, y, dst) in canvas.enumerate_pixels_mut() {
			let Some(src) = pixmap.pixel(x, y) else { continue };
			if src.alpha() == 0 {
				continue;
			}
			let src = src.demultiply();
			blend_over(dst, Rgba([src.red(), src.green(), src.blue(), src.alpha()]));
		}
		Ok(())
	}
}

fn escape_xml(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;").replace('\'', "&apos;")
}

/// Deterministic stand-in for a real font: every character is a box `size`
/// tall and `0.6 * size` wide, spaces are left blank.
#[cfg(test)]
pub(crate) mod testing {
	use super::*;

	pub(crate) struct BlockTypesetter;

	impl BlockTypesetter {
		pub(crate) fn advance(size: u32) -> f32 {
			size as f32 * 0.6
		}
	}

	impl Typesetter for BlockTypesetter {
		fn extent(&self, text: &str, size: u32) -> Result<TextExtent> {
			if text.is_empty() {
				return Ok(TextExtent::default());
			}
			Ok(TextExtent {
				width: text.chars().count() as f32 * Self::advance(size),
				height: size as f32,
				left: 0.0,
				top: -(size as f32),
			})
		}

		fn draw(&self, canvas: &mut RgbaImage, runs: &[TextRun]) -> Result<()> {
			let (width, height) = canvas.dimensions();
			for run in runs {
				let advance = Self::advance(run.size);
				for (i, ch) in run.text.chars().enumerate() {
					if ch == ' ' {
						continue;
					}
					let x0 = (run.x + i as f32 * advance).round().max(0.0) as u32;
					let x1 = ((run.x + (i as f32 + 1.0) * advance).round().max(0.0) as u32).min(width);
					let y0 = run.y.round().max(0.0) as u32;
					let y1 = ((run.y + run.size as f32).round().max(0.0) as u32).min(height);
					for y in y0..y1 {
						for x in x0..x1 {
							blend_over(canvas.get_pixel_mut(x, y), run.colour);
						}
					}
				}
			}
			Ok(())
		}
	}
}
