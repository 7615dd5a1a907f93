//! Quote layout and the layered outline effect.
//!
//! A quote is drawn as its wrapped lines, a blank spacer, and the author line,
//! the whole block centred vertically and each line centred horizontally. Every
//! line gets four rings of diagonal offset copies in the inverse colour, faint on
//! the outside and denser toward the glyphs, before the text itself goes on top.

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::{
	Result,
	compose::inverse,
	fit::fit_font,
	quote::Quote,
	typeset::{TextExtent, TextRun, Typesetter},
	wrap::wrap_quote,
};

/// Outline passes, outermost first.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowStyle {
	/// Alpha of the passes at offsets `4s, 3s, 2s, 1s`.
	pub opacities: [u8; 4],
	/// The step `s` is a line's rendered height divided by this.
	pub scale_divisor: f32,
}

impl Default for ShadowStyle {
	fn default() -> Self {
		Self {
			opacities: [32, 64, 128, 192],
			scale_divisor: 100.0,
		}
	}
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
	pub font_file: PathBuf,
	pub text_colour: Rgba<u8>,
	/// Minimum wrap column, in characters.
	pub margin: usize,
	/// Share of the canvas width the longest line may occupy.
	pub width_fraction: f32,
	/// Share of the canvas height a single line may occupy.
	pub height_fraction: f32,
	pub author_min_size: u32,
	/// Alpha of the inverse-colour tint the text layer starts with.
	pub tint_alpha: u8,
	pub shadow: ShadowStyle,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			font_file: PathBuf::from("data/fonts/Roboto-Regular.ttf"),
			text_colour: Rgba([255, 255, 255, 255]),
			margin: 40,
			width_fraction: 0.8,
			height_fraction: 0.3,
			author_min_size: 20,
			tint_alpha: 128,
			shadow: ShadowStyle::default(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
	pub text: String,
	pub x: f32,
	pub y: f32,
	pub size: u32,
	pub extent: TextExtent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuoteLayout {
	pub size: u32,
	pub author_size: u32,
	/// Quote lines in order, then the author line if there is one.
	pub lines: Vec<PlacedLine>,
}

impl QuoteLayout {
	/// Draw requests for every line: the outline rings, then the text.
	pub fn runs(&self, colour: Rgba<u8>, shadow: &ShadowStyle) -> Vec<TextRun> {
		let mut runs = Vec::with_capacity(self.lines.len() * 17);
		for line in &self.lines {
			let step = line.extent.height / shadow.scale_divisor;
			for (k, alpha) in (1..=4).rev().zip(shadow.opacities) {
				let d = k as f32 * step;
				let border = inverse(colour, alpha);
				for (dx, dy) in [(-d, d), (d, d), (-d, -d), (d, -d)] {
					runs.push(TextRun {
						text: line.text.clone(),
						x: line.x + dx,
						y: line.y + dy,
						size: line.size,
						colour: border,
					});
				}
			}
			runs.push(TextRun {
				text: line.text.clone(),
				x: line.x,
				y: line.y,
				size: line.size,
				colour,
			});
		}
		runs
	}
}

pub fn layout_quote<T: Typesetter>(typesetter: &T, quote: &Quote, width: u32, height: u32, config: &RenderConfig) -> Result<QuoteLayout> {
	let wrapped = wrap_quote(&quote.text, config.margin)?;
	let longest = wrapped.iter().max_by_key(|line| line.chars().count()).map(String::as_str).unwrap_or_default();

	let size = fit_font(typesetter, longest, width, height, config.width_fraction, config.height_fraction)?;
	let author_size = (size / 2).max(config.author_min_size);

	let mut blocks = Vec::with_capacity(wrapped.len() + 1);
	for line in wrapped {
		let extent = typesetter.extent(&line, size)?;
		blocks.push((line, size, extent));
	}

	let author = quote.author.trim();
	let mut spacer = 0.0;
	if !author.is_empty() {
		spacer = typesetter.extent(author, size)?.height;
		let extent = typesetter.extent(author, author_size)?;
		blocks.push((author.to_owned(), author_size, extent));
	}

	let block_height: f32 = blocks.iter().map(|(_, _, extent)| extent.height).sum::<f32>() + spacer;
	let mut y = (height as f32 - block_height) / 2.0;
	let quote_lines = blocks.len() - usize::from(!author.is_empty());

	let mut lines = Vec::with_capacity(blocks.len());
	for (i, (text, size, extent)) in blocks.into_iter().enumerate() {
		if i == quote_lines {
			y += spacer;
		}
		lines.push(PlacedLine {
			x: (width as f32 - extent.width) / 2.0,
			y,
			text,
			size,
			extent,
		});
		y += extent.height;
	}

	debug!(size, author_size, lines = lines.len(), "laid out quote");
	Ok(QuoteLayout { size, author_size, lines })
}

/// Lay out `quote` on `canvas` and draw it, outline first.
pub fn render_quote<T: Typesetter>(canvas: &mut RgbaImage, quote: &Quote, config: &RenderConfig, typesetter: &T) -> Result<()> {
	let (width, height) = canvas.dimensions();
	let layout = layout_quote(typesetter, quote, width, height, config)?;
	let runs = layout.runs(config.text_colour, &config.shadow);
	typesetter.draw(canvas, &runs)
}
