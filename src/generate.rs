//! Fetch a background, draw the quote on a tinted layer, composite, save.

use std::{
	io::{self, BufWriter, Write as _},
	path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use image::{ImageFormat, RgbaImage};
use tracing::{info, warn};

use crate::{
	Error, Result,
	compose::{compose, text_layer},
	filename::output_file_name,
	photo::PhotoSource,
	quote::Quote,
	render::{RenderConfig, render_quote},
	typeset::Typesetter,
};

pub struct Generator<P, T> {
	photos: P,
	typesetter: T,
	config: RenderConfig,
}

/// Outcome of [`Generator::generate_all`].
#[derive(Debug, Default)]
pub struct BatchReport {
	pub written: Vec<PathBuf>,
	pub failed: Vec<(Quote, Error)>,
}

impl<P: PhotoSource, T: Typesetter> Generator<P, T> {
	pub fn new(photos: P, typesetter: T, config: RenderConfig) -> Self {
		Self { photos, typesetter, config }
	}

	/// Render `quote` onto a fresh background and save it into `output_dir`, which must exist.
	pub fn generate(&self, output_dir: &Path, quote: &Quote) -> Result<PathBuf> {
		self.generate_at(output_dir, quote, Local::now().naive_local())
	}

	pub fn generate_at(&self, output_dir: &Path, quote: &Quote, timestamp: NaiveDateTime) -> Result<PathBuf> {
		if !output_dir.is_dir() {
			return Err(Error::Filesystem(format!("output directory {} does not exist", output_dir.display())));
		}

		let background = self.photos.fetch()?;
		let (width, height) = background.dimensions();
		let mut layer = text_layer(width, height, self.config.text_colour, self.config.tint_alpha);
		render_quote(&mut layer, quote, &self.config, &self.typesetter)?;
		let wallpaper = compose(&background, &layer)?;

		let path = save_png(&wallpaper, output_dir, &output_dir.join(output_file_name(quote, timestamp)))?;
		info!(path = %path.display(), width, height, "wrote wallpaper");
		Ok(path)
	}

	/// Generate one file per quote, carrying on past failures.
	pub fn generate_all<'q>(&self, output_dir: &Path, quotes: impl IntoIterator<Item = &'q Quote>) -> BatchReport {
		let mut report = BatchReport::default();
		for quote in quotes {
			match self.generate(output_dir, quote) {
				Ok(path) => report.written.push(path),
				Err(e) => {
					warn!(author = %quote.author, error = %e, "skipping quote");
					report.failed.push((quote.clone(), e));
				}
			}
		}
		report
	}
}

/// Encode to a temporary file next to `path`, then rename it into place. An existing
/// file is never replaced: the name gets a `-2`, `-3`, … suffix instead.
fn save_png(image: &RgbaImage, dir: &Path, path: &Path) -> Result<PathBuf> {
	let mut tmp = tempfile::Builder::new().prefix(".quote_wallpaper-").suffix(".tmp").tempfile_in(dir)?;
	{
		let mut writer = BufWriter::new(tmp.as_file_mut());
		image
			.write_to(&mut writer, ImageFormat::Png)
			.map_err(|e| Error::Filesystem(format!("failed to encode PNG: {e}")))?;
		writer.flush()?;
	}

	let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
	let mut target = path.to_path_buf();
	let mut n = 1;
	loop {
		match tmp.persist_noclobber(&target) {
			Ok(_) => return Ok(target),
			Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
				tmp = e.file;
				n += 1;
				target = path.with_file_name(format!("{stem}-{n}.png"));
			}
			Err(e) => return Err(Error::Filesystem(format!("cannot move output into {}: {}", target.display(), e.error))),
		}
	}
}
