use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use color_eyre::eyre::{Result, WrapErr as _, bail};
use image::Rgba;
use serde::Deserialize;

use crate::{
	feed::GOODREADS_RSS,
	photo::DEFAULT_PHOTO_URL,
	quote::Quote,
	render::{RenderConfig, ShadowStyle},
};

const ENV_PREFIX: &str = "QUOTE_WALLPAPER";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	pub font_file: PathBuf,
	/// RGBA, 0-255 per channel.
	pub text_colour: [u8; 4],
	pub margin: usize,
	pub width_fraction: f32,
	pub height_fraction: f32,
	pub author_min_size: u32,
	pub tint_alpha: u8,
	pub shadow_opacities: [u8; 4],
	pub photo_url: String,
	pub feed_url: String,
	pub output_dir: PathBuf,
	pub timeout_secs: u64,
	/// Feed quotes this long or longer (in chars) are not rendered.
	pub max_quote_len: usize,
	pub quotes: Vec<Quote>,
}

impl Default for AppConfig {
	fn default() -> Self {
		let render = RenderConfig::default();
		Self {
			font_file: render.font_file,
			text_colour: render.text_colour.0,
			margin: render.margin,
			width_fraction: render.width_fraction,
			height_fraction: render.height_fraction,
			author_min_size: render.author_min_size,
			tint_alpha: render.tint_alpha,
			shadow_opacities: render.shadow.opacities,
			photo_url: DEFAULT_PHOTO_URL.to_owned(),
			feed_url: GOODREADS_RSS.to_owned(),
			output_dir: PathBuf::from("."),
			timeout_secs: 30,
			max_quote_len: 80,
			quotes: Vec::new(),
		}
	}
}

/// `QUOTE_WALLPAPER_TINT_ALPHA=64`, `QUOTE_WALLPAPER_TEXT_COLOUR=250,240,0,255`.
fn environment() -> config::Environment {
	config::Environment::with_prefix(ENV_PREFIX)
		.prefix_separator("_")
		.separator("__")
		.try_parsing(true)
		.list_separator(",")
		.with_list_parse_key("text_colour")
		.with_list_parse_key("shadow_opacities")
}

impl AppConfig {
	/// Read `path`, or else whatever exists of `$XDG_CONFIG_HOME/quote_wallpaper[/config].*`,
	/// with `QUOTE_WALLPAPER_*` environment variables on top.
	pub fn read(path: Option<&Path>) -> Result<Self> {
		Self::load(path, environment())
	}

	fn load(path: Option<&Path>, env: config::Environment) -> Result<Self> {
		let app_name = env!("CARGO_PKG_NAME");
		let mut builder = config::Config::builder();

		match path {
			Some(path) => {
				builder = builder.add_source(config::File::with_name(&path.to_string_lossy()).required(true));
			}
			None => {
				if let Some(xdg_conf_dir) = xdg::BaseDirectories::new().get_config_home() {
					let locations = [xdg_conf_dir.join(app_name), xdg_conf_dir.join(app_name).join("config")];
					for location in locations.iter() {
						builder = builder.add_source(config::File::with_name(&location.to_string_lossy()).required(false));
					}
				}
			}
		}
		builder = builder.add_source(env);

		let raw: config::Config = builder.build().wrap_err("Config file could not be read")?;
		let config: Self = raw.try_deserialize().wrap_err("Config file is invalid")?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<()> {
		if !(self.width_fraction > 0.0 && self.width_fraction <= 1.0) {
			bail!("width_fraction must be in (0, 1], got {}", self.width_fraction);
		}
		if !(self.height_fraction > 0.0 && self.height_fraction <= 1.0) {
			bail!("height_fraction must be in (0, 1], got {}", self.height_fraction);
		}
		if self.margin == 0 {
			bail!("margin must be at least one character");
		}
		Ok(())
	}

	pub fn render_config(&self) -> RenderConfig {
		RenderConfig {
			font_file: self.font_file.clone(),
			text_colour: Rgba(self.text_colour),
			margin: self.margin,
			width_fraction: self.width_fraction,
			height_fraction: self.height_fraction,
			author_min_size: self.author_min_size,
			tint_alpha: self.tint_alpha,
			shadow: ShadowStyle {
				opacities: self.shadow_opacities,
				..ShadowStyle::default()
			},
		}
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::quote::ANONYMOUS;

	fn write_config(dir: &Path, body: &str) -> PathBuf {
		let path = dir.join("quote_wallpaper.toml");
		std::fs::write(&path, body).unwrap();
		path
	}

	#[test]
	fn empty_file_gives_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let config = AppConfig::read(Some(write_config(dir.path(), "").as_path())).unwrap();

		let render = config.render_config();
		assert_eq!(render.text_colour, Rgba([255, 255, 255, 255]));
		assert_eq!(render.margin, 40);
		assert_eq!(render.width_fraction, 0.8);
		assert_eq!(render.shadow, ShadowStyle::default());
		assert_eq!(config.max_quote_len, 80);
		assert_eq!(config.timeout(), Duration::from_secs(30));
	}

	#[test]
	fn reads_overrides_and_quotes() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_config(
			dir.path(),
			r#"
				font_file = "/usr/share/fonts/Roboto.ttf"
				text_colour = [250, 240, 0, 255]
				margin = 50
				tint_alpha = 64
				quotes = ["Just text.", { text = "With author.", author = "Someone" }]
			"#,
		);
		let config = AppConfig::read(Some(path.as_path())).unwrap();

		let render = config.render_config();
		assert_eq!(render.font_file, PathBuf::from("/usr/share/fonts/Roboto.ttf"));
		assert_eq!(render.text_colour, Rgba([250, 240, 0, 255]));
		assert_eq!(render.margin, 50);
		assert_eq!(render.tint_alpha, 64);
		assert_eq!(config.quotes, vec![Quote::new(ANONYMOUS, "Just text."), Quote::new("Someone", "With author.")]);
	}

	#[test]
	fn environment_overrides_file_including_lists() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_config(dir.path(), "margin = 50\ntint_alpha = 64");
		let vars = config::Map::from([
			("QUOTE_WALLPAPER_TINT_ALPHA".to_owned(), "32".to_owned()),
			("QUOTE_WALLPAPER_TEXT_COLOUR".to_owned(), "250,240,0,255".to_owned()),
			("QUOTE_WALLPAPER_SHADOW_OPACITIES".to_owned(), "8,16,24,32".to_owned()),
			("QUOTE_WALLPAPER_PHOTO_URL".to_owned(), "http://localhost/photo".to_owned()),
			("OTHER_APP_MARGIN".to_owned(), "7".to_owned()),
		]);
		let config = AppConfig::load(Some(path.as_path()), environment().source(Some(vars))).unwrap();

		let render = config.render_config();
		assert_eq!(render.margin, 50);
		assert_eq!(render.tint_alpha, 32);
		assert_eq!(render.text_colour, Rgba([250, 240, 0, 255]));
		assert_eq!(render.shadow.opacities, [8, 16, 24, 32]);
		assert_eq!(config.photo_url, "http://localhost/photo");
	}

	#[test]
	fn rejects_out_of_range_fraction() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_config(dir.path(), "width_fraction = 1.5");
		let err = AppConfig::read(Some(path.as_path())).unwrap_err();
		assert!(err.to_string().contains("width_fraction"));
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(AppConfig::read(Some(dir.path().join("absent.toml").as_path())).is_err());
	}
}
