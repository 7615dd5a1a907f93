//! Background photo sources.

use image::RgbaImage;
use reqwest::blocking::Client;

use crate::{Error, Result, http::get_bytes};

pub const DEFAULT_PHOTO_URL: &str = "https://picsum.photos/1600/900";

/// Anything that can hand out a background image. Each call may return a different one.
pub trait PhotoSource {
	fn fetch(&self) -> Result<RgbaImage>;
}

impl<P: PhotoSource + ?Sized> PhotoSource for &P {
	fn fetch(&self) -> Result<RgbaImage> {
		(**self).fetch()
	}
}

/// A random-photo endpoint that answers a plain GET with JPEG or PNG bytes.
pub struct HttpPhotoSource {
	client: Client,
	url: String,
}

impl HttpPhotoSource {
	pub fn new(client: Client, url: impl Into<String>) -> Self {
		Self { client, url: url.into() }
	}
}

impl PhotoSource for HttpPhotoSource {
	fn fetch(&self) -> Result<RgbaImage> {
		let bytes = get_bytes(&self.client, &self.url)?;
		decode_photo(&bytes)
	}
}

pub fn decode_photo(bytes: &[u8]) -> Result<RgbaImage> {
	image::load_from_memory(bytes)
		.map(|img| img.to_rgba8())
		.map_err(|e| Error::Fetch(format!("photo is not a decodable image: {e}")))
}
