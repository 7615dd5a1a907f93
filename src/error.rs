//! Error kinds shared by the rendering pipeline and its collaborators.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
	/// Photo source or feed page unreachable, non-2xx, or undecodable.
	#[error("fetch failed: {0}")]
	Fetch(String),

	/// A single feed entry could not be split into quote and author.
	#[error("malformed feed entry: {0}")]
	FeedParse(String),

	/// Layout could not be produced, or the font could not be used.
	#[error("render failed: {0}")]
	Render(String),

	#[error("text layer is {}x{} but background is {}x{}", layer.0, layer.1, background.0, background.1)]
	DimensionMismatch { background: (u32, u32), layer: (u32, u32) },

	/// Output directory missing or unwritable.
	#[error("filesystem error: {0}")]
	Filesystem(String),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Filesystem(err.to_string())
	}
}
