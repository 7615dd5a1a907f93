//! Quote wallpapers: a quote and its author, fitted, outlined and composited onto a
//! random landscape photo.
//!
//! The pipeline is [`generate::Generator`]: a [`photo::PhotoSource`] supplies the
//! background, [`render::render_quote`] draws onto a tinted layer through a
//! [`typeset::Typesetter`], and [`compose::compose`] blends the layer over the photo.

pub mod compose;
pub mod config;
pub mod error;
pub mod feed;
pub mod filename;
pub mod fit;
pub mod generate;
pub mod http;
pub mod photo;
pub mod quote;
pub mod render;
pub mod typeset;
pub mod wrap;

pub use error::{Error, Result};
pub use generate::{BatchReport, Generator};
pub use quote::Quote;
pub use render::RenderConfig;
