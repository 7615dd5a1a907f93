use chrono::NaiveDateTime;

use crate::quote::Quote;

/// Leading characters of the quote text that go into the output file name.
pub const QUOTE_PREFIX_CHARS: usize = 13;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const UNSAFE: [char; 10] = [' ', '/', '<', '>', ':', '\\', '"', '|', '?', '*'];

/// Lowercase `text` and replace path-hostile characters with `_`.
pub fn normalize(text: &str) -> String {
	text.to_lowercase().chars().map(|c| if UNSAFE.contains(&c) { '_' } else { c }).collect()
}

/// `<author>_<quote prefix>_<YYYYMMDD-HHMMSS>.png`
pub fn output_file_name(quote: &Quote, timestamp: NaiveDateTime) -> String {
	let prefix: String = quote.text.chars().take(QUOTE_PREFIX_CHARS).collect();
	format!("{}_{}_{}.png", normalize(&quote.author), normalize(&prefix), timestamp.format(TIMESTAMP_FORMAT))
}
