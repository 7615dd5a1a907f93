//! Greedy word wrap for quote text.

use unicode_linebreak::linebreaks;

use crate::{Error, Result};

/// Wrap column for `text`: a quarter of its length, but never narrower than `margin`.
pub fn wrap_width(text: &str, margin: usize) -> usize {
	(text.chars().count() / 4).max(margin).max(1)
}

/// Break `text` into lines of at most [`wrap_width`] characters.
///
/// Lines break at UAX #14 opportunities (after spaces and hyphens). A word wider
/// than the column fills what is left of the current line and continues on the
/// next ones. Whitespace runs collapse to one space.
pub fn wrap_quote(text: &str, margin: usize) -> Result<Vec<String>> {
	let width = wrap_width(text, margin);
	let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
	let mut lines = Vec::new();
	let mut line = String::new();
	let mut start = 0;

	for (end, _) in linebreaks(&text) {
		let mut segment = &text[start..end];
		start = end;
		loop {
			let line_len = line.chars().count();
			let word_len = segment.trim_end().chars().count();
			if line_len + word_len <= width {
				line.push_str(segment);
				break;
			}
			let room = width.saturating_sub(line_len);
			if word_len <= width || room == 0 {
				lines.push(line.trim_end().to_owned());
				line.clear();
				continue;
			}
			let split = segment.char_indices().nth(room).map_or(segment.len(), |(i, _)| i);
			line.push_str(&segment[..split]);
			lines.push(std::mem::take(&mut line));
			segment = &segment[split..];
		}
	}
	let last = line.trim_end();
	if !last.is_empty() {
		lines.push(last.to_owned());
	}

	if lines.is_empty() {
		return Err(Error::Render("quote text is blank".to_owned()));
	}
	Ok(lines)
}

#[cfg(test)]
mod tests {
	use super::*;

	const LUDLUM: &str = "The easiest thing in the world is to convince yourself that you're right. As one grows old, it is easier still.";

	#[test]
	fn width_never_below_margin() {
		assert_eq!(wrap_width("short", 40), 40);
		let long = "x".repeat(400);
		assert_eq!(wrap_width(&long, 40), 100);
	}

	#[test]
	fn short_quote_is_a_single_line() {
		assert_eq!(wrap_quote("Test.", 40).unwrap(), vec!["Test.".to_owned()]);
	}

	#[test]
	fn lines_respect_width_and_rebuild_text() {
		for margin in [10, 20, 40] {
			let lines = wrap_quote(LUDLUM, margin).unwrap();
			let width = wrap_width(LUDLUM, margin);
			assert!(lines.iter().all(|l| !l.is_empty() && l.chars().count() <= width), "{lines:?}");
			assert_eq!(lines.join(" "), LUDLUM);
		}
	}

	#[test]
	fn breaks_are_greedy() {
		let lines = wrap_quote("aaa bbb ccc ddd", 7).unwrap();
		assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
	}

	#[test]
	fn overlong_word_fills_the_line_then_continues() {
		// 29 chars, so the column is the margin of 7
		let lines = wrap_quote("tiny supercalifragilistic end", 7).unwrap();
		assert_eq!(lines, vec!["tiny su", "percali", "fragili", "stic", "end"]);
		assert!(lines.iter().all(|l| l.chars().count() <= 7));
		assert_eq!(lines.concat().replace(' ', ""), "tinysupercalifragilisticend");
	}

	#[test]
	fn breaks_after_hyphens() {
		let lines = wrap_quote("a self-explanatory thing", 12).unwrap();
		assert_eq!(lines, vec!["a self-", "explanatory", "thing"]);
	}

	#[test]
	fn collapses_whitespace_and_counts_chars_not_bytes() {
		let lines = wrap_quote("  ééé   ééé\n ééé ", 7).unwrap();
		assert_eq!(lines, vec!["ééé ééé", "ééé"]);
	}

	#[test]
	fn blank_text_is_a_render_error() {
		assert!(matches!(wrap_quote(" \t\n", 40), Err(Error::Render(_))));
	}
}
