//! Quote feeds: paginated RSS/Atom pages whose entry summaries read
//! `"<quote text> -- <author>"`.

use reqwest::blocking::Client;
use roxmltree::{Document, Node};
use scraper::Html;
use tracing::{info, warn};

use crate::{Error, Result, http::get_bytes, quote::Quote};

pub const GOODREADS_RSS: &str = "https://www.goodreads.com/quotes/list_rss";

const SEPARATOR: &str = "-- ";
const QUOTE_MARKS: &[char] = &['"', '\u{201c}', '\u{201d}', '\u{ab}', '\u{bb}'];

pub trait QuoteFeed {
	/// Quotes on the 1-based `page`. An empty page means the feed is exhausted.
	fn page(&self, page: u32) -> Result<Vec<Quote>>;
}

pub struct HttpQuoteFeed {
	client: Client,
	base: String,
}

impl HttpQuoteFeed {
	/// Feed of the quotes a Goodreads user has liked, e.g. `base_url/5705326-antonia`.
	pub fn goodreads(client: Client, base_url: &str, user_id: &str, user_name: &str) -> Self {
		Self {
			client,
			base: format!("{}/{user_id}-{user_name}", base_url.trim_end_matches('/')),
		}
	}

	pub fn page_url(&self, page: u32) -> String {
		format!("{}?page={page}", self.base)
	}
}

impl QuoteFeed for HttpQuoteFeed {
	fn page(&self, page: u32) -> Result<Vec<Quote>> {
		let url = self.page_url(page);
		let bytes = get_bytes(&self.client, &url)?;
		let xml = String::from_utf8(bytes).map_err(|e| Error::Fetch(format!("{url} is not UTF-8: {e}")))?;
		parse_feed_page(&xml)
	}
}

/// Everything gathered from a feed, and why gathering stopped early if it did.
#[derive(Debug, Default)]
pub struct FeedHarvest {
	pub quotes: Vec<Quote>,
	/// Number of non-empty pages read.
	pub pages: u32,
	/// Set when a page could not be fetched; `quotes` holds what came before it.
	pub interrupted: Option<Error>,
}

/// Read pages 1, 2, … until one comes back empty or fails.
pub fn collect_quotes<F: QuoteFeed + ?Sized>(feed: &F) -> FeedHarvest {
	let mut harvest = FeedHarvest::default();
	for page in 1.. {
		match feed.page(page) {
			Ok(quotes) if quotes.is_empty() => break,
			Ok(quotes) => {
				info!(page, count = quotes.len(), "read feed page");
				harvest.pages = page;
				harvest.quotes.extend(quotes);
			}
			Err(e) => {
				warn!(page, error = %e, "feed page failed, keeping {} quotes", harvest.quotes.len());
				harvest.interrupted = Some(e);
				break;
			}
		}
	}
	harvest
}

/// Quotes of one RSS (`item`/`description`) or Atom (`entry`/`summary`) page.
/// Entries that don't split into quote and author are logged and skipped.
pub fn parse_feed_page(xml: &str) -> Result<Vec<Quote>> {
	let doc = Document::parse(xml).map_err(|e| Error::Fetch(format!("feed page is not valid XML: {e}")))?;
	let mut quotes = Vec::new();
	for entry in doc.descendants().filter(|n| n.is_element() && matches!(n.tag_name().name(), "item" | "entry")) {
		match parse_entry(entry) {
			Ok(quote) => quotes.push(quote),
			Err(e) => warn!(error = %e, "skipping feed entry"),
		}
	}
	Ok(quotes)
}

fn parse_entry(entry: Node) -> Result<Quote> {
	let summary = entry
		.children()
		.find(|n| n.is_element() && matches!(n.tag_name().name(), "description" | "summary" | "content"))
		.ok_or_else(|| Error::FeedParse("entry has no summary".to_owned()))?;
	let raw: String = summary.descendants().filter_map(|n| if n.is_text() { n.text() } else { None }).collect();
	split_summary(&raw)
}

/// Split at the right-most `"-- "`; the quote itself may contain dashes.
pub fn split_summary(summary: &str) -> Result<Quote> {
	let sep = summary.rfind(SEPARATOR).ok_or_else(|| Error::FeedParse(format!("no author separator in {summary:?}")))?;
	let text = unescape_html(&summary[..sep]);
	let text = strip_enclosing_marks(&text);
	let author = unescape_html(&summary[sep + SEPARATOR.len()..]);

	if text.is_empty() {
		return Err(Error::FeedParse(format!("empty quote in {summary:?}")));
	}
	if author.is_empty() {
		return Err(Error::FeedParse(format!("empty author in {summary:?}")));
	}
	Ok(Quote::new(author, text))
}

/// Drop one pair of quotation marks around the whole text, leaving inner ones alone.
fn strip_enclosing_marks(text: &str) -> &str {
	let text = text.trim();
	match text.strip_prefix(QUOTE_MARKS).and_then(|inner| inner.strip_suffix(QUOTE_MARKS)) {
		Some(inner) => inner.trim(),
		None => text,
	}
}

/// Decode entities and drop markup, collapsing whitespace.
fn unescape_html(fragment: &str) -> String {
	let fragment = fragment.replace("<br>", "\n").replace("<br/>", "\n").replace("<br />", "\n");
	let text: String = Html::parse_fragment(&fragment).root_element().text().collect();
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}
