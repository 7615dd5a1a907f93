use derive_new::new;
use serde::{Deserialize, Deserializer};

/// Author used for quotes listed in the config file as a bare string.
pub const ANONYMOUS: &str = "Anonymous";

/// A quote and its author. Ordering is by author, then text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Quote {
	#[new(into)]
	pub author: String,
	#[new(into)]
	pub text: String,
}

impl<'de> Deserialize<'de> for Quote {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: Deserializer<'de>, {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum QuoteHelper {
			String(String),
			Structured { text: String, author: Option<String> },
		}

		let helper = QuoteHelper::deserialize(deserializer)?;
		Ok(match helper {
			QuoteHelper::String(text) => Quote::new(ANONYMOUS, text),
			QuoteHelper::Structured { text, author } => Quote::new(author.unwrap_or_else(|| ANONYMOUS.to_owned()), text),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn orders_by_author_first() {
		let mut quotes = vec![Quote::new("Zeno", "A"), Quote::new("Austen", "Z"), Quote::new("Austen", "B")];
		quotes.sort();
		assert_eq!(quotes, vec![Quote::new("Austen", "B"), Quote::new("Austen", "Z"), Quote::new("Zeno", "A")]);
	}

	#[test]
	fn deserializes_bare_and_structured_forms() {
		#[derive(Deserialize)]
		struct Wrapper {
			quotes: Vec<Quote>,
		}

		let raw = r#"
			quotes = [
				"Stay hungry.",
				{ text = "Know thyself.", author = "Socrates" },
				{ text = "No author here." },
			]
		"#;
		let cfg = config::Config::builder().add_source(config::File::from_str(raw, config::FileFormat::Toml)).build().unwrap();
		let wrapper: Wrapper = cfg.try_deserialize().unwrap();

		assert_eq!(wrapper.quotes[0], Quote::new(ANONYMOUS, "Stay hungry."));
		assert_eq!(wrapper.quotes[1], Quote::new("Socrates", "Know thyself."));
		assert_eq!(wrapper.quotes[2].author, ANONYMOUS);
	}
}
