use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{
	Result,
	eyre::{WrapErr as _, bail},
};
use quote_wallpaper::{
	Generator, Quote,
	config::AppConfig,
	feed::{HttpQuoteFeed, collect_quotes},
	http,
	photo::HttpPhotoSource,
	typeset::SvgTypesetter,
};
use rand::seq::IndexedRandom as _;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quote_wallpaper")]
#[command(about = "Render quotes onto random landscape photos")]
struct Args {
	/// Config file to read instead of the XDG locations.
	#[arg(long, short)]
	config: Option<PathBuf>,
	/// Existing directory to write the PNGs into. Overrides `output_dir` from the config.
	#[arg(long, short)]
	out: Option<PathBuf>,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Render the quotes a Goodreads user has collected.
	Feed {
		#[arg(long)]
		user_id: String,
		#[arg(long)]
		user_name: String,
		/// Order by author, then quote.
		#[arg(long)]
		sort: bool,
		/// Render only this many randomly chosen quotes.
		#[arg(long)]
		sample: Option<usize>,
		/// Skip quotes of this many characters or more.
		#[arg(long)]
		max_len: Option<usize>,
	},
	/// Render a single quote.
	Quote {
		#[arg(long, short)]
		author: String,
		text: String,
	},
	/// Render the quotes listed in the config file.
	Config {
		/// Render only this many randomly chosen quotes.
		#[arg(long)]
		sample: Option<usize>,
	},
}

fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();
	let args = Args::parse();

	let config = AppConfig::read(args.config.as_deref())?;
	let output_dir = args.out.unwrap_or_else(|| config.output_dir.clone());
	let client = http::client(config.timeout())?;

	let quotes = match args.command {
		Command::Feed {
			user_id,
			user_name,
			sort,
			sample,
			max_len,
		} => {
			let feed = HttpQuoteFeed::goodreads(client.clone(), &config.feed_url, &user_id, &user_name);
			let harvest = collect_quotes(&feed);
			if let Some(e) = &harvest.interrupted {
				warn!(error = %e, pages = harvest.pages, "feed ended early, rendering what was read");
			}
			let mut quotes = harvest.quotes;
			println!("Read {} quotes from {} page(s)", quotes.len(), harvest.pages);
			if sort {
				quotes.sort();
			}
			let max_len = max_len.unwrap_or(config.max_quote_len);
			quotes.retain(|q| q.text.chars().count() < max_len);
			pick(quotes, sample)
		}
		Command::Quote { author, text } => vec![Quote::new(author, text)],
		Command::Config { sample } => pick(config.quotes.clone(), sample),
	};
	if quotes.is_empty() {
		bail!("No quotes to render");
	}

	let render = config.render_config();
	let typesetter = SvgTypesetter::from_file(&render.font_file).wrap_err_with(|| format!("Font {} is unusable", render.font_file.display()))?;
	info!(family = typesetter.family(), quotes = quotes.len(), "rendering");
	let generator = Generator::new(HttpPhotoSource::new(client, &config.photo_url), typesetter, render);

	let report = generator.generate_all(&output_dir, &quotes);
	for path in &report.written {
		println!("Wallpaper written to {}", path.display());
	}
	if report.written.is_empty() {
		bail!("None of the {} quote(s) could be rendered", quotes.len());
	}
	if !report.failed.is_empty() {
		println!("{} of {} quote(s) failed", report.failed.len(), quotes.len());
	}
	Ok(())
}

fn pick(quotes: Vec<Quote>, sample: Option<usize>) -> Vec<Quote> {
	match sample {
		Some(n) => quotes.choose_multiple(&mut rand::rng(), n).cloned().collect(),
		None => quotes,
	}
}
