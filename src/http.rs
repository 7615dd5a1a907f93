use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::{Error, Result};

pub fn client(timeout: Duration) -> Result<Client> {
	Client::builder()
		.timeout(timeout)
		.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
		.build()
		.map_err(|e| Error::Fetch(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and return the body, treating any non-2xx status as a failure.
pub fn get_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
	let res = client.get(url).send().map_err(|e| Error::Fetch(format!("GET {url} failed: {e}")))?;
	let status = res.status();
	if !status.is_success() {
		return Err(Error::Fetch(format!("GET {url} returned {status}")));
	}
	let body = res.bytes().map_err(|e| Error::Fetch(format!("failed to read body of {url}: {e}")))?;
	debug!(url, bytes = body.len(), "fetched");
	Ok(body.to_vec())
}
