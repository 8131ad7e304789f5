// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Web search links for the current draft

use anyhow::{anyhow, Context, Result};
use std::process::Command;
use url::Url;

/// Build `{base}?q=<text>`; blank text gives `None`
pub fn build_search_url(base: &str, text: &str) -> Result<Option<Url>> {
	let text = text.trim();
	if text.is_empty() {
		return Ok(None);
	}

	let url = Url::parse_with_params(base, &[("q", text)])
		.with_context(|| format!("Invalid search URL: {}", base))?;

	match url.scheme() {
		"http" | "https" => Ok(Some(url)),
		other => Err(anyhow!(
			"Unsupported search URL scheme '{}'. Only http and https are allowed",
			other
		)),
	}
}

/// Hand the URL to the platform's default browser
pub fn open_in_browser(url: &Url) -> Result<()> {
	#[cfg(target_os = "macos")]
	{
		Command::new("open")
			.arg(url.as_str())
			.spawn()
			.context("Failed to open browser")?;
	}

	#[cfg(target_os = "windows")]
	{
		// The empty argument is the window title for `start`
		Command::new("cmd")
			.args(["/C", "start", "", url.as_str()])
			.spawn()
			.context("Failed to open browser")?;
	}

	#[cfg(all(unix, not(target_os = "macos")))]
	{
		Command::new("xdg-open")
			.arg(url.as_str())
			.spawn()
			.context("Failed to open browser (is xdg-open installed?)")?;
	}

	Ok(())
}
