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

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use octochat::config::{mask_secret, Config, LogLevel};

#[derive(Args, Debug)]
pub struct ConfigArgs {
	/// Set the model (provider:model format, e.g., google:gemini-1.5-flash)
	#[arg(long)]
	pub model: Option<String>,

	/// Set log level (none, info, debug)
	#[arg(long)]
	pub log_level: Option<String>,

	/// Set the request timeout in seconds
	#[arg(long)]
	pub timeout: Option<u64>,

	/// Show current configuration values with defaults
	#[arg(long)]
	pub show: bool,
}

// Handle the configuration command
pub fn execute(args: &ConfigArgs, mut config: Config) -> Result<()> {
	if args.show {
		show_configuration(&config);
		return Ok(());
	}

	let mut modified = false;

	if let Some(model) = &args.model {
		config.model = model.clone();
		println!("Set model to {}", model);
		modified = true;
	}

	if let Some(level) = &args.log_level {
		let level: LogLevel = level.parse()?;
		println!("Set log level to {}", level.as_str());
		config.log_level = level;
		modified = true;
	}

	if let Some(timeout) = args.timeout {
		config.request_timeout_seconds = timeout;
		println!("Set request timeout to {}s", timeout);
		modified = true;
	}

	if modified {
		config.save()?;
		if let Some(path) = config.config_path() {
			println!("Configuration saved to {}", path.display());
		}
	} else {
		let path = Config::create_default_config()?;
		println!("Configuration file: {}", path.display());
		println!("Use --show to print the current values.");
	}

	Ok(())
}

fn show_configuration(config: &Config) {
	println!("{}", "───────────── Configuration ─────────────".bright_cyan());
	if let Some(path) = config.config_path() {
		println!("{} {}", "File:".yellow(), path.display());
	}
	println!("{} {}", "Model:".yellow(), config.model);
	println!("{} {}", "API base URL:".yellow(), config.api_base_url);
	println!("{} {}", "Log level:".yellow(), config.log_level.as_str());
	println!(
		"{} {}s",
		"Request timeout:".yellow(),
		config.request_timeout_seconds
	);
	println!(
		"{} {}",
		"Markdown rendering:".yellow(),
		config.enable_markdown_rendering
	);
	println!("{} {}", "Search URL:".yellow(), config.search_url);
	println!(
		"{} {}",
		"Voice command:".yellow(),
		config.voice_command.as_deref().unwrap_or("(not set)")
	);

	let key = config
		.providers
		.google
		.api_key
		.as_deref()
		.map(mask_secret)
		.unwrap_or_else(|| "(not set)".to_string());
	println!("{} {}", "Google API key:".yellow(), key);
}
