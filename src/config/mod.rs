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

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::PathBuf;

pub mod loading;
pub mod providers;
pub mod validation;

pub use providers::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub enum LogLevel {
	#[serde(rename = "none")]
	#[default]
	None,
	#[serde(rename = "info")]
	Info,
	#[serde(rename = "debug")]
	Debug,
}

impl LogLevel {
	/// Check if info logging is enabled
	pub fn is_info_enabled(&self) -> bool {
		matches!(self, LogLevel::Info | LogLevel::Debug)
	}

	/// Check if debug logging is enabled
	pub fn is_debug_enabled(&self) -> bool {
		matches!(self, LogLevel::Debug)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::None => "none",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
		}
	}
}

impl std::str::FromStr for LogLevel {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"none" => Ok(LogLevel::None),
			"info" => Ok(LogLevel::Info),
			"debug" => Ok(LogLevel::Debug),
			other => Err(anyhow::anyhow!(
				"Invalid log level '{}'. Use: none, info, or debug",
				other
			)),
		}
	}
}

// Default functions
pub(crate) fn default_model() -> String {
	"google:gemini-1.5-flash".to_string()
}

pub(crate) fn default_api_base_url() -> String {
	"https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub(crate) fn default_request_timeout_seconds() -> u64 {
	60 // Upper bound for a single generateContent round-trip
}

fn default_markdown_rendering() -> bool {
	true
}

pub(crate) fn default_search_url() -> String {
	"https://www.google.com/search".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
	#[serde(default)]
	pub log_level: LogLevel,

	// Model in provider:model format
	#[serde(default = "default_model")]
	pub model: String,

	#[serde(default = "default_api_base_url")]
	pub api_base_url: String,

	#[serde(default = "default_request_timeout_seconds")]
	pub request_timeout_seconds: u64,

	#[serde(default = "default_markdown_rendering")]
	pub enable_markdown_rendering: bool,

	#[serde(default = "default_search_url")]
	pub search_url: String,

	// External speech-to-text command; prints one utterance transcript on stdout
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub voice_command: Option<String>,

	#[serde(default)]
	pub providers: ProvidersConfig,

	#[serde(skip)]
	config_path: Option<PathBuf>,

	#[serde(skip)]
	env_api_key: Option<EnvApiKey>,
}

/// API key taken from the environment, and the file key it shadows
#[derive(Debug, Clone)]
struct EnvApiKey {
	key: String,
	file_key: Option<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			log_level: LogLevel::default(),
			model: default_model(),
			api_base_url: default_api_base_url(),
			request_timeout_seconds: default_request_timeout_seconds(),
			enable_markdown_rendering: default_markdown_rendering(),
			search_url: default_search_url(),
			voice_command: None,
			providers: ProvidersConfig::default(),
			config_path: None,
			env_api_key: None,
		}
	}
}

impl Config {
	/// Get the global log level
	pub fn get_log_level(&self) -> LogLevel {
		self.log_level.clone()
	}

	/// Path this config was loaded from (or will be saved to)
	pub fn config_path(&self) -> Option<&PathBuf> {
		self.config_path.as_ref()
	}

	pub fn request_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.request_timeout_seconds)
	}
}

// Logging macros for different log levels
// These macros automatically check the current log level and only print if appropriate

thread_local! {
	static CURRENT_CONFIG: RefCell<Option<Config>> = const { RefCell::new(None) };
}

/// Set the current config for the thread (to be used by logging macros)
pub fn set_thread_config(config: &Config) {
	CURRENT_CONFIG.with(|c| {
		*c.borrow_mut() = Some(config.clone());
	});
}

/// Get the current config for the thread
pub fn with_thread_config<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Config) -> R,
{
	CURRENT_CONFIG.with(|c| (*c.borrow()).as_ref().map(f))
}

/// Info logging macro with automatic cyan coloring
/// Shows info messages when log level is Info OR Debug
#[macro_export]
macro_rules! log_info {
	($fmt:expr) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", $fmt.cyan());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_info_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).cyan());
			}
		}
	};
}

/// Debug logging macro with automatic bright blue coloring
#[macro_export]
macro_rules! log_debug {
	($fmt:expr) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", $fmt.bright_blue());
			}
		}
	};
	($fmt:expr, $($arg:expr),*) => {
		if let Some(should_log) = $crate::config::with_thread_config(|config| config.get_log_level().is_debug_enabled()) {
			if should_log {
				use colored::Colorize;
				println!("{}", format!($fmt, $($arg),*).bright_blue());
			}
		}
	};
}

/// Error logging macro with automatic bright red coloring
/// Always visible regardless of log level (errors should always be shown)
#[macro_export]
macro_rules! log_error {
	($fmt:expr) => {{
		use colored::Colorize;
		eprintln!("{}", $fmt.bright_red());
	}};
	($fmt:expr, $($arg:expr),*) => {{
		use colored::Colorize;
		eprintln!("{}", format!($fmt, $($arg),*).bright_red());
	}};
}
