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

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{default_request_timeout_seconds, Config, EnvApiKey, GOOGLE_API_KEY_ENVS};

impl Config {
	/// Load configuration from the system-wide config file
	pub fn load() -> Result<Self> {
		let config_path = crate::directories::get_config_file_path()?;

		let mut config = if config_path.exists() {
			Self::read_from_path(&config_path)?
		} else {
			Config::default()
		};
		config.config_path = Some(config_path);

		// Environment variables take precedence over config file values
		config.apply_env_overrides();

		if let Err(e) = config.validate() {
			eprintln!("Configuration validation warning: {}", e);
			eprintln!("The application will continue, but you may want to fix these issues.");
			config.fall_back_to_safe_runtime_values();
		}

		Ok(config)
	}

	/// Load configuration from a specific file path
	pub fn load_from_path(path: &Path) -> Result<Self> {
		let mut config = Self::read_from_path(path)?;
		config.config_path = Some(path.to_path_buf());
		config.apply_env_overrides();
		config.validate()?;
		Ok(config)
	}

	fn read_from_path(path: &Path) -> Result<Self> {
		let config_str = fs::read_to_string(path)
			.context(format!("Failed to read config from {}", path.display()))?;
		let config: Config =
			toml::from_str(&config_str).context("Failed to parse TOML configuration")?;
		Ok(config)
	}

	fn apply_env_overrides(&mut self) {
		self.apply_api_key_override(api_key_from_env());
	}

	fn apply_api_key_override(&mut self, env_key: Option<String>) {
		let Some(key) = env_key else {
			return;
		};

		// Keep the key the file had before the first override
		let file_key = match self.env_api_key.take() {
			Some(previous) => previous.file_key,
			None => self.providers.google.api_key.clone(),
		};
		self.providers.google.api_key = Some(key.clone());
		self.env_api_key = Some(EnvApiKey { key, file_key });
	}

	/// Replace values that would break every request with their defaults
	fn fall_back_to_safe_runtime_values(&mut self) {
		if let Err(e) = self.validate_timeout() {
			eprintln!(
				"{}. Using the default of {} seconds.",
				e,
				default_request_timeout_seconds()
			);
			self.request_timeout_seconds = default_request_timeout_seconds();
		}
	}

	/// Save configuration to file
	pub fn save(&self) -> Result<()> {
		let config_path = if let Some(path) = &self.config_path {
			path.clone()
		} else {
			crate::directories::get_config_file_path()?
		};
		self.save_to_path(&config_path)
	}

	/// Save configuration to a specific file path
	pub fn save_to_path(&self, path: &Path) -> Result<()> {
		// Validate before saving
		self.validate()?;

		// Ensure the parent directory exists
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context(format!(
				"Failed to create config directory: {}",
				parent.display()
			))?;
		}

		// Keys that came from the environment are never written back
		let clean_config = self.create_clean_copy_for_saving();
		let config_str = toml::to_string_pretty(&clean_config)
			.context("Failed to serialize configuration to TOML")?;

		fs::write(path, config_str)
			.context(format!("Failed to write config to {}", path.display()))?;

		Ok(())
	}

	/// Create a clean copy of the config for saving (removes runtime-only values)
	pub fn create_clean_copy_for_saving(&self) -> Self {
		let mut clean_config = self.clone();
		// An environment key is never written; the file keeps its own key
		if let Some(env) = &self.env_api_key {
			if self.providers.google.api_key.as_deref() == Some(env.key.as_str()) {
				clean_config.providers.google.api_key = env.file_key.clone();
			}
		}
		clean_config
	}

	pub fn create_default_config() -> Result<std::path::PathBuf> {
		let config_path = crate::directories::get_config_file_path()?;

		if !config_path.exists() {
			let config = Config::default();
			config.save_to_path(&config_path)?;
			println!("Created default configuration at {}", config_path.display());
		}

		Ok(config_path)
	}
}

fn api_key_from_env() -> Option<String> {
	GOOGLE_API_KEY_ENVS
		.iter()
		.filter_map(|name| std::env::var(name).ok())
		.find(|value| !value.trim().is_empty())
}
