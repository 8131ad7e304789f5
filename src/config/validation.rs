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

use anyhow::{anyhow, Result};

use super::Config;

impl Config {
	/// Validate the configuration for common issues
	pub fn validate(&self) -> Result<()> {
		self.validate_model()?;
		self.validate_timeout()?;
		self.validate_urls()?;
		Ok(())
	}

	pub fn validate_model(&self) -> Result<()> {
		let model = &self.model;

		// Check if model has the required provider:model format
		if !model.contains(':') {
			return Err(anyhow!(
				"Invalid model format: '{}'. Must use 'provider:model' format (e.g., 'google:gemini-1.5-flash')",
				model
			));
		}

		let (provider_name, model_name) = crate::session::ProviderFactory::parse_model(model)?;
		let provider = crate::session::ProviderFactory::create_provider(&provider_name, self)
			.map_err(|_| {
				anyhow!(
					"Unsupported provider: '{}'. Supported providers: google",
					provider_name
				)
			})?;

		if !provider.supports_model(&model_name) {
			return Err(anyhow!(
				"Provider '{}' does not support model '{}'. Check the provider documentation for supported models.",
				provider_name,
				model_name
			));
		}

		Ok(())
	}

	pub fn validate_timeout(&self) -> Result<()> {
		if self.request_timeout_seconds == 0 {
			return Err(anyhow!(
				"Request timeout cannot be 0. Use a positive number of seconds."
			));
		}

		if self.request_timeout_seconds > 3600 {
			return Err(anyhow!(
				"Request timeout too high: {}. Maximum allowed: 3600 seconds",
				self.request_timeout_seconds
			));
		}

		Ok(())
	}

	pub fn validate_urls(&self) -> Result<()> {
		for (field, value) in [
			("api_base_url", &self.api_base_url),
			("search_url", &self.search_url),
		] {
			let parsed = url::Url::parse(value)
				.map_err(|e| anyhow!("Invalid {} '{}': {}", field, value, e))?;
			if parsed.scheme() != "http" && parsed.scheme() != "https" {
				return Err(anyhow!(
					"Invalid {} '{}': only http:// and https:// are allowed",
					field,
					value
				));
			}
		}
		Ok(())
	}
}
