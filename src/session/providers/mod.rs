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

// Provider abstraction layer for generative text APIs

use crate::config::Config;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod google;

pub use google::GoogleAiProvider;

/// Token usage reported by the provider for a single request
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
	pub prompt_tokens: u64,
	pub output_tokens: u64,
	pub total_tokens: u64,
}

impl TokenUsage {
	pub fn add(&mut self, other: &TokenUsage) {
		self.prompt_tokens += other.prompt_tokens;
		self.output_tokens += other.output_tokens;
		self.total_tokens += other.total_tokens;
	}
}

/// Successful provider round-trip
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
	/// Generated text, `None` when the response carried no usable candidate
	pub content: Option<String>,
	pub usage: Option<TokenUsage>,
	pub request_time_ms: u64,
}

/// Trait that all AI providers must implement
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
	/// Get the provider name (e.g., "google")
	fn name(&self) -> &str;

	/// Check if the provider supports the given model
	fn supports_model(&self, model: &str) -> bool;

	/// API key this provider will send, or an error explaining how to set one
	fn get_api_key(&self) -> Result<String>;

	/// Send one prompt and return the generated content.
	///
	/// Transport errors, non-success statuses and unparseable bodies are
	/// returned as `Err`; a well-formed body without text is `Ok` with
	/// `content: None`.
	async fn generate_content(&self, prompt: &str, model: &str) -> Result<ProviderResponse>;
}

/// Provider factory to create the appropriate provider based on model string
pub struct ProviderFactory;

impl ProviderFactory {
	/// Parse a model string in format "provider:model" and return (provider_name, model_name)
	pub fn parse_model(model: &str) -> Result<(String, String)> {
		if let Some(pos) = model.find(':') {
			let provider = model[..pos].to_string();
			let model_name = model[pos + 1..].to_string();

			if provider.is_empty() || model_name.is_empty() {
				return Err(anyhow::anyhow!(
					"Invalid model format. Use 'provider:model' (e.g., 'google:gemini-1.5-flash')"
				));
			}

			Ok((provider, model_name))
		} else {
			Err(anyhow::anyhow!(
				"Invalid model format '{}'. Must specify provider like 'google:gemini-1.5-flash'",
				model
			))
		}
	}

	/// Create a provider instance based on the provider name
	pub fn create_provider(provider_name: &str, config: &Config) -> Result<Box<dyn AiProvider>> {
		match provider_name.to_lowercase().as_str() {
			"google" => Ok(Box::new(GoogleAiProvider::new(config)?)),
			_ => Err(anyhow::anyhow!(
				"Unsupported provider: {}. Supported providers: google",
				provider_name
			)),
		}
	}

	/// Get the appropriate provider for a given model string
	pub fn get_provider_for_model(
		model: &str,
		config: &Config,
	) -> Result<(Box<dyn AiProvider>, String)> {
		let (provider_name, model_name) = Self::parse_model(model)?;
		let provider = Self::create_provider(&provider_name, config)?;

		// Verify the provider supports this model
		if !provider.supports_model(&model_name) {
			return Err(anyhow::anyhow!(
				"Provider '{}' does not support model '{}'",
				provider_name,
				model_name
			));
		}

		Ok((provider, model_name))
	}
}
