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

// Google generative-language (Gemini API) provider implementation

use super::{AiProvider, ProviderResponse, TokenUsage};
use crate::config::{Config, GOOGLE_API_KEY_ENVS};
use crate::log_debug;
use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;

/// Google generative-language provider, authenticated with an API key
pub struct GoogleAiProvider {
	client: Client,
	base_url: String,
	api_key: Option<String>,
}

impl GoogleAiProvider {
	pub fn new(config: &Config) -> Result<Self> {
		let client = Client::builder()
			.timeout(config.request_timeout())
			.build()
			.map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

		Ok(Self {
			client,
			base_url: config.api_base_url.trim_end_matches('/').to_string(),
			api_key: config
				.providers
				.google
				.api_key
				.clone()
				.filter(|key| !key.trim().is_empty()),
		})
	}
}

#[async_trait::async_trait]
impl AiProvider for GoogleAiProvider {
	fn name(&self) -> &str {
		"google"
	}

	fn supports_model(&self, model: &str) -> bool {
		model.starts_with("gemini") || model.starts_with("tunedModels/")
	}

	fn get_api_key(&self) -> Result<String> {
		self.api_key.clone().ok_or_else(|| {
			anyhow::anyhow!(
				"Google API key is not set. Set the {} environment variable or providers.google.api_key in the config file",
				GOOGLE_API_KEY_ENVS.join(" or ")
			)
		})
	}

	async fn generate_content(&self, prompt: &str, model: &str) -> Result<ProviderResponse> {
		let api_key = self.get_api_key()?;
		let api_url = build_endpoint(&self.base_url, model);
		let request_body = build_request_body(prompt);

		// The key travels as a query parameter; never log the full URL
		log_debug!("POST {} ({} chars)", api_url, prompt.chars().count());

		let started = Instant::now();
		let response = self
			.client
			.post(&api_url)
			.query(&[("key", api_key.as_str())])
			.header("Content-Type", "application/json")
			.json(&request_body)
			.send()
			.await
			.map_err(|e| anyhow::anyhow!("Request to Google API failed: {}", e.without_url()))?;

		let status = response.status();
		let response_text = response
			.text()
			.await
			.map_err(|e| anyhow::anyhow!("Failed to read Google API response: {}", e.without_url()))?;
		let request_time_ms = started.elapsed().as_millis() as u64;

		if !status.is_success() {
			return Err(anyhow::anyhow!(
				"Google API error: {}",
				describe_error(status.as_u16(), &response_text)
			));
		}

		let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
			anyhow::anyhow!(
				"Failed to parse response JSON: {}. Response: {}",
				e,
				response_text
			)
		})?;

		if let Some(reason) = response_json
			.pointer("/candidates/0/finishReason")
			.and_then(|r| r.as_str())
		{
			log_debug!("Finish reason: {}", reason);
		}

		Ok(ProviderResponse {
			content: extract_text(&response_json),
			usage: extract_usage(&response_json),
			request_time_ms,
		})
	}
}

/// Build the generateContent URL for a model (without credentials)
pub fn build_endpoint(base_url: &str, model: &str) -> String {
	let base_url = base_url.trim_end_matches('/');
	if model.contains('/') {
		format!("{}/{}:generateContent", base_url, model)
	} else {
		format!("{}/models/{}:generateContent", base_url, model)
	}
}

/// The prompt is sent as the single text part of a single content block
pub fn build_request_body(prompt: &str) -> Value {
	serde_json::json!({
		"contents": [
			{
				"parts": [
					{ "text": prompt }
				]
			}
		]
	})
}

/// Extract `candidates[0].content.parts[0].text`; empty text counts as missing
pub fn extract_text(response: &Value) -> Option<String> {
	response
		.pointer("/candidates/0/content/parts/0/text")
		.and_then(|t| t.as_str())
		.filter(|t| !t.is_empty())
		.map(str::to_string)
}

pub fn extract_usage(response: &Value) -> Option<TokenUsage> {
	let usage_obj = response.get("usageMetadata")?;
	let prompt_tokens = usage_obj
		.get("promptTokenCount")
		.and_then(|v| v.as_u64())
		.unwrap_or(0);
	let output_tokens = usage_obj
		.get("candidatesTokenCount")
		.and_then(|v| v.as_u64())
		.unwrap_or(0);
	let total_tokens = usage_obj
		.get("totalTokenCount")
		.and_then(|v| v.as_u64())
		.unwrap_or(prompt_tokens + output_tokens);

	Some(TokenUsage {
		prompt_tokens,
		output_tokens,
		total_tokens,
	})
}

fn describe_error(status: u16, body: &str) -> String {
	let mut error_details = vec![format!("HTTP {}", status)];

	if let Ok(json) = serde_json::from_str::<Value>(body) {
		if let Some(error_obj) = json.get("error") {
			if let Some(msg) = error_obj.get("message").and_then(|m| m.as_str()) {
				error_details.push(format!("Message: {}", msg));
			}
			if let Some(code) = error_obj.get("status").and_then(|c| c.as_str()) {
				error_details.push(format!("Status: {}", code));
			}
		}
	}

	if error_details.len() == 1 && !body.is_empty() {
		error_details.push(format!("Raw response: {}", body));
	}

	error_details.join(" | ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};
	use tokio::net::TcpListener;

	// Answers exactly one HTTP request with the given status and body,
	// and hands back the raw request it received.
	async fn serve_once(
		status_line: &'static str,
		body: &'static str,
	) -> (String, tokio::task::JoinHandle<String>) {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();

		let handle = tokio::spawn(async move {
			let (mut socket, _) = listener.accept().await.unwrap();
			let mut raw = Vec::new();
			let mut buf = [0u8; 4096];

			loop {
				let n = socket.read(&mut buf).await.unwrap();
				if n == 0 {
					break;
				}
				raw.extend_from_slice(&buf[..n]);

				let text = String::from_utf8_lossy(&raw).to_string();
				if let Some(header_end) = text.find("\r\n\r\n") {
					let content_length = text[..header_end]
						.lines()
						.find_map(|line| {
							let (name, value) = line.split_once(':')?;
							if name.eq_ignore_ascii_case("content-length") {
								value.trim().parse::<usize>().ok()
							} else {
								None
							}
						})
						.unwrap_or(0);
					if raw.len() >= header_end + 4 + content_length {
						break;
					}
				}
			}

			let response = format!(
				"HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
				status_line,
				body.len(),
				body
			);
			socket.write_all(response.as_bytes()).await.unwrap();
			socket.shutdown().await.unwrap();

			String::from_utf8_lossy(&raw).to_string()
		});

		(format!("http://{}/v1beta", addr), handle)
	}

	fn provider_for(base_url: &str) -> GoogleAiProvider {
		let mut config = Config::default();
		config.api_base_url = base_url.to_string();
		config.request_timeout_seconds = 5;
		config.providers.google.api_key = Some("test-key-123".to_string());
		GoogleAiProvider::new(&config).unwrap()
	}

	#[test]
	fn test_build_endpoint() {
		assert_eq!(
			build_endpoint("https://example.com/v1beta/", "gemini-1.5-flash"),
			"https://example.com/v1beta/models/gemini-1.5-flash:generateContent"
		);
		assert_eq!(
			build_endpoint("https://example.com/v1beta", "tunedModels/my-model"),
			"https://example.com/v1beta/tunedModels/my-model:generateContent"
		);
	}

	#[test]
	fn test_build_request_body() {
		let body = build_request_body("What is Rust?");
		assert_eq!(
			body,
			serde_json::json!({ "contents": [ { "parts": [ { "text": "What is Rust?" } ] } ] })
		);
	}

	#[test]
	fn test_extract_text() {
		let response = serde_json::json!({
			"candidates": [
				{ "content": { "parts": [ { "text": "first" }, { "text": "second" } ] } },
				{ "content": { "parts": [ { "text": "other candidate" } ] } }
			]
		});
		assert_eq!(extract_text(&response), Some("first".to_string()));
	}

	#[test]
	fn test_extract_text_missing_path() {
		assert_eq!(extract_text(&serde_json::json!({})), None);
		assert_eq!(extract_text(&serde_json::json!({ "candidates": [] })), None);
		assert_eq!(
			extract_text(&serde_json::json!({ "candidates": [ { "finishReason": "SAFETY" } ] })),
			None
		);
		assert_eq!(
			extract_text(&serde_json::json!({ "candidates": [ { "content": { "parts": [ { "text": "" } ] } } ] })),
			None
		);
	}

	#[test]
	fn test_extract_usage() {
		let response = serde_json::json!({
			"usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 6 }
		});
		let usage = extract_usage(&response).unwrap();
		assert_eq!(usage.prompt_tokens, 4);
		assert_eq!(usage.output_tokens, 6);
		assert_eq!(usage.total_tokens, 10);
		assert!(extract_usage(&serde_json::json!({})).is_none());
	}

	#[test]
	fn test_describe_error() {
		let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
		assert_eq!(
			describe_error(400, body),
			"HTTP 400 | Message: API key not valid | Status: INVALID_ARGUMENT"
		);
		assert_eq!(describe_error(502, "bad gateway"), "HTTP 502 | Raw response: bad gateway");
	}

	#[test]
	fn test_missing_api_key() {
		let mut config = Config::default();
		config.providers.google.api_key = Some("   ".to_string());
		let provider = GoogleAiProvider::new(&config).unwrap();
		let err = provider.get_api_key().unwrap_err();
		assert!(err.to_string().contains("GEMINI_API_KEY"));
	}

	#[tokio::test]
	async fn test_generate_content_success() {
		let (base_url, server) = serve_once(
			"200 OK",
			r#"{"candidates":[{"content":{"parts":[{"text":"Hello from Gemini"}]}}],"usageMetadata":{"promptTokenCount":2,"candidatesTokenCount":3,"totalTokenCount":5}}"#,
		)
		.await;

		let provider = provider_for(&base_url);
		let response = provider
			.generate_content("Say hello", "gemini-1.5-flash")
			.await
			.unwrap();

		assert_eq!(response.content.as_deref(), Some("Hello from Gemini"));
		assert_eq!(response.usage.map(|u| u.total_tokens), Some(5));

		let request = server.await.unwrap();
		assert!(request.starts_with("POST /v1beta/models/gemini-1.5-flash:generateContent?key=test-key-123 "));
		assert!(request.contains(r#"{"contents":[{"parts":[{"text":"Say hello"}]}]}"#));
	}

	#[tokio::test]
	async fn test_generate_content_without_candidates() {
		let (base_url, server) = serve_once("200 OK", r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).await;

		let provider = provider_for(&base_url);
		let response = provider.generate_content("q", "gemini-1.5-flash").await.unwrap();
		assert!(response.content.is_none());
		server.await.unwrap();
	}

	#[tokio::test]
	async fn test_generate_content_error_status() {
		let (base_url, server) = serve_once(
			"403 Forbidden",
			r#"{"error":{"code":403,"message":"Permission denied","status":"PERMISSION_DENIED"}}"#,
		)
		.await;

		let provider = provider_for(&base_url);
		let err = provider
			.generate_content("q", "gemini-1.5-flash")
			.await
			.unwrap_err();
		assert!(err.to_string().contains("HTTP 403"));
		assert!(err.to_string().contains("Permission denied"));
		server.await.unwrap();
	}

	#[tokio::test]
	async fn test_generate_content_malformed_json() {
		let (base_url, server) = serve_once("200 OK", "not json").await;

		let provider = provider_for(&base_url);
		let err = provider
			.generate_content("q", "gemini-1.5-flash")
			.await
			.unwrap_err();
		assert!(err.to_string().contains("Failed to parse response JSON"));
		server.await.unwrap();
	}

	#[tokio::test]
	async fn test_transport_error_does_not_leak_key() {
		// Bind and drop a listener to get a port nobody is listening on
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let provider = provider_for(&format!("http://{}/v1beta", addr));
		let err = provider
			.generate_content("q", "gemini-1.5-flash")
			.await
			.unwrap_err();
		assert!(!err.to_string().contains("test-key-123"));
	}
}
