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

// Provider configurations - ONLY contain API keys and provider-specific settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
	#[serde(default)]
	pub google: ProviderConfig,
}

/// Environment variables checked for the Google API key, in order of precedence
pub const GOOGLE_API_KEY_ENVS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Mask a secret for display, keeping only the last four characters
pub fn mask_secret(secret: &str) -> String {
	let chars: Vec<char> = secret.chars().collect();
	if chars.len() <= 4 {
		return "*".repeat(chars.len());
	}
	let visible: String = chars[chars.len() - 4..].iter().collect();
	format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mask_secret() {
		assert_eq!(mask_secret("abcd"), "****");
		assert_eq!(mask_secret("AIzaSecretKey1234"), "*************1234");
		assert_eq!(mask_secret(""), "");
	}
}
