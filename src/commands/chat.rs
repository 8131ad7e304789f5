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

use clap::Args;
use octochat::config::Config;

#[derive(Args, Debug, Default)]
pub struct ChatArgs {
	/// Use a specific model instead of the one configured in config (provider:model)
	#[arg(long)]
	pub model: Option<String>,

	/// Print responses as plain text
	#[arg(long)]
	pub no_markdown: bool,
}

impl ChatArgs {
	/// Apply the runtime-only overrides; nothing is saved
	pub fn apply(&self, config: &mut Config) {
		if let Some(model) = &self.model {
			config.model = model.clone();
		}
		if self.no_markdown {
			config.enable_markdown_rendering = false;
		}
	}
}

// The session itself lives in octochat::session::chat; main.rs runs it via
// octochat::session::chat::run_interactive_session(&config)
