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

// Speech input through an external recognizer command

use crate::config::Config;
use crate::log_debug;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokio::process::Command;

pub const VOICE_UNSUPPORTED_NOTICE: &str = "Speech recognition is not supported on this platform.";

/// Captures one utterance and returns its transcript
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
	fn is_available(&self) -> bool;

	async fn listen(&self) -> Result<String>;
}

/// Recognizer used when nothing is configured
pub struct UnsupportedRecognizer;

#[async_trait::async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
	fn is_available(&self) -> bool {
		false
	}

	async fn listen(&self) -> Result<String> {
		Err(anyhow!(VOICE_UNSUPPORTED_NOTICE))
	}
}

/// Runs a shell command that records one utterance and prints the transcript to stdout
pub struct CommandRecognizer {
	command: String,
}

impl CommandRecognizer {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
		}
	}

	pub fn command(&self) -> &str {
		&self.command
	}

	fn program(&self) -> Option<&str> {
		self.command.split_whitespace().next()
	}
}

#[async_trait::async_trait]
impl SpeechRecognizer for CommandRecognizer {
	fn is_available(&self) -> bool {
		self.program().is_some_and(program_exists)
	}

	async fn listen(&self) -> Result<String> {
		log_debug!("Running speech command: {}", self.command);

		#[cfg(target_os = "windows")]
		let output = Command::new("cmd")
			.args(["/C", &self.command])
			.output()
			.await;

		#[cfg(not(target_os = "windows"))]
		let output = Command::new("sh").args(["-c", &self.command]).output().await;

		let output = output.context("Failed to start speech recognition command")?;

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr);
			return Err(anyhow!(
				"Speech recognition command failed ({}): {}",
				output.status,
				stderr.trim()
			));
		}

		let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
		if transcript.is_empty() {
			return Err(anyhow!("No speech was recognized"));
		}

		Ok(transcript)
	}
}

pub fn recognizer_from_config(config: &Config) -> Box<dyn SpeechRecognizer> {
	match config.voice_command.as_deref().map(str::trim) {
		Some(command) if !command.is_empty() => Box::new(CommandRecognizer::new(command)),
		_ => Box::new(UnsupportedRecognizer),
	}
}

fn program_exists(program: &str) -> bool {
	let path = Path::new(program);
	if path.components().count() > 1 {
		return path.is_file();
	}

	let Some(paths) = std::env::var_os("PATH") else {
		return false;
	};

	std::env::split_paths(&paths).any(|dir| {
		let candidate = dir.join(program);
		if candidate.is_file() {
			return true;
		}
		cfg!(target_os = "windows") && dir.join(format!("{}.exe", program)).is_file()
	})
}
