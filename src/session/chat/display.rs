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

// Transcript and session display

use super::markdown::{is_markdown_content, MarkdownRenderer};
use crate::session::providers::TokenUsage;
use crate::session::{ConversationEntry, EntryOutcome, Transcript};
use colored::*;

/// Print one query/response pair. `renderer` is `None` when markdown rendering is off.
pub fn print_entry(entry: &ConversationEntry, renderer: Option<&MarkdownRenderer>) {
	println!("{} {}", "You:".bright_cyan().bold(), entry.query());

	match entry.outcome() {
		EntryOutcome::Generated => {
			println!("{}", "AI:".bright_green().bold());
			print_response(entry.response(), renderer);
		}
		EntryOutcome::NoResponse => {
			println!("{} {}", "AI:".bright_green().bold(), entry.response().yellow());
		}
		EntryOutcome::Failed => {
			println!("{} {}", "AI:".bright_green().bold(), entry.response().bright_red());
		}
	}
	println!();
}

fn print_response(content: &str, renderer: Option<&MarkdownRenderer>) {
	match renderer {
		Some(renderer) if is_markdown_content(content) => renderer.render_and_print(content),
		_ => println!("{}", content),
	}
}

pub fn print_transcript(transcript: &Transcript, renderer: Option<&MarkdownRenderer>) {
	if transcript.is_empty() {
		println!("{}", "No messages yet.".bright_yellow());
		return;
	}

	println!(
		"{}",
		"───────────── Conversation ─────────────".bright_cyan()
	);
	for entry in transcript.iter() {
		print_entry(entry, renderer);
	}
}

/// Counts shown by `/info`
pub struct SessionInfo<'a> {
	pub provider: &'a str,
	pub model: &'a str,
	pub transcript: &'a Transcript,
	pub usage: TokenUsage,
	pub pending_file: Option<(&'a str, usize)>,
}

pub fn display_session_info(info: &SessionInfo<'_>) {
	println!(
		"{}",
		"───────────── Session Information ─────────────".bright_cyan()
	);

	println!(
		"{} {}:{}",
		"Model:".yellow(),
		info.provider.bright_white(),
		info.model.bright_white()
	);

	let failed = info
		.transcript
		.iter()
		.filter(|e| e.outcome() == EntryOutcome::Failed)
		.count();
	println!(
		"{} {} ({} failed)",
		"Entries:".yellow(),
		info.transcript.len().to_string().bright_white(),
		failed
	);

	println!(
		"{} {}",
		"Total tokens:".yellow(),
		info.usage.total_tokens.to_string().bright_white()
	);
	println!(
		"{} {} input, {} output",
		"Breakdown:".yellow(),
		info.usage.prompt_tokens.to_string().bright_blue(),
		info.usage.output_tokens.to_string().bright_green()
	);

	if let Some((name, queries)) = info.pending_file {
		println!(
			"{} {} ({} queries)",
			"Loaded file:".yellow(),
			name.bright_white(),
			queries
		);
	}

	println!();
}
