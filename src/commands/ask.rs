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
use clap::Args;
use octochat::config::Config;
use octochat::log_info;
use octochat::session::chat::display::print_entry;
use octochat::session::chat::markdown::MarkdownRenderer;
use octochat::session::file_input::read_query_file;
use octochat::session::{ChatController, ConversationEntry, NoopObserver, SubmitOutcome};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AskArgs {
	/// Question to ask; read from stdin when omitted and stdin is piped
	#[arg(value_name = "QUERY")]
	pub input: Option<String>,

	/// Send every non-empty line of this file as its own query (takes priority over QUERY)
	#[arg(short = 'f', long = "file", value_name = "PATH")]
	pub file: Option<PathBuf>,

	/// Use a specific model instead of the default (runtime only, not saved)
	#[arg(long)]
	pub model: Option<String>,

	/// Print the transcript as a JSON array of entries
	#[arg(long)]
	pub json: bool,

	/// Output raw text without markdown rendering
	#[arg(long)]
	pub raw: bool,
}

fn read_piped_stdin() -> Result<Option<String>> {
	if io::stdin().is_terminal() {
		return Ok(None);
	}

	let mut buffer = String::new();
	io::stdin().read_to_string(&mut buffer)?;
	Ok(Some(buffer))
}

pub async fn execute(args: &AskArgs, mut config: Config) -> Result<()> {
	if let Some(model) = &args.model {
		config.model = model.clone();
	}

	let controller = ChatController::from_config(&config)?;

	if let Some(path) = &args.file {
		controller.load_file(read_query_file(path).await?);
	}

	let typed = match &args.input {
		Some(input) => Some(input.clone()),
		None if args.file.is_none() => read_piped_stdin()?,
		None => None,
	};
	if let Some(typed) = typed {
		if args.file.is_some() {
			log_info!("--file is set, so the query argument is ignored");
		}
		controller.set_typed(typed);
	}

	let outcome = if args.json {
		controller.submit(&mut NoopObserver).await
	} else {
		let renderer = if config.enable_markdown_rendering && !args.raw {
			Some(MarkdownRenderer::new()?)
		} else {
			None
		};
		let mut observer = |_: usize, entry: &ConversationEntry| {
			print_entry(entry, renderer.as_ref());
		};
		controller.submit(&mut observer).await
	};

	match outcome {
		SubmitOutcome::Completed(summary) => {
			if args.json {
				println!(
					"{}",
					serde_json::to_string_pretty(&controller.transcript())?
				);
			}
			log_info!(
				"{} answered, {} without response, {} failed ({} tokens)",
				summary.generated,
				summary.no_response,
				summary.failed,
				summary.usage.total_tokens
			);
			Ok(())
		}
		SubmitOutcome::Nothing => Err(anyhow!(
			"No input provided. Pass a query, use --file, or pipe text on stdin."
		)),
		SubmitOutcome::Busy => Err(anyhow!("Another submission is already running")),
	}
}
