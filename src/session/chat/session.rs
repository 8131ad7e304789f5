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

// Interactive chat session

use super::animation::{LoadingAnimation, SpinnerHandle};
use super::commands::{handle_loglevel, parse_command, print_help, ChatCommand};
use super::display::{display_session_info, print_entry, print_transcript, SessionInfo};
use super::input::{InputEvent, InputReader};
use super::markdown::MarkdownRenderer;
use crate::config::Config;
use crate::session::controller::{ChatController, SubmitOutcome};
use crate::session::file_input::read_query_file;
use crate::session::providers::TokenUsage;
use crate::session::runner::RunObserver;
use crate::session::search::{build_search_url, open_in_browser};
use crate::session::voice::{recognizer_from_config, SpeechRecognizer, VOICE_UNSUPPORTED_NOTICE};
use crate::session::ConversationEntry;
use crate::{log_debug, log_info};
use anyhow::Result;
use colored::*;
use std::path::Path;

pub struct ChatSession {
	config: Config,
	controller: ChatController,
	renderer: Option<MarkdownRenderer>,
	recognizer: Box<dyn SpeechRecognizer>,
	usage: TokenUsage,
	// Voice transcript waiting to be placed into the next prompt
	voice_draft: Option<String>,
}

/// Prints each entry as soon as it arrives, pausing the loading indicator around it
struct ReplObserver<'a> {
	spinner: SpinnerHandle,
	renderer: Option<&'a MarkdownRenderer>,
}

impl RunObserver for ReplObserver<'_> {
	fn on_query_start(&mut self, index: usize, total: usize, query: &str) {
		log_debug!("Query {}/{}: {} chars", index + 1, total, query.len());
		self.spinner.set_progress(index + 1, total);
	}

	fn on_entry(&mut self, _index: usize, entry: &ConversationEntry) {
		let renderer = self.renderer;
		self.spinner.suspend(|| print_entry(entry, renderer));
	}
}

impl ChatSession {
	pub fn new(config: Config) -> Result<Self> {
		let controller = ChatController::from_config(&config)?;
		Self::with_controller(config, controller)
	}

	pub fn with_controller(config: Config, controller: ChatController) -> Result<Self> {
		let renderer = if config.enable_markdown_rendering {
			Some(MarkdownRenderer::new()?)
		} else {
			None
		};
		let recognizer = recognizer_from_config(&config);

		Ok(Self {
			config,
			controller,
			renderer,
			recognizer,
			usage: TokenUsage::default(),
			voice_draft: None,
		})
	}

	pub fn controller(&self) -> &ChatController {
		&self.controller
	}

	fn print_welcome(&self) {
		println!("{}", "Octochat".bright_green().bold());
		println!(
			"{} {}:{}",
			"Model:".yellow(),
			self.controller.runner().provider_name(),
			self.controller.runner().model()
		);
		println!(
			"{}",
			"Type your message and press Enter. /help lists commands, /exit quits.".bright_black()
		);
		println!();
	}

	pub async fn run(&mut self) -> Result<()> {
		self.print_welcome();
		let mut reader = InputReader::new()?;

		loop {
			let file_name = self.controller.pending_file().map(|f| f.name);
			let initial = self.voice_draft.take();
			let event = reader.read_line(file_name.as_deref(), initial.as_deref());

			if self.handle_input(event).await? {
				break;
			}
		}

		Ok(())
	}

	/// Process one prompt result. Returns `true` when the session should end.
	pub async fn handle_input(&mut self, event: InputEvent) -> Result<bool> {
		match event {
			InputEvent::Line(line) => self.handle_line(&line).await,
			InputEvent::Cancelled => Ok(false),
			InputEvent::Exit => Ok(true),
		}
	}

	/// Process one input line. Returns `true` when the session should end.
	pub async fn handle_line(&mut self, line: &str) -> Result<bool> {
		if let Some(command) = parse_command(line) {
			return self.handle_command(command).await;
		}

		let has_file = self.controller.pending_file().is_some();
		if line.trim().is_empty() {
			if has_file {
				self.submit().await;
			}
			return Ok(false);
		}

		if has_file {
			log_info!(
				"A file is loaded, so the typed text is ignored for this submission. Use /unfile to send typed text."
			);
		}

		self.controller.set_typed(line);
		self.submit().await;
		Ok(false)
	}

	async fn handle_command(&mut self, command: ChatCommand) -> Result<bool> {
		match command {
			ChatCommand::Help => print_help(),
			ChatCommand::Exit => return Ok(true),
			ChatCommand::New => {
				self.controller.new_chat();
				self.usage = TokenUsage::default();
				println!("{}", "Started a new chat.".bright_green());
			}
			ChatCommand::File(Some(path)) => self.load_file(&path).await,
			ChatCommand::File(None) | ChatCommand::Unfile => match self.controller.clear_file() {
				Some(file) => println!("{} {}", "Dropped file".bright_yellow(), file.name),
				None => println!("{}", "No file loaded.".bright_yellow()),
			},
			ChatCommand::Send => {
				if self.controller.pending_file().is_some() {
					self.submit().await;
				} else {
					println!(
						"{}",
						"No file loaded. Use /file <path> first.".bright_yellow()
					);
				}
			}
			ChatCommand::Search(text) => self.search(text),
			ChatCommand::Voice => self.listen().await,
			ChatCommand::History => {
				print_transcript(&self.controller.transcript(), self.renderer.as_ref())
			}
			ChatCommand::Info => {
				let transcript = self.controller.transcript();
				let pending = self.controller.pending_file();
				display_session_info(&SessionInfo {
					provider: self.controller.runner().provider_name(),
					model: self.controller.runner().model(),
					transcript: &transcript,
					usage: self.usage,
					pending_file: pending.as_ref().map(|f| (f.name.as_str(), f.query_count())),
				});
			}
			ChatCommand::LogLevel(level) => handle_loglevel(&mut self.config, level.as_deref()),
			ChatCommand::Unknown(name) => println!(
				"{} {}. Type /help for a list of commands.",
				"Unknown command:".bright_red(),
				name
			),
		}

		Ok(false)
	}

	async fn load_file(&mut self, path: &str) {
		match read_query_file(Path::new(path)).await {
			Ok(file) => {
				let queries = file.query_count();
				println!(
					"{} {} ({} queries). Press Enter or use /send to submit.",
					"Loaded".bright_green(),
					file.name,
					queries
				);
				self.controller.load_file(file);
			}
			Err(e) => println!("{}: {:#}", "Error loading file".bright_red(), e),
		}
	}

	async fn submit(&mut self) {
		let total = self.controller.state().read().pending.queries().len();
		if total == 0 {
			return;
		}

		let mut animation = LoadingAnimation::start(total);
		let mut observer = ReplObserver {
			spinner: animation.handle(),
			renderer: self.renderer.as_ref(),
		};
		let outcome = self.controller.submit(&mut observer).await;
		animation.stop();

		match outcome {
			SubmitOutcome::Busy => println!(
				"{}",
				"Still waiting for the previous submission.".bright_yellow()
			),
			SubmitOutcome::Nothing => {}
			SubmitOutcome::Completed(summary) => {
				self.usage.add(&summary.usage);
				if summary.total() > 1 {
					println!(
						"{}",
						format!(
							"Done: {} answered, {} without response, {} failed.",
							summary.generated, summary.no_response, summary.failed
						)
						.bright_black()
					);
				}
				log_info!(
					"Tokens this submission: {} (session total {})",
					summary.usage.total_tokens,
					self.usage.total_tokens
				);
			}
		}
	}

	/// Text for `/search`: the argument, else the draft, else the last query sent
	fn search_text(&self, argument: Option<String>) -> String {
		argument
			.filter(|text| !text.trim().is_empty())
			.or_else(|| {
				let typed = self.controller.typed();
				(!typed.trim().is_empty()).then_some(typed)
			})
			.or_else(|| {
				self.controller
					.transcript()
					.last()
					.map(|entry| entry.query().to_string())
			})
			.unwrap_or_default()
	}

	fn search(&self, argument: Option<String>) {
		let text = self.search_text(argument);
		match build_search_url(&self.config.search_url, &text) {
			Ok(Some(url)) => {
				println!("{} {}", "Searching:".bright_cyan(), url);
				if let Err(e) = open_in_browser(&url) {
					println!("{}: {:#}", "Could not open browser".bright_yellow(), e);
				}
			}
			Ok(None) => println!("{}", "Nothing to search for.".bright_yellow()),
			Err(e) => println!("{}: {:#}", "Search failed".bright_red(), e),
		}
	}

	async fn listen(&mut self) {
		if !self.recognizer.is_available() {
			println!("{}", VOICE_UNSUPPORTED_NOTICE.bright_yellow());
			return;
		}

		println!("{}", "Listening...".bright_cyan());
		match self.recognizer.listen().await {
			Ok(transcript) => {
				// The draft is replaced, not appended to
				self.controller.set_typed(transcript.clone());
				self.voice_draft = Some(transcript);
			}
			Err(e) => println!("{}: {:#}", "Speech recognition failed".bright_red(), e),
		}
	}
}

// Run an interactive session with the model from `config`
pub async fn run_interactive_session(config: &Config) -> Result<()> {
	let mut session = ChatSession::new(config.clone())?;
	session.run().await
}
