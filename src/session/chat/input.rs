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

// User input handling module

use crate::log_error;
use crate::session::chat_helper::CommandHelper;
use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as RustylineConfig, EditMode, Editor};

/// Line editor kept for the whole session so in-memory history survives between prompts
pub struct InputReader {
	editor: Editor<CommandHelper, DefaultHistory>,
}

impl InputReader {
	pub fn new() -> Result<Self> {
		let config = RustylineConfig::builder()
			.completion_type(CompletionType::List)
			.edit_mode(EditMode::Emacs)
			.auto_add_history(true)
			.bell_style(rustyline::config::BellStyle::None)
			.build();

		let mut editor = Editor::with_config(config)?;
		editor.set_helper(Some(CommandHelper::new()));

		Ok(Self { editor })
	}

	/// Read one line. `initial` is placed in the edit buffer, ready to be changed.
	pub fn read_line(&mut self, file_name: Option<&str>, initial: Option<&str>) -> InputEvent {
		let prompt = match file_name {
			Some(name) => format!("[{}] > ", name).bright_blue().to_string(),
			None => "> ".bright_blue().to_string(),
		};

		let result = match initial {
			Some(text) => self.editor.readline_with_initial(&prompt, (text, "")),
			None => self.editor.readline(&prompt),
		};

		let event = InputEvent::from_readline(result);
		match &event {
			InputEvent::Cancelled => println!("{}", "Cancelled".bright_black()),
			InputEvent::Exit => println!("\nExiting session."),
			InputEvent::Line(_) => {}
		}
		event
	}
}

/// What one prompt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
	Line(String),
	/// Ctrl+C: the current input is dropped and nothing is submitted
	Cancelled,
	/// Ctrl+D, or a terminal error that would repeat on every read
	Exit,
}

impl InputEvent {
	fn from_readline(result: Result<String, ReadlineError>) -> Self {
		match result {
			Ok(line) => InputEvent::Line(line),
			Err(ReadlineError::Interrupted) => InputEvent::Cancelled,
			Err(ReadlineError::Eof) => InputEvent::Exit,
			Err(err) => {
				log_error!("Error reading input: {:?}", err);
				InputEvent::Exit
			}
		}
	}
}
