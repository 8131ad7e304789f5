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

// Chat commands module

use crate::config::{Config, LogLevel};
use colored::Colorize;

pub const HELP_COMMAND: &str = "/help";
pub const EXIT_COMMAND: &str = "/exit";
pub const QUIT_COMMAND: &str = "/quit";
pub const NEW_COMMAND: &str = "/new";
pub const FILE_COMMAND: &str = "/file";
pub const UNFILE_COMMAND: &str = "/unfile";
pub const SEND_COMMAND: &str = "/send";
pub const SEARCH_COMMAND: &str = "/search";
pub const VOICE_COMMAND: &str = "/voice";
pub const HISTORY_COMMAND: &str = "/history";
pub const INFO_COMMAND: &str = "/info";
pub const LOGLEVEL_COMMAND: &str = "/loglevel";

// List of all available commands for autocomplete
pub const COMMANDS: [&str; 12] = [
	HELP_COMMAND,
	EXIT_COMMAND,
	QUIT_COMMAND,
	NEW_COMMAND,
	FILE_COMMAND,
	UNFILE_COMMAND,
	SEND_COMMAND,
	SEARCH_COMMAND,
	VOICE_COMMAND,
	HISTORY_COMMAND,
	INFO_COMMAND,
	LOGLEVEL_COMMAND,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
	Help,
	Exit,
	New,
	/// `/file` with no path drops the pending file
	File(Option<String>),
	Unfile,
	Send,
	Search(Option<String>),
	Voice,
	History,
	Info,
	LogLevel(Option<String>),
	Unknown(String),
}

/// Parse a slash command. Lines that do not start with `/` are not commands.
pub fn parse_command(line: &str) -> Option<ChatCommand> {
	let line = line.trim();
	if !line.starts_with('/') {
		return None;
	}

	let (name, rest) = match line.split_once(char::is_whitespace) {
		Some((name, rest)) => (name, rest.trim()),
		None => (line, ""),
	};
	let argument = (!rest.is_empty()).then(|| rest.to_string());

	let command = match name {
		HELP_COMMAND => ChatCommand::Help,
		EXIT_COMMAND | QUIT_COMMAND => ChatCommand::Exit,
		NEW_COMMAND => ChatCommand::New,
		FILE_COMMAND => ChatCommand::File(argument),
		UNFILE_COMMAND => ChatCommand::Unfile,
		SEND_COMMAND => ChatCommand::Send,
		SEARCH_COMMAND => ChatCommand::Search(argument),
		VOICE_COMMAND => ChatCommand::Voice,
		HISTORY_COMMAND => ChatCommand::History,
		INFO_COMMAND => ChatCommand::Info,
		LOGLEVEL_COMMAND => ChatCommand::LogLevel(argument),
		other => ChatCommand::Unknown(other.to_string()),
	};

	Some(command)
}

pub fn print_help() {
	println!("{}", "\nAvailable commands:\n".bright_cyan());
	println!("{} - Show this help message", HELP_COMMAND.cyan());
	println!("{} - Start a new chat (clears the transcript)", NEW_COMMAND.cyan());
	println!(
		"{} <path> - Load a text file; each non-empty line is sent as its own query",
		FILE_COMMAND.cyan()
	);
	println!("{} - Drop the loaded file", UNFILE_COMMAND.cyan());
	println!("{} - Send the loaded file", SEND_COMMAND.cyan());
	println!(
		"{} [text] - Open a web search for the text or the last draft",
		SEARCH_COMMAND.cyan()
	);
	println!("{} - Dictate the next message", VOICE_COMMAND.cyan());
	println!("{} - Show the conversation so far", HISTORY_COMMAND.cyan());
	println!("{} - Show model, entry and token counts", INFO_COMMAND.cyan());
	println!(
		"{} [level] - Set logging level: none, info, or debug",
		LOGLEVEL_COMMAND.cyan()
	);
	println!(
		"{} or {} - Exit the session\n",
		EXIT_COMMAND.cyan(),
		QUIT_COMMAND.cyan()
	);

	println!("{}", "Keyboard shortcuts:\n".bright_cyan());
	println!("{} - Send the message", "Enter".bright_green());
	println!("{} - Accept hint/completion", "Ctrl+E".bright_green());
	println!("{} - Cancel input", "Ctrl+C".bright_green());
	println!("{} - Exit session", "Ctrl+D".bright_green());
	println!();

	println!("{}", "** About loaded files **".bright_yellow());
	println!("While a file is loaded it takes priority over typed text.");
	println!("Press Enter on an empty line or use /send to submit it.\n");
}

/// Show or change the log level for this run; nothing is written to disk
pub fn handle_loglevel(config: &mut Config, param: Option<&str>) {
	let Some(param) = param else {
		println!(
			"{}",
			format!("Current log level: {}", config.get_log_level().as_str()).bright_cyan()
		);
		println!("{}", "Available levels: none, info, debug".bright_yellow());
		println!(
			"{}",
			"Note: Changes are runtime-only and do not persist to config file.".bright_blue()
		);
		return;
	};

	let new_level: LogLevel = match param.parse() {
		Ok(level) => level,
		Err(e) => {
			println!("{}", format!("{}", e).bright_red());
			return;
		}
	};

	config.log_level = new_level.clone();
	crate::config::set_thread_config(config);

	match new_level {
		LogLevel::None => {
			println!("{}", "Log level set to NONE (runtime only).".bright_yellow());
		}
		LogLevel::Info => {
			println!("{}", "Log level set to INFO (runtime only).".bright_green());
		}
		LogLevel::Debug => {
			println!("{}", "Log level set to DEBUG (runtime only).".bright_green());
			println!(
				"{}",
				"Request endpoints and timings will be shown.".bright_yellow()
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_plain_text_is_not_a_command() {
		assert_eq!(parse_command("hello there"), None);
		assert_eq!(parse_command(""), None);
		assert_eq!(parse_command("  what about /help?"), None);
	}

	#[test]
	fn test_parse_commands() {
		assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
		assert_eq!(parse_command("/quit"), Some(ChatCommand::Exit));
		assert_eq!(parse_command(" /exit "), Some(ChatCommand::Exit));
		assert_eq!(parse_command("/new"), Some(ChatCommand::New));
		assert_eq!(parse_command("/send"), Some(ChatCommand::Send));
		assert_eq!(parse_command("/voice"), Some(ChatCommand::Voice));
		assert_eq!(
			parse_command("/frobnicate now"),
			Some(ChatCommand::Unknown("/frobnicate".to_string()))
		);
	}

	#[test]
	fn test_parse_command_arguments() {
		assert_eq!(
			parse_command("/file  notes/questions.txt "),
			Some(ChatCommand::File(Some("notes/questions.txt".to_string())))
		);
		assert_eq!(parse_command("/file"), Some(ChatCommand::File(None)));
		assert_eq!(
			parse_command("/search rust async traits"),
			Some(ChatCommand::Search(Some("rust async traits".to_string())))
		);
		assert_eq!(
			parse_command("/loglevel debug"),
			Some(ChatCommand::LogLevel(Some("debug".to_string())))
		);
	}

	#[test]
	fn test_every_listed_command_parses() {
		for command in COMMANDS {
			let parsed = parse_command(command);
			assert!(
				!matches!(parsed, None | Some(ChatCommand::Unknown(_))),
				"{} did not parse",
				command
			);
		}
	}

	#[test]
	fn test_handle_loglevel_updates_runtime_config() {
		let mut config = Config::default();
		handle_loglevel(&mut config, Some("debug"));
		assert_eq!(config.log_level, LogLevel::Debug);

		handle_loglevel(&mut config, Some("loud"));
		assert_eq!(config.log_level, LogLevel::Debug);

		handle_loglevel(&mut config, None);
		assert_eq!(config.log_level, LogLevel::Debug);
	}
}
