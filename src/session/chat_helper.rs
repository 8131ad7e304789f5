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

// Prompt helper: slash-command completion, argument completion and hints

use crate::session::chat::commands::{FILE_COMMAND, LOGLEVEL_COMMAND};
use crate::session::chat::COMMANDS;
use colored::*;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

const LOG_LEVELS: [&str; 3] = ["none", "info", "debug"];

pub struct CommandHelper {
	files: FilenameCompleter,
	history: HistoryHinter,
}

impl Default for CommandHelper {
	fn default() -> Self {
		Self::new()
	}
}

impl CommandHelper {
	pub fn new() -> Self {
		Self {
			files: FilenameCompleter::new(),
			history: HistoryHinter {},
		}
	}

	// Commands starting with what was typed so far
	fn matching_commands(prefix: &str) -> impl Iterator<Item = &'static str> + '_ {
		COMMANDS.into_iter().filter(move |cmd| cmd.starts_with(prefix))
	}
}

/// Split `/name rest` into the command name and the offset of its argument
fn split_command(line: &str) -> Option<(&str, usize)> {
	if !line.starts_with('/') {
		return None;
	}
	let name_end = line.find(char::is_whitespace)?;
	let arg_start = line[name_end..]
		.find(|c: char| !c.is_whitespace())
		.map_or(line.len(), |offset| name_end + offset);
	Some((&line[..name_end], arg_start))
}

fn pairs<'a>(candidates: impl Iterator<Item = &'a str>) -> Vec<Pair> {
	candidates
		.map(|candidate| Pair {
			display: candidate.to_string(),
			replacement: candidate.to_string(),
		})
		.collect()
}

impl Completer for CommandHelper {
	type Candidate = Pair;

	fn complete(
		&self,
		line: &str,
		pos: usize,
		ctx: &Context<'_>,
	) -> Result<(usize, Vec<Pair>), ReadlineError> {
		let head = &line[..pos];
		if !head.starts_with('/') {
			return Ok((0, vec![]));
		}

		match split_command(head) {
			None => Ok((0, pairs(Self::matching_commands(head)))),
			Some((FILE_COMMAND, _)) => self.files.complete(line, pos, ctx),
			Some((LOGLEVEL_COMMAND, arg_start)) => {
				let typed = &head[arg_start..];
				let levels = LOG_LEVELS.into_iter().filter(|level| level.starts_with(typed));
				Ok((arg_start, pairs(levels)))
			}
			Some(_) => Ok((pos, vec![])),
		}
	}
}

impl Hinter for CommandHelper {
	type Hint = String;

	fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
		if !line.starts_with('/') {
			return self.history.hint(line, pos, ctx);
		}
		if pos < line.len() || split_command(line).is_some() {
			return None;
		}

		Self::matching_commands(line)
			.next()
			.map(|cmd| cmd[line.len()..].to_string())
	}
}

impl Highlighter for CommandHelper {
	fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
		if !line.starts_with('/') {
			return Borrowed(line);
		}

		let name_end = line.find(char::is_whitespace).unwrap_or(line.len());
		let (name, rest) = line.split_at(name_end);
		if COMMANDS.contains(&name) {
			Owned(format!("{}{}", name.green(), rest))
		} else if Self::matching_commands(name).next().is_some() {
			Borrowed(line)
		} else {
			Owned(format!("{}{}", name.red(), rest))
		}
	}

	fn highlight_char(&self, _line: &str, _pos: usize) -> bool {
		false
	}

	fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
		Owned(hint.bright_black().to_string())
	}
}

impl Validator for CommandHelper {}

impl Helper for CommandHelper {}
