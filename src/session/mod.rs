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

// Session module: conversation model, query pipeline and terminal chat

pub mod chat; // Interactive chat session
mod chat_helper; // Chat command completion
pub mod controller; // Application state owner (submit / new chat)
pub mod file_input; // Query file loading
pub mod input; // Input collector: pending input -> ordered queries
pub mod providers; // Provider abstraction layer
pub mod runner; // Sequential query runner
pub mod search; // Web search link construction
pub mod voice; // Speech input collaborator

pub use controller::{ChatController, NoopObserver, SubmitOutcome};
pub use input::derive_queries;
pub use providers::{AiProvider, ProviderFactory, ProviderResponse, TokenUsage};
pub use runner::{QueryRunner, RunObserver, RunSummary};

use serde::{Deserialize, Serialize};

/// Response text used when the API answered without a usable candidate
pub const NO_RESPONSE_TEXT: &str = "No response generated.";
/// Response text used when the remote call failed
pub const ERROR_RESPONSE_TEXT: &str = "An error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOutcome {
	Generated,
	NoResponse,
	Failed,
}

/// One query/response pair. Fields are private so an entry cannot change
/// after the runner creates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationEntry {
	query: String,
	response: String,
	outcome: EntryOutcome,
}

impl ConversationEntry {
	pub fn generated(query: impl Into<String>, response: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			response: response.into(),
			outcome: EntryOutcome::Generated,
		}
	}

	pub fn no_response(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			response: NO_RESPONSE_TEXT.to_string(),
			outcome: EntryOutcome::NoResponse,
		}
	}

	pub fn failed(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			response: ERROR_RESPONSE_TEXT.to_string(),
			outcome: EntryOutcome::Failed,
		}
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn response(&self) -> &str {
		&self.response
	}

	pub fn outcome(&self) -> EntryOutcome {
		self.outcome
	}
}

/// Ordered, append-only log of the current conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
	entries: Vec<ConversationEntry>,
}

impl Transcript {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, entry: ConversationEntry) {
		self.entries.push(entry);
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> &[ConversationEntry] {
		&self.entries
	}

	pub fn iter(&self) -> std::slice::Iter<'_, ConversationEntry> {
		self.entries.iter()
	}

	pub fn last(&self) -> Option<&ConversationEntry> {
		self.entries.last()
	}
}

/// A file loaded for batch submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
	pub name: String,
	pub content: String,
}

impl LoadedFile {
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			content: content.into(),
		}
	}

	/// Number of queries this file would produce
	pub fn query_count(&self) -> usize {
		derive_queries("", Some(&self.content)).len()
	}
}

/// Input that has not been submitted yet: the typed draft and an optional file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInput {
	pub typed: String,
	pub file: Option<LoadedFile>,
}

impl PendingInput {
	/// Queries a submission of this input would send, in order
	pub fn queries(&self) -> Vec<String> {
		derive_queries(&self.typed, self.file.as_ref().map(|f| f.content.as_str()))
	}

	pub fn clear(&mut self) {
		self.typed.clear();
		self.file = None;
	}

	pub fn is_empty(&self) -> bool {
		self.typed.is_empty() && self.file.is_none()
	}
}
