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

// Chat controller: the single owner of application state

use super::providers::ProviderFactory;
use super::runner::{QueryRunner, RunObserver, RunSummary};
use super::{ConversationEntry, LoadedFile, Transcript};
use crate::config::Config;
use crate::log_debug;
use crate::state::{create_shared_state, SharedState};
use anyhow::Result;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// Another submission is still draining its queries
	Busy,
	/// The pending input produced no queries
	Nothing,
	Completed(RunSummary),
}

/// Observer that ignores progress
pub struct NoopObserver;

impl RunObserver for NoopObserver {
	fn on_entry(&mut self, _index: usize, _entry: &ConversationEntry) {}
}

pub struct ChatController {
	state: SharedState,
	runner: QueryRunner,
}

impl ChatController {
	pub fn new(state: SharedState, runner: QueryRunner) -> Self {
		Self { state, runner }
	}

	/// Build a controller for the configured model with fresh state.
	///
	/// Fails when the provider is unknown, the model is unsupported or no
	/// API key is available.
	pub fn from_config(config: &Config) -> Result<Self> {
		let (provider, model) = ProviderFactory::get_provider_for_model(&config.model, config)?;
		provider.get_api_key()?;

		Ok(Self::new(
			create_shared_state(),
			QueryRunner::new(Arc::from(provider), model),
		))
	}

	pub fn state(&self) -> SharedState {
		self.state.clone()
	}

	pub fn runner(&self) -> &QueryRunner {
		&self.runner
	}

	/// Replace the typed draft
	pub fn set_typed(&self, text: impl Into<String>) {
		self.state.write().pending.typed = text.into();
	}

	pub fn typed(&self) -> String {
		self.state.read().pending.typed.clone()
	}

	pub fn load_file(&self, file: LoadedFile) {
		self.state.write().pending.file = Some(file);
	}

	pub fn clear_file(&self) -> Option<LoadedFile> {
		self.state.write().pending.file.take()
	}

	pub fn pending_file(&self) -> Option<LoadedFile> {
		self.state.read().pending.file.clone()
	}

	pub fn is_loading(&self) -> bool {
		self.state.read().loading
	}

	/// Snapshot of the transcript
	pub fn transcript(&self) -> Transcript {
		self.state.read().transcript.clone()
	}

	/// Start a new chat: drop the transcript and any pending input
	pub fn new_chat(&self) {
		let mut state = self.state.write();
		state.transcript.clear();
		state.pending.clear();
	}

	/// Submit the pending input.
	///
	/// Entries are appended to the transcript one by one as their requests
	/// finish. When the batch is done the loading flag is cleared and the
	/// pending input is reset, however many requests failed.
	pub async fn submit<O>(&self, observer: &mut O) -> SubmitOutcome
	where
		O: RunObserver + ?Sized,
	{
		let queries = {
			let mut state = self.state.write();
			if state.loading {
				log_debug!("Submission rejected: previous submission still running");
				return SubmitOutcome::Busy;
			}

			let queries = state.pending.queries();
			if queries.is_empty() {
				return SubmitOutcome::Nothing;
			}

			state.loading = true;
			queries
		};
		let _in_flight = InFlightGuard {
			state: self.state.clone(),
		};

		log_debug!("Submitting {} queries", queries.len());

		let mut appender = TranscriptAppender {
			state: self.state.clone(),
			inner: observer,
		};
		let (_, summary) = self.runner.run(&queries, &mut appender).await;

		SubmitOutcome::Completed(summary)
	}
}

// Clears the loading flag and the pending input when the submission ends,
// including when the future is dropped midway
struct InFlightGuard {
	state: SharedState,
}

impl Drop for InFlightGuard {
	fn drop(&mut self) {
		let mut state = self.state.write();
		state.loading = false;
		state.pending.clear();
	}
}

struct TranscriptAppender<'a, O: RunObserver + ?Sized> {
	state: SharedState,
	inner: &'a mut O,
}

impl<O: RunObserver + ?Sized> RunObserver for TranscriptAppender<'_, O> {
	fn on_query_start(&mut self, index: usize, total: usize, query: &str) {
		self.inner.on_query_start(index, total, query);
	}

	fn on_entry(&mut self, index: usize, entry: &ConversationEntry) {
		self.state.write().transcript.push(entry.clone());
		self.inner.on_entry(index, entry);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::providers::{AiProvider, ProviderResponse};
	use crate::session::runner::tests::{Scripted, ScriptedProvider};
	use tokio::sync::Notify;

	fn controller_with(provider: Arc<dyn AiProvider>) -> ChatController {
		ChatController::new(
			create_shared_state(),
			QueryRunner::new(provider, "gemini-1.5-flash"),
		)
	}

	#[tokio::test]
	async fn test_submit_file_appends_in_order() {
		let controller = controller_with(Arc::new(ScriptedProvider::new(vec![
			("a", Scripted::Text("R_a")),
			("b", Scripted::Fail),
			("c", Scripted::Text("R_c")),
		])));
		controller.set_typed("ignored because a file is pending");
		controller.load_file(LoadedFile::new("batch.txt", "a\n\nb\n  \nc\n"));

		let outcome = controller.submit(&mut NoopObserver).await;

		match outcome {
			SubmitOutcome::Completed(summary) => {
				assert_eq!(summary.total(), 3);
				assert_eq!(summary.failed, 1);
			}
			other => panic!("unexpected outcome: {:?}", other),
		}

		let transcript = controller.transcript();
		let pairs: Vec<(&str, &str)> = transcript
			.iter()
			.map(|e| (e.query(), e.response()))
			.collect();
		assert_eq!(
			pairs,
			vec![("a", "R_a"), ("b", "An error occurred."), ("c", "R_c")]
		);

		assert!(!controller.is_loading());
		assert!(controller.state().read().pending.is_empty());
	}

	#[tokio::test]
	async fn test_entries_visible_while_batch_runs() {
		let controller = controller_with(Arc::new(ScriptedProvider::new(vec![
			("first", Scripted::Text("1")),
			("second", Scripted::Text("2")),
		])));
		controller.load_file(LoadedFile::new("batch.txt", "first\nsecond"));

		let state = controller.state();
		let mut lengths_at_entry = Vec::new();
		let mut observer = |_: usize, _: &ConversationEntry| {
			lengths_at_entry.push(state.read().transcript.len());
		};
		controller.submit(&mut observer).await;

		// Each entry is already in the transcript when the observer hears about it
		assert_eq!(lengths_at_entry, vec![1, 2]);
	}

	#[tokio::test]
	async fn test_typed_submission_is_single_entry() {
		let controller = controller_with(Arc::new(ScriptedProvider::new(vec![(
			"what is\nrust",
			Scripted::Text("a language"),
		)])));
		controller.set_typed("what is\nrust");

		controller.submit(&mut NoopObserver).await;

		let transcript = controller.transcript();
		assert_eq!(transcript.len(), 1);
		assert_eq!(transcript.entries()[0].query(), "what is\nrust");
		assert!(controller.typed().is_empty());
	}

	#[tokio::test]
	async fn test_empty_input_is_noop() {
		let provider = Arc::new(ScriptedProvider::new(Vec::new()));
		let controller = controller_with(provider.clone());
		controller.set_typed("   ");

		let outcome = controller.submit(&mut NoopObserver).await;

		assert_eq!(outcome, SubmitOutcome::Nothing);
		assert!(provider.calls.lock().is_empty());
		assert!(controller.transcript().is_empty());
		assert!(!controller.is_loading());
		// Pending input is left alone when nothing was submitted
		assert_eq!(controller.typed(), "   ");
	}

	#[tokio::test]
	async fn test_new_chat_resets_everything() {
		let controller = controller_with(Arc::new(ScriptedProvider::new(vec![(
			"q",
			Scripted::Text("r"),
		)])));
		controller.set_typed("q");
		controller.submit(&mut NoopObserver).await;
		controller.set_typed("draft");
		controller.load_file(LoadedFile::new("f.txt", "x"));

		controller.new_chat();

		assert_eq!(controller.transcript().len(), 0);
		assert!(controller.state().read().pending.is_empty());
		assert!(controller.pending_file().is_none());
	}

	/// Provider that blocks every call until released
	struct GatedProvider {
		release: Arc<Notify>,
	}

	#[async_trait::async_trait]
	impl AiProvider for GatedProvider {
		fn name(&self) -> &str {
			"gated"
		}

		fn supports_model(&self, _model: &str) -> bool {
			true
		}

		fn get_api_key(&self) -> Result<String> {
			Ok(String::new())
		}

		async fn generate_content(&self, prompt: &str, _model: &str) -> Result<ProviderResponse> {
			self.release.notified().await;
			Ok(ProviderResponse {
				content: Some(format!("answer to {}", prompt)),
				..Default::default()
			})
		}
	}

	#[tokio::test]
	async fn test_submit_while_in_flight_is_rejected() {
		let release = Arc::new(Notify::new());
		let controller = Arc::new(controller_with(Arc::new(GatedProvider {
			release: release.clone(),
		})));
		controller.set_typed("slow question");

		let first = {
			let controller = controller.clone();
			tokio::spawn(async move { controller.submit(&mut NoopObserver).await })
		};

		while !controller.is_loading() {
			tokio::task::yield_now().await;
		}

		controller.set_typed("second question");
		assert_eq!(controller.submit(&mut NoopObserver).await, SubmitOutcome::Busy);

		release.notify_one();
		let outcome = first.await.unwrap();
		assert!(matches!(outcome, SubmitOutcome::Completed(ref s) if s.generated == 1));

		let transcript = controller.transcript();
		assert_eq!(transcript.len(), 1);
		assert_eq!(transcript.entries()[0].query(), "slow question");
		assert!(!controller.is_loading());
	}

	#[test]
	fn test_from_config_requires_api_key() {
		let mut config = Config::default();
		config.providers.google.api_key = None;
		assert!(ChatController::from_config(&config).is_err());

		config.providers.google.api_key = Some("test-key".to_string());
		let controller = ChatController::from_config(&config).unwrap();
		assert_eq!(controller.runner().model(), "gemini-1.5-flash");
		assert_eq!(controller.runner().provider_name(), "google");

		config.model = "openai:gpt-4o".to_string();
		assert!(ChatController::from_config(&config).is_err());
	}
}
