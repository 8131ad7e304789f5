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

// Sequential query runner: one provider call per query, strictly in order

use super::providers::{AiProvider, TokenUsage};
use super::{ConversationEntry, EntryOutcome};
use crate::{log_debug, log_error};
use std::sync::Arc;

/// Receives progress while a batch drains
pub trait RunObserver: Send {
	/// Called right before the request for `queries[index]` is sent
	fn on_query_start(&mut self, _index: usize, _total: usize, _query: &str) {}

	/// Called as soon as `queries[index]` has its entry, before the next request starts
	fn on_entry(&mut self, index: usize, entry: &ConversationEntry);
}

impl<F> RunObserver for F
where
	F: FnMut(usize, &ConversationEntry) + Send,
{
	fn on_entry(&mut self, index: usize, entry: &ConversationEntry) {
		self(index, entry)
	}
}

/// Counts for one drained batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
	pub generated: usize,
	pub no_response: usize,
	pub failed: usize,
	pub usage: TokenUsage,
}

impl RunSummary {
	pub fn total(&self) -> usize {
		self.generated + self.no_response + self.failed
	}

	fn record(&mut self, entry: &ConversationEntry) {
		match entry.outcome() {
			EntryOutcome::Generated => self.generated += 1,
			EntryOutcome::NoResponse => self.no_response += 1,
			EntryOutcome::Failed => self.failed += 1,
		}
	}
}

pub struct QueryRunner {
	provider: Arc<dyn AiProvider>,
	model: String,
}

impl QueryRunner {
	pub fn new(provider: Arc<dyn AiProvider>, model: impl Into<String>) -> Self {
		Self {
			provider,
			model: model.into(),
		}
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn provider_name(&self) -> &str {
		self.provider.name()
	}

	/// Send every query in order, awaiting each call before starting the next.
	///
	/// Always returns exactly one entry per query, in query order. A failed
	/// call becomes an entry with the error fallback text and the loop moves
	/// on to the next query.
	pub async fn run<O>(
		&self,
		queries: &[String],
		observer: &mut O,
	) -> (Vec<ConversationEntry>, RunSummary)
	where
		O: RunObserver + ?Sized,
	{
		let total = queries.len();
		let mut entries = Vec::with_capacity(total);
		let mut summary = RunSummary::default();

		for (index, query) in queries.iter().enumerate() {
			observer.on_query_start(index, total, query);

			let (entry, usage) = self.run_one(query).await;
			if let Some(usage) = usage {
				summary.usage.add(&usage);
			}
			summary.record(&entry);

			observer.on_entry(index, &entry);
			entries.push(entry);
		}

		(entries, summary)
	}

	/// Run a single query and turn the outcome into an entry
	pub async fn run_one(&self, query: &str) -> (ConversationEntry, Option<TokenUsage>) {
		match self.provider.generate_content(query, &self.model).await {
			Ok(response) => {
				log_debug!(
					"{} answered in {} ms",
					self.provider.name(),
					response.request_time_ms
				);
				let entry = match response.content {
					Some(text) => ConversationEntry::generated(query, text),
					None => ConversationEntry::no_response(query),
				};
				(entry, response.usage)
			}
			Err(e) => {
				log_error!("Error: {}", e);
				(ConversationEntry::failed(query), None)
			}
		}
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::session::providers::ProviderResponse;
	use crate::session::{ERROR_RESPONSE_TEXT, NO_RESPONSE_TEXT};
	use anyhow::Result;
	use parking_lot::Mutex;

	pub(crate) enum Scripted {
		Text(&'static str),
		Empty,
		Fail,
	}

	/// Provider that answers from a script keyed by prompt and records call order
	pub(crate) struct ScriptedProvider {
		script: Vec<(&'static str, Scripted)>,
		pub(crate) calls: Mutex<Vec<String>>,
	}

	impl ScriptedProvider {
		pub(crate) fn new(script: Vec<(&'static str, Scripted)>) -> Self {
			Self {
				script,
				calls: Mutex::new(Vec::new()),
			}
		}
	}

	#[async_trait::async_trait]
	impl AiProvider for ScriptedProvider {
		fn name(&self) -> &str {
			"scripted"
		}

		fn supports_model(&self, _model: &str) -> bool {
			true
		}

		fn get_api_key(&self) -> Result<String> {
			Ok(String::new())
		}

		async fn generate_content(&self, prompt: &str, _model: &str) -> Result<ProviderResponse> {
			self.calls.lock().push(prompt.to_string());
			tokio::task::yield_now().await;

			match self.script.iter().find(|(p, _)| *p == prompt).map(|(_, s)| s) {
				Some(Scripted::Text(text)) => Ok(ProviderResponse {
					content: Some(text.to_string()),
					usage: Some(TokenUsage {
						prompt_tokens: 1,
						output_tokens: 2,
						total_tokens: 3,
					}),
					request_time_ms: 0,
				}),
				Some(Scripted::Empty) => Ok(ProviderResponse::default()),
				Some(Scripted::Fail) | None => Err(anyhow::anyhow!("connection reset")),
			}
		}
	}

	fn queries(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[tokio::test]
	async fn test_failure_is_isolated_and_order_preserved() {
		let provider = Arc::new(ScriptedProvider::new(vec![
			("a", Scripted::Text("R_a")),
			("b", Scripted::Fail),
			("c", Scripted::Text("R_c")),
		]));
		let runner = QueryRunner::new(provider.clone(), "gemini-1.5-flash");

		let mut seen = Vec::new();
		let mut observer = |index: usize, entry: &ConversationEntry| {
			seen.push((index, entry.query().to_string()));
		};
		let (entries, summary) = runner.run(&queries(&["a", "b", "c"]), &mut observer).await;

		assert_eq!(
			entries,
			vec![
				ConversationEntry::generated("a", "R_a"),
				ConversationEntry::failed("b"),
				ConversationEntry::generated("c", "R_c"),
			]
		);
		assert_eq!(entries[1].response(), ERROR_RESPONSE_TEXT);
		assert_eq!(*provider.calls.lock(), vec!["a", "b", "c"]);
		assert_eq!(
			seen,
			vec![(0, "a".to_string()), (1, "b".to_string()), (2, "c".to_string())]
		);
		assert_eq!(summary.generated, 2);
		assert_eq!(summary.failed, 1);
		assert_eq!(summary.usage.total_tokens, 6);
	}

	#[tokio::test]
	async fn test_missing_candidates_uses_no_response_text() {
		let provider = Arc::new(ScriptedProvider::new(vec![("q", Scripted::Empty)]));
		let runner = QueryRunner::new(provider, "gemini-1.5-flash");

		let (entry, usage) = runner.run_one("q").await;
		assert_eq!(entry.response(), NO_RESPONSE_TEXT);
		assert_eq!(entry.outcome(), EntryOutcome::NoResponse);
		assert!(usage.is_none());
	}

	#[tokio::test]
	async fn test_all_failures_still_produce_one_entry_each() {
		let provider = Arc::new(ScriptedProvider::new(Vec::new()));
		let runner = QueryRunner::new(provider, "gemini-1.5-flash");

		let mut observer = |_: usize, _: &ConversationEntry| {};
		let (entries, summary) = runner
			.run(&queries(&["x", "y", "x"]), &mut observer)
			.await;

		assert_eq!(entries.len(), 3);
		assert!(entries.iter().all(|e| e.outcome() == EntryOutcome::Failed));
		assert_eq!(entries[2].query(), "x");
		assert_eq!(summary.total(), 3);
	}

	#[tokio::test]
	async fn test_observer_sees_start_before_entry() {
		struct Recorder(Vec<String>);
		impl RunObserver for Recorder {
			fn on_query_start(&mut self, index: usize, total: usize, _query: &str) {
				self.0.push(format!("start {}/{}", index + 1, total));
			}
			fn on_entry(&mut self, index: usize, _entry: &ConversationEntry) {
				self.0.push(format!("entry {}", index + 1));
			}
		}

		let provider = Arc::new(ScriptedProvider::new(vec![
			("a", Scripted::Text("1")),
			("b", Scripted::Text("2")),
		]));
		let runner = QueryRunner::new(provider, "gemini-1.5-flash");
		let mut recorder = Recorder(Vec::new());
		runner.run(&queries(&["a", "b"]), &mut recorder).await;

		assert_eq!(
			recorder.0,
			vec!["start 1/2", "entry 1", "start 2/2", "entry 2"]
		);
	}

	#[tokio::test]
	async fn test_empty_queries_make_no_calls() {
		let provider = Arc::new(ScriptedProvider::new(Vec::new()));
		let runner = QueryRunner::new(provider.clone(), "gemini-1.5-flash");
		let mut observer = |_: usize, _: &ConversationEntry| {};
		let (entries, summary) = runner.run(&[], &mut observer).await;

		assert!(entries.is_empty());
		assert_eq!(summary, RunSummary::default());
		assert!(provider.calls.lock().is_empty());
	}
}
