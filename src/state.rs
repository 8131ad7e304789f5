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

use crate::session::{PendingInput, Transcript};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Default)]
pub struct AppState {
	pub pending: PendingInput,
	pub transcript: Transcript,
	// Set while a submission drains its queries; doubles as the submit gate
	pub loading: bool,
}

pub type SharedState = Arc<RwLock<AppState>>;

pub fn create_shared_state() -> SharedState {
	Arc::new(RwLock::new(AppState::default()))
}
