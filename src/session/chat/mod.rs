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

// Chat session module
mod animation;
pub mod commands;
pub mod display;
mod input;
pub mod markdown;
mod session;

pub use animation::{LoadingAnimation, SpinnerHandle};
pub use commands::{ChatCommand, COMMANDS};
pub use input::{InputEvent, InputReader};
pub use session::{run_interactive_session, ChatSession};
