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

// Animation module for loading indicators

use colored::*;
use crossterm::{cursor, execute, terminal};
use parking_lot::Mutex;
use std::io::{stdout, Write};
use std::sync::Arc;
use tokio::task::JoinHandle;

// Animation frames for loading indicator
const LOADING_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

const FRAME_DELAY_MS: u64 = 100;

#[derive(Default)]
struct SpinnerState {
	running: bool,
	current: usize,
	total: usize,
}

/// Shared handle used by progress observers to update and pause the indicator
#[derive(Clone, Default)]
pub struct SpinnerHandle {
	state: Arc<Mutex<SpinnerState>>,
}

impl SpinnerHandle {
	/// Record which query (1-based) is in flight
	pub fn set_progress(&self, current: usize, total: usize) {
		let mut state = self.state.lock();
		state.current = current;
		state.total = total;
	}

	/// Clear the indicator line and run `f` without a frame being drawn over its output
	pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
		let state = self.state.lock();
		if state.running {
			clear_line();
		}
		let result = f();
		drop(state);
		result
	}

	pub fn is_running(&self) -> bool {
		self.state.lock().running
	}
}

/// Loading indicator shown while a submission is in flight
pub struct LoadingAnimation {
	handle: SpinnerHandle,
	task: Option<JoinHandle<()>>,
}

impl LoadingAnimation {
	pub fn start(total: usize) -> Self {
		let handle = SpinnerHandle::default();
		{
			let mut state = handle.state.lock();
			state.running = true;
			state.total = total;
		}

		let task_handle = handle.clone();
		let task = tokio::spawn(async move {
			let mut frame_idx = 0;
			loop {
				{
					let state = task_handle.state.lock();
					if !state.running {
						break;
					}
					draw_frame(LOADING_FRAMES[frame_idx], state.current, state.total);
				}

				frame_idx = (frame_idx + 1) % LOADING_FRAMES.len();
				tokio::time::sleep(tokio::time::Duration::from_millis(FRAME_DELAY_MS)).await;
			}
		});

		Self {
			handle,
			task: Some(task),
		}
	}

	pub fn handle(&self) -> SpinnerHandle {
		self.handle.clone()
	}

	/// Stop the indicator. No frame is drawn after this returns.
	pub fn stop(&mut self) {
		{
			let mut state = self.handle.state.lock();
			if state.running {
				state.running = false;
				clear_line();
			}
		}
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}

impl Drop for LoadingAnimation {
	fn drop(&mut self) {
		self.stop();
	}
}

fn draw_frame(frame: &str, current: usize, total: usize) {
	let mut stdout = stdout();
	let _ = execute!(
		stdout,
		cursor::MoveToColumn(0),
		terminal::Clear(terminal::ClearType::CurrentLine)
	);

	let label = if total > 1 {
		format!("Generating... [{}/{}]", current.max(1), total)
	} else {
		"Generating...".to_string()
	};
	print!(" {} {}", frame.cyan(), label.bright_blue());
	let _ = stdout.flush();
}

fn clear_line() {
	let mut stdout = stdout();
	let _ = execute!(
		stdout,
		cursor::MoveToColumn(0),
		terminal::Clear(terminal::ClearType::CurrentLine)
	);
	let _ = stdout.flush();
}
