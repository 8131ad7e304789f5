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

// Markdown rendering module

use anyhow::Result;
use colored::*;
use regex::Regex;
use termimad::MadSkin;

pub struct MarkdownRenderer {
	skin: MadSkin,
	code_block_regex: Regex,
}

impl MarkdownRenderer {
	pub fn new() -> Result<Self> {
		let mut skin = MadSkin::default();

		use termimad::crossterm::style::Attribute;
		use termimad::crossterm::style::Color;

		// Headers with different colors (set separately, not chained)
		skin.headers[0].set_fg(Color::Yellow);
		skin.headers[0].add_attr(Attribute::Bold);
		skin.headers[1].set_fg(Color::Blue);
		skin.headers[1].add_attr(Attribute::Bold);
		skin.headers[2].set_fg(Color::Cyan);
		skin.headers[2].add_attr(Attribute::Bold);

		skin.inline_code.set_bg(Color::Rgb { r: 60, g: 60, b: 60 });
		skin.inline_code.set_fg(Color::Yellow);

		skin.italic.set_fg(Color::Cyan);
		skin.bold.set_fg(Color::White);
		skin.bold.add_attr(Attribute::Bold);

		skin.quote_mark.set_fg(Color::Blue);
		skin.bullet.set_fg(Color::Green);

		Ok(Self {
			skin,
			// Fenced code blocks with optional language specification
			code_block_regex: Regex::new(r"```(\w+)?\n([\s\S]*?)\n```")?,
		})
	}

	/// Render to a string sized for the current terminal
	pub fn render(&self, markdown: &str) -> String {
		let width = termimad::terminal_size().0.clamp(60, 120);
		self.skin
			.area_text(markdown, &termimad::Area::new(0, 0, width, 1000))
			.to_string()
	}

	/// Print markdown, with fenced code blocks framed and left unstyled so they copy cleanly
	pub fn render_and_print(&self, markdown: &str) {
		let mut last_end = 0;

		for cap in self.code_block_regex.captures_iter(markdown) {
			let Some(whole) = cap.get(0) else {
				continue;
			};

			let before_content = &markdown[last_end..whole.start()];
			if !before_content.trim().is_empty() {
				self.skin.print_text(before_content);
			}

			let language = cap.get(1).map(|m| m.as_str()).unwrap_or("text");
			let code = cap.get(2).map(|m| m.as_str()).unwrap_or_default();

			println!();
			println!("{}", format!("┌─ {} ─", language).bright_black());
			println!("{}", code);
			println!("{}", "└─────".bright_black());
			println!();

			last_end = whole.end();
		}

		let remaining_content = &markdown[last_end..];
		if !remaining_content.trim().is_empty() {
			self.skin.print_text(remaining_content);
		}
	}
}

// Helper function to check if content looks like markdown
pub fn is_markdown_content(content: &str) -> bool {
	content.contains("```")
		|| content.contains("# ")
		|| content.contains("**")
		|| content.contains("* ")
		|| content.contains("- ")
		|| content.contains("](")
		|| content.contains("| ")
		|| content.contains("> ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_markdown_detection() {
		assert!(is_markdown_content("# Heading"));
		assert!(is_markdown_content("```rust\ncode\n```"));
		assert!(is_markdown_content("**bold text**"));
		assert!(is_markdown_content("[link](url)"));
		assert!(is_markdown_content("Steps:\n- one\n- two"));
		assert!(!is_markdown_content("plain text"));
		assert!(!is_markdown_content("2*3 is six, 10-4 is six too"));
	}

	#[test]
	fn test_render_keeps_text() {
		let renderer = MarkdownRenderer::new().unwrap();
		let rendered = renderer.render("# Title\n\nSome **bold** words");
		assert!(rendered.contains("Title"));
		assert!(rendered.contains("bold"));
	}
}
