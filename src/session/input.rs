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

// Input collector: turns the pending input into an ordered list of queries

/// Derive the queries a submission should send.
///
/// An uploaded file always wins: it is split into lines and every line that is
/// blank after trimming is dropped, the typed text is ignored. Without a file
/// the typed text is sent as a single query, unsplit. An empty result means
/// there is nothing to submit.
pub fn derive_queries(typed: &str, uploaded: Option<&str>) -> Vec<String> {
	if let Some(content) = uploaded {
		return content
			.split('\n')
			.map(|line| line.strip_suffix('\r').unwrap_or(line))
			.filter(|line| !line.trim().is_empty())
			.map(str::to_string)
			.collect();
	}

	if typed.trim().is_empty() {
		return Vec::new();
	}

	vec![typed.to_string()]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_file_lines_in_order_without_blanks() {
		let content = "first\n\nsecond\n   \n\tthird\n";
		let queries = derive_queries("", Some(content));
		assert_eq!(queries, vec!["first", "second", "\tthird"]);
	}

	#[test]
	fn test_file_ignores_typed_text() {
		let queries = derive_queries("typed", Some("from file"));
		assert_eq!(queries, vec!["from file"]);
	}

	#[test]
	fn test_crlf_file_matches_lf_file() {
		let lf = derive_queries("", Some("a\nb\n\nc"));
		let crlf = derive_queries("", Some("a\r\nb\r\n\r\nc"));
		assert_eq!(lf, crlf);
	}

	#[test]
	fn test_file_keeps_duplicates() {
		let queries = derive_queries("", Some("same\nsame\n"));
		assert_eq!(queries, vec!["same", "same"]);
	}

	#[test]
	fn test_blank_file_yields_nothing() {
		assert!(derive_queries("typed", Some("\n  \n\r\n")).is_empty());
		assert!(derive_queries("", Some("")).is_empty());
	}

	#[test]
	fn test_typed_text_is_single_query() {
		let typed = "line one\nline two";
		assert_eq!(derive_queries(typed, None), vec![typed]);
	}

	#[test]
	fn test_typed_text_is_not_trimmed() {
		assert_eq!(derive_queries("  spaced  ", None), vec!["  spaced  "]);
	}

	#[test]
	fn test_empty_input_yields_nothing() {
		assert!(derive_queries("", None).is_empty());
		assert!(derive_queries("   \n\t", None).is_empty());
	}
}
