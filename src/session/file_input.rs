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

use super::LoadedFile;
use anyhow::{Context, Result};
use std::path::Path;

/// Read a whole UTF-8 text file for batch submission
pub async fn read_query_file(path: &Path) -> Result<LoadedFile> {
	let content = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("Failed to read file {}", path.display()))?;

	let name = path
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string());

	Ok(LoadedFile::new(name, content))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_read_query_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("questions.txt");
		std::fs::write(&path, "first\r\n\r\nsecond\r\n").unwrap();

		let file = read_query_file(&path).await.unwrap();
		assert_eq!(file.name, "questions.txt");
		assert_eq!(file.content, "first\r\n\r\nsecond\r\n");
		assert_eq!(file.query_count(), 2);
	}

	#[tokio::test]
	async fn test_missing_file_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nope.txt");

		let err = read_query_file(&path).await.unwrap_err();
		assert!(err.to_string().contains("nope.txt"));
	}

	#[tokio::test]
	async fn test_non_utf8_file_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("binary.bin");
		std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

		assert!(read_query_file(&path).await.is_err());
	}
}
