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

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskArgs, ChatArgs, ConfigArgs};
use octochat::config::{set_thread_config, Config};

#[derive(Parser)]
#[command(name = "octochat")]
#[command(version = "0.1.0")]
#[command(about = "Octochat is a terminal chat client for Google's generative language API")]
struct OctochatArgs {
	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
	/// Start an interactive chat session (default)
	Chat(ChatArgs),

	/// Send one query, a file of queries, or piped text and print the answers
	Ask(AskArgs),

	/// Create, update or show the configuration file
	Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
	let args = OctochatArgs::parse();

	// Load configuration
	let mut config = Config::load()?;

	// Logging macros read the config from the current thread
	set_thread_config(&config);

	match args.command {
		Some(Commands::Config(config_args)) => commands::config::execute(&config_args, config),
		Some(Commands::Ask(ask_args)) => commands::ask::execute(&ask_args, config).await,
		Some(Commands::Chat(chat_args)) => {
			chat_args.apply(&mut config);
			octochat::session::chat::run_interactive_session(&config).await
		}
		None => octochat::session::chat::run_interactive_session(&config).await,
	}
}
