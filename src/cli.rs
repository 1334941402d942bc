// Copyright 2025 Fernando Borretti
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

use clap::Parser;

use crate::check::check_deck;
use crate::drill;
use crate::error::Fallible;
use crate::stats::print_deck_stats;
use crate::store::Store;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill due cards.
    Drill {
        /// User whose deck to drill. Prompts for a name when omitted.
        user: Option<String>,
        /// Optional path to the directory holding deck files.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Print deck statistics as JSON.
    Stats {
        /// User whose deck to inspect.
        user: String,
        /// Optional path to the directory holding deck files.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Validate a user's deck file.
    Check {
        /// User whose deck to validate.
        user: String,
        /// Optional path to the directory holding deck files.
        #[arg(long)]
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill { user, directory } => {
            let store = Store::new(directory)?;
            drill::run(&store, user)
        }
        Command::Stats { user, directory } => {
            let store = Store::new(directory)?;
            print_deck_stats(&store, &user)
        }
        Command::Check { user, directory } => {
            let store = Store::new(directory)?;
            check_deck(&store, &user)
        }
    }
}
