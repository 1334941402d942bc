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

use std::env::current_dir;
use std::fs::read_to_string;
use std::fs::rename;
use std::fs::write;
use std::path::PathBuf;

use crate::deck::Deck;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

/// Loads and saves decks, one JSON file per user, inside a single
/// directory.
pub struct Store {
    directory: PathBuf,
}

impl Store {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };
        Ok(Self { directory })
    }

    pub fn deck_path(&self, user: &str) -> PathBuf {
        self.directory.join(format!("{user}.json"))
    }

    /// Load the user's deck, or seed a fresh one if the user has no deck
    /// file yet. A file that exists but does not decode is an error; a
    /// deck in an unknown state is not something we can repair.
    pub fn load_or_create(&self, user: &str) -> Fallible<Deck> {
        let path = self.deck_path(user);
        if !path.exists() {
            log::debug!("No deck file for {user}, seeding a fresh deck.");
            let deck = Deck::seeded(user);
            deck.validate()?;
            return Ok(deck);
        }
        let contents = read_to_string(&path)?;
        let deck: Deck = serde_json::from_str(&contents)
            .map_err(|e| ErrorReport::new(&format!("deck file for user '{user}' is corrupt: {e}")))?;
        if deck.user() != user {
            return fail(&format!(
                "deck file for user '{user}' belongs to '{}'.",
                deck.user()
            ));
        }
        deck.validate()?;
        log::debug!("Loaded deck for {user} with {} cards.", deck.cards().len());
        Ok(deck)
    }

    /// Write the full deck state. The JSON is written to a sibling file
    /// and renamed into place, so the deck file is never left half
    /// written.
    pub fn save(&self, deck: &Deck) -> Fallible<()> {
        let path = self.deck_path(deck.user());
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(deck)?;
        write(&tmp, json)?;
        rename(&tmp, &path)?;
        log::debug!("Saved deck for {}.", deck.user());
        Ok(())
    }
}
