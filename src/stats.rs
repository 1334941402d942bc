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

use serde::Serialize;

use crate::error::Fallible;
use crate::store::Store;
use crate::types::card::INITIAL_STEP;
use crate::types::timestamp::Timestamp;

pub fn print_deck_stats(store: &Store, user: &str) -> Fallible<()> {
    let deck = store.load_or_create(user)?;
    let now = Timestamp::now();
    let stats = Stats {
        user: deck.user().to_string(),
        card_count: deck.cards().len(),
        due_today_count: deck.due_today(now).len(),
        unseen_count: deck
            .cards()
            .iter()
            .filter(|card| card.next_up().is_none())
            .count(),
        // Cards whose interval has grown past the initial day.
        mature_count: deck
            .cards()
            .iter()
            .filter(|card| card.step() > INITIAL_STEP)
            .count(),
    };
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{}", stats_json);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    user: String,
    card_count: usize,
    due_today_count: usize,
    unseen_count: usize,
    mature_count: usize,
}
