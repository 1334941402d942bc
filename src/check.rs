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

use crate::error::Fallible;
use crate::error::fail;
use crate::store::Store;

/// Verify that a user's deck file exists, decodes, and satisfies the deck
/// invariants.
pub fn check_deck(store: &Store, user: &str) -> Fallible<()> {
    if !store.deck_path(user).exists() {
        return fail(&format!("no deck file for user '{user}'."));
    }
    let _ = store.load_or_create(user)?;
    println!("ok");
    Ok(())
}
