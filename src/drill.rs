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

use std::io::Write;
use std::io::stdin;
use std::io::stdout;
use std::thread::sleep;
use std::time::Duration;

use crate::deck::AnswerSource;
use crate::error::Fallible;
use crate::store::Store;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// Pause after a correct answer.
const CORRECT_PAUSE: Duration = Duration::from_secs(1);

/// Pause after an incorrect answer, long enough to read the correction.
const INCORRECT_PAUSE: Duration = Duration::from_secs(3);

/// Run an interactive review session in the terminal. Prompts for a
/// username when none was given on the command line.
pub fn run(store: &Store, user: Option<String>) -> Fallible<()> {
    let user = match user {
        Some(user) => normalize_user(&user),
        None => prompt_user(),
    };
    let deck = store.load_or_create(&user)?;

    let due = deck.due_today(Timestamp::now()).len();
    println!();
    if due == 0 {
        println!("All done for the day! 🎉");
        return Ok(());
    }
    println!("You have {due} cards due today.");
    println!();

    let mut source = Terminal;
    let reviews = deck.run_session(Timestamp::now(), &mut source);
    let correct = reviews.iter().filter(|review| review.correct).count();
    log::debug!("Session finished: {correct}/{} correct.", reviews.len());

    println!("All done! 💩");

    let deck = deck.apply_outcomes(Timestamp::now(), &reviews);
    store.save(&deck)?;
    Ok(())
}

fn prompt_user() -> String {
    println!("Hi there! Who are you? ");
    let mut line = String::new();
    match stdin().read_line(&mut line) {
        Ok(0) | Err(_) => "unknown".to_string(),
        Ok(_) => normalize_user(&line),
    }
}

fn normalize_user(user: &str) -> String {
    let user = user.trim().to_lowercase();
    if user.is_empty() {
        "unknown".to_string()
    } else {
        user
    }
}

/// Answer source backed by the terminal: prints the prompt, reads a line,
/// and paces feedback with fixed delays.
struct Terminal;

impl AnswerSource for Terminal {
    fn answer(&mut self, card: &Card) -> Option<String> {
        print!("{}", card.display());
        let _ = stdout().flush();
        let mut line = String::new();
        let answer = match stdin().read_line(&mut line) {
            // End of input counts as no answer.
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        };
        println!();
        answer
    }

    fn on_result(&mut self, card: &Card, correct: bool) {
        if correct {
            print!("Got it! 🥳");
            let _ = stdout().flush();
            sleep(CORRECT_PAUSE);
        } else {
            print!("Oops. It's actually {}.", card.answer());
            let _ = stdout().flush();
            sleep(INCORRECT_PAUSE);
        }
        println!();
        println!();
    }
}
