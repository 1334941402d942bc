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

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// The maximum number of cards drilled in a single session.
const SESSION_LIMIT: usize = 10;

/// The inclusive bounds of the seeded times table.
const TABLE_RANGE: std::ops::RangeInclusive<i64> = 2..=12;

/// A user's full, ordered collection of cards. The card set is fixed at
/// seeding time; reviewing reschedules cards but never adds or removes
/// them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    user: String,
}

/// The outcome for a single card shown in a session: the rescheduled card
/// plus whether the answer was correct.
pub struct Review {
    pub card: Card,
    pub correct: bool,
}

/// The shell-side collaborator that supplies answers during a session.
pub trait AnswerSource {
    /// Obtain a candidate answer for a card. None means input ran out.
    fn answer(&mut self, card: &Card) -> Option<String>;

    /// Called after each card is scored. Presentation hook only; it has no
    /// effect on scheduling.
    fn on_result(&mut self, _card: &Card, _correct: bool) {}
}

impl Deck {
    /// Build the default deck for a new user: one card per ordered pair of
    /// the times table, in outer-i inner-j order.
    pub fn seeded(user: impl Into<String>) -> Self {
        let mut cards = Vec::new();
        for i in TABLE_RANGE {
            for j in TABLE_RANGE {
                cards.push(Card::new(format!("{i} × {j} = "), (i * j).to_string()));
            }
        }
        Self {
            cards,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Check that card prompts are unique. The session merge keys on the
    /// prompt text, so a duplicate would make outcomes ambiguous.
    pub fn validate(&self) -> Fallible<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for card in &self.cards {
            if !seen.insert(card.display()) {
                return fail(&format!("duplicate card prompt: {}", card.display()));
            }
        }
        Ok(())
    }

    /// The cards due for review, in deck order, capped at the session
    /// limit.
    pub fn due_today(&self, now: Timestamp) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| card.is_due(now))
            .take(SESSION_LIMIT)
            .collect()
    }

    /// Drill every due card once, pulling answers from the source, and
    /// return the outcomes in review order.
    pub fn run_session(&self, now: Timestamp, source: &mut dyn AnswerSource) -> Vec<Review> {
        let mut reviews = Vec::new();
        for card in self.due_today(now) {
            let candidate = source.answer(card);
            let correct = card.check_answer(candidate.as_deref());
            let outcome = if correct {
                card.mark_known(now)
            } else {
                card.mark_unknown(now)
            };
            source.on_result(card, correct);
            reviews.push(Review {
                card: outcome,
                correct,
            });
        }
        reviews
    }

    /// Merge session outcomes back into the full collection. Every card
    /// keeps its deck position; a card with a matching outcome takes the
    /// outcome's schedule, and a card with none is rescheduled as a miss.
    pub fn apply_outcomes(&self, now: Timestamp, outcomes: &[Review]) -> Deck {
        let cards = self
            .cards
            .iter()
            .map(|card| {
                let outcome = outcomes
                    .iter()
                    .find(|review| review.card.display() == card.display());
                match outcome {
                    Some(review) => review.card.clone(),
                    None => card.mark_unknown(now),
                }
            })
            .collect();
        Deck {
            cards,
            user: self.user.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn now() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }

    /// Answers every card from a fixed script, or correctly when the
    /// script runs out.
    struct Scripted {
        answers: Vec<Option<String>>,
        shown: Vec<String>,
    }

    impl Scripted {
        fn always_correct() -> Self {
            Self {
                answers: Vec::new(),
                shown: Vec::new(),
            }
        }

        fn with_answers(answers: Vec<Option<String>>) -> Self {
            Self {
                answers,
                shown: Vec::new(),
            }
        }
    }

    impl AnswerSource for Scripted {
        fn answer(&mut self, card: &Card) -> Option<String> {
            self.shown.push(card.display().to_string());
            if self.answers.is_empty() {
                Some(card.answer().to_string())
            } else {
                self.answers.remove(0)
            }
        }
    }

    #[test]
    fn test_seeded_deck_has_121_unique_cards() {
        let deck = Deck::seeded("alice");
        assert_eq!(deck.cards().len(), 121);
        let displays: HashSet<&str> = deck.cards().iter().map(|card| card.display()).collect();
        assert_eq!(displays.len(), 121);
        assert!(deck.validate().is_ok());
    }

    #[test]
    fn test_seeded_deck_order_and_answers() {
        let deck = Deck::seeded("alice");
        let first = &deck.cards()[0];
        assert_eq!(first.display(), "2 × 2 = ");
        assert_eq!(first.answer(), "4");
        let second = &deck.cards()[1];
        assert_eq!(second.display(), "2 × 3 = ");
        assert_eq!(second.answer(), "6");
        let last = &deck.cards()[120];
        assert_eq!(last.display(), "12 × 12 = ");
        assert_eq!(last.answer(), "144");
        assert!(deck.cards().iter().all(|card| card.step() == 24));
        assert!(deck.cards().iter().all(|card| card.next_up().is_none()));
    }

    #[test]
    fn test_validate_rejects_duplicate_prompts() {
        let deck = Deck {
            cards: vec![Card::new("2 × 3 = ", "6"), Card::new("2 × 3 = ", "6")],
            user: "alice".to_string(),
        };
        let result = deck.validate();
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: duplicate card prompt: 2 × 3 = ");
    }

    #[test]
    fn test_due_today_caps_at_ten_and_preserves_order() {
        let deck = Deck::seeded("alice");
        let due = deck.due_today(now());
        assert_eq!(due.len(), 10);
        assert_eq!(due[0].display(), "2 × 2 = ");
        assert_eq!(due[9].display(), "2 × 11 = ");
    }

    #[test]
    fn test_due_today_skips_scheduled_cards() {
        let future = Some(now().plus_hours(5));
        let past = Some(now().plus_hours(-5));
        let deck = Deck {
            cards: vec![
                Card::with_schedule("2 × 2 = ", "4", 24, future),
                Card::with_schedule("2 × 3 = ", "6", 24, past),
                Card::new("2 × 4 = ", "8"),
            ],
            user: "alice".to_string(),
        };
        let due = deck.due_today(now());
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].display(), "2 × 3 = ");
        assert_eq!(due[1].display(), "2 × 4 = ");
    }

    #[test]
    fn test_all_correct_session_doubles_every_reviewed_card() {
        let deck = Deck::seeded("alice");
        let mut source = Scripted::always_correct();
        let reviews = deck.run_session(now(), &mut source);
        assert_eq!(reviews.len(), 10);
        for review in &reviews {
            assert!(review.correct);
            assert_eq!(review.card.step(), 48);
            assert_eq!(review.card.next_up(), Some(now().plus_hours(46)));
        }
        assert_eq!(source.shown.len(), 10);
        assert_eq!(source.shown[0], "2 × 2 = ");
    }

    #[test]
    fn test_session_scores_wrong_and_missing_answers_as_misses() {
        let deck = Deck {
            cards: vec![
                Card::new("2 × 2 = ", "4"),
                Card::new("2 × 3 = ", "6"),
                Card::new("2 × 4 = ", "8"),
            ],
            user: "alice".to_string(),
        };
        let mut source = Scripted::with_answers(vec![
            Some(" 4 ".to_string()),
            Some("7".to_string()),
            None,
        ]);
        let reviews = deck.run_session(now(), &mut source);
        assert_eq!(reviews.len(), 3);
        assert!(reviews[0].correct);
        assert_eq!(reviews[0].card.step(), 48);
        assert!(!reviews[1].correct);
        assert_eq!(reviews[1].card.step(), 24);
        assert!(!reviews[2].correct);
        assert_eq!(reviews[2].card.step(), 24);
        assert_eq!(reviews[2].card.next_up(), Some(now().plus_hours(22)));
    }

    #[test]
    fn test_apply_outcomes_replaces_reviewed_cards_in_place() {
        let deck = Deck::seeded("alice");
        let reviews = deck.run_session(now(), &mut Scripted::always_correct());
        let merged = deck.apply_outcomes(now(), &reviews);
        assert_eq!(merged.user(), "alice");
        assert_eq!(merged.cards().len(), 121);
        for (i, card) in merged.cards().iter().enumerate() {
            assert_eq!(card.display(), deck.cards()[i].display());
        }
        assert_eq!(merged.cards()[0].step(), 48);
        assert_eq!(merged.cards()[9].step(), 48);
    }

    #[test]
    fn test_apply_outcomes_reschedules_cards_outside_the_session() {
        // Surprising but deliberate: a card that was never shown is still
        // pushed back as a miss every time outcomes are merged.
        let deck = Deck::seeded("alice");
        let reviews = deck.run_session(now(), &mut Scripted::always_correct());
        let merged = deck.apply_outcomes(now(), &reviews);
        for card in &merged.cards()[10..] {
            assert_eq!(card.step(), 24);
            assert_eq!(card.next_up(), Some(now().plus_hours(22)));
        }
    }
}
