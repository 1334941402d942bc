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

use serde::Deserialize;
use serde::Serialize;

use crate::types::timestamp::Timestamp;

/// The review interval assigned to new cards, in hours. Also the floor
/// below which a failed review cannot shrink the interval.
pub const INITIAL_STEP: i64 = 24;

/// Hours shaved off a new interval when scheduling the next review, so a
/// card reviewed slightly late comes due at roughly the same time of day.
const DUE_SLACK: i64 = 2;

/// A single question/answer fact with its review schedule. Transitions
/// construct a new card rather than mutating in place.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// The prompt shown to the user. Unique within a deck; the session
    /// merge uses it as the lookup key.
    display: String,
    /// The expected literal answer.
    answer: String,
    /// The current review interval, in hours.
    #[serde(default = "default_step")]
    step: i64,
    /// When the card next comes due. None means it has never been
    /// reviewed and is always due.
    #[serde(default)]
    next_up: Option<Timestamp>,
}

fn default_step() -> i64 {
    INITIAL_STEP
}

impl Card {
    pub fn new(display: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            answer: answer.into(),
            step: INITIAL_STEP,
            next_up: None,
        }
    }

    #[cfg(test)]
    pub fn with_schedule(
        display: impl Into<String>,
        answer: impl Into<String>,
        step: i64,
        next_up: Option<Timestamp>,
    ) -> Self {
        Self {
            display: display.into(),
            answer: answer.into(),
            step,
            next_up,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn next_up(&self) -> Option<Timestamp> {
        self.next_up
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.next_up {
            // Never reviewed, so it's due.
            None => true,
            Some(next_up) => next_up < now,
        }
    }

    /// The card was answered correctly: double the interval.
    pub fn mark_known(&self, now: Timestamp) -> Card {
        let step = self.step * 2;
        self.reschedule(step, now)
    }

    /// The card was answered incorrectly: halve the interval, down to the
    /// initial step at most.
    pub fn mark_unknown(&self, now: Timestamp) -> Card {
        let step = std::cmp::max(INITIAL_STEP, self.step / 2);
        self.reschedule(step, now)
    }

    fn reschedule(&self, step: i64, now: Timestamp) -> Card {
        Card {
            display: self.display.clone(),
            answer: self.answer.clone(),
            step,
            next_up: Some(now.plus_hours(step - DUE_SLACK)),
        }
    }

    /// Check a candidate answer. Surrounding whitespace is ignored; the
    /// comparison is otherwise literal and case-sensitive. A missing
    /// candidate counts as incorrect.
    pub fn check_answer(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|candidate| candidate.trim() == self.answer)
    }
}
