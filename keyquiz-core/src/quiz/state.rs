//! Quiz scoring state machine
//!
//! Tracks the pending problem, the streak of correct answers, the
//! difficulty level and the answer time budget. Only the producer task
//! owns a `QuizState`.

use crate::config::QuizConfig;

use super::messages::Answer;
use super::problem::Problem;

/// Result of grading one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The key matched the expected digit
    Correct,
    /// A key was pressed but it was wrong
    Wrong,
    /// No key before the budget expired
    Timeout,
}

/// Emitted when a streak completes a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelUp {
    /// Level that was just completed
    pub from: u8,
    /// Level now being played
    pub to: u8,
    /// Time budget for the new level
    pub budget_ms: u32,
}

/// Quiz progress
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuizState {
    config: QuizConfig,
    pending: Option<Problem>,
    streak: u8,
    level: u8,
    budget_ms: u32,
}

impl QuizState {
    /// Fresh state at level 0 with the initial budget
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            pending: None,
            streak: 0,
            level: 0,
            budget_ms: config.initial_budget_ms.max(config.min_budget_ms),
        }
    }

    /// Problem awaiting an answer
    pub fn pending(&self) -> Option<&Problem> {
        self.pending.as_ref()
    }

    /// Consecutive correct answers in the current level
    pub fn streak(&self) -> u8 {
        self.streak
    }

    /// Current difficulty level
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Current answer time budget
    pub fn time_budget_ms(&self) -> u32 {
        self.budget_ms
    }

    /// Budget reduction applied when leaving the current level
    pub fn level_step_ms(&self) -> u32 {
        self.config
            .level_step_ms
            .saturating_add(u32::from(self.level).saturating_mul(self.config.level_step_growth_ms))
    }

    /// Set the problem the next answer will be graded against
    pub fn pose(&mut self, problem: Problem) {
        self.pending = Some(problem);
    }

    /// Grade an answer against the pending problem and clear it
    ///
    /// An answer with nothing pending counts as wrong.
    pub fn grade(&mut self, answer: Answer) -> Outcome {
        match (self.pending.take(), answer) {
            (_, Answer::Timeout) => Outcome::Timeout,
            (Some(problem), Answer::Key(key)) if problem.is_answered_by(key) => Outcome::Correct,
            _ => Outcome::Wrong,
        }
    }

    /// Update streak and level for an outcome
    ///
    /// Returns the level change when the streak reaches the threshold.
    pub fn record(&mut self, outcome: Outcome) -> Option<LevelUp> {
        if outcome != Outcome::Correct {
            self.streak = 0;
            return None;
        }

        self.streak = self.streak.saturating_add(1);
        if self.streak < self.config.streak_to_level.max(1) {
            return None;
        }

        let from = self.level;
        self.budget_ms = self
            .budget_ms
            .saturating_sub(self.level_step_ms())
            .max(self.config.min_budget_ms);
        self.streak = 0;
        self.level = self.level.saturating_add(1);

        Some(LevelUp {
            from,
            to: self.level,
            budget_ms: self.budget_ms,
        })
    }
}
