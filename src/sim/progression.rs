//! Score, levels and the speed curve

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    One,
    /// Adversary snake joins
    Two,
    /// Stones are rearranged
    Three,
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    /// The level after this one, if any
    pub fn next(self) -> Option<Level> {
        match self {
            Level::One => Some(Level::Two),
            Level::Two => Some(Level::Three),
            Level::Three => None,
        }
    }

    /// Score needed to enter this level
    pub fn threshold(self) -> u32 {
        match self {
            Level::One => 0,
            Level::Two => LEVEL_TWO_SCORE,
            Level::Three => LEVEL_THREE_SCORE,
        }
    }

    /// Text shown while the level-up banner is up
    pub fn banner(self) -> &'static str {
        match self {
            Level::One => "Eat the food, avoid the walls",
            Level::Two => "Watch out! A rival snake is on the loose",
            Level::Three => "Careful! The stones have moved",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.number())
    }
}

/// Score and level bookkeeping for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    score: u32,
    level: Level,
    /// Set when a threshold fires; cleared when play resumes after the countdown
    level_up_triggered: bool,
    points_since_bonus: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            score: 0,
            level: Level::One,
            level_up_triggered: false,
            points_since_bonus: 0,
        }
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn at(score: u32, level: Level) -> Self {
        Self {
            score,
            level,
            ..Self::default()
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn level_up_triggered(&self) -> bool {
        self.level_up_triggered
    }

    pub fn points_since_bonus(&self) -> u32 {
        self.points_since_bonus
    }

    pub fn eat_food(&mut self) {
        self.score += FOOD_POINTS;
        self.points_since_bonus += FOOD_POINTS;
    }

    pub fn eat_bonus(&mut self) {
        self.score += BONUS_POINTS;
        self.points_since_bonus = 0;
    }

    /// A new bonus may appear once the score is high enough and enough food
    /// was eaten since the last one, provided none is on the board
    pub fn bonus_eligible(&self, bonus_active: bool) -> bool {
        !bonus_active
            && self.score >= BONUS_MIN_SCORE
            && self.points_since_bonus >= BONUS_POINTS_GAP
    }

    /// Promote to the next level when its threshold is met. Fires at most once
    /// until `release_latch`.
    pub fn check_level_up(&mut self) -> Option<Level> {
        if self.level_up_triggered {
            return None;
        }
        let next = self.level.next()?;
        if self.score < next.threshold() {
            return None;
        }
        self.level = next;
        self.level_up_triggered = true;
        Some(next)
    }

    pub fn release_latch(&mut self) {
        self.level_up_triggered = false;
    }
}

/// Tick interval for a snake of `length` segments
pub fn speed_for_length(length: usize) -> u64 {
    let grown = length.saturating_sub(1) as u64;
    INITIAL_SPEED_MS
        .saturating_sub(grown.saturating_mul(SPEED_STEP_MS))
        .max(MAX_SPEED_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_food_and_bonus_scoring() {
        let mut progression = Progression::new();
        progression.eat_food();
        assert_eq!(progression.score(), 1);
        assert_eq!(progression.points_since_bonus(), 1);

        progression.eat_bonus();
        assert_eq!(progression.score(), 4);
        assert_eq!(progression.points_since_bonus(), 0);
    }

    #[test]
    fn test_bonus_eligibility() {
        let mut progression = Progression::at(4, Level::One);
        for _ in 0..3 {
            progression.eat_food();
        }
        // score 7, gap 3
        assert!(progression.bonus_eligible(false));
        assert!(!progression.bonus_eligible(true));

        progression.eat_bonus();
        assert!(!progression.bonus_eligible(false));

        let early = Progression::at(2, Level::One);
        assert!(!early.bonus_eligible(false));
    }

    #[test]
    fn test_level_up_latches_once() {
        let mut progression = Progression::at(7, Level::One);
        assert_eq!(progression.check_level_up(), None);

        progression.eat_food();
        assert_eq!(progression.check_level_up(), Some(Level::Two));
        assert!(progression.level_up_triggered());
        assert_eq!(progression.check_level_up(), None);

        progression.release_latch();
        assert_eq!(progression.check_level_up(), None);
        assert_eq!(progression.level(), Level::Two);
    }

    #[test]
    fn test_bonus_jumping_past_threshold_still_triggers() {
        let mut progression = Progression::at(13, Level::Two);
        progression.eat_bonus();
        assert_eq!(progression.score(), 16);
        assert_eq!(progression.check_level_up(), Some(Level::Three));
        assert_eq!(progression.check_level_up(), None);

        progression.release_latch();
        progression.eat_food();
        assert_eq!(progression.check_level_up(), None);
        assert_eq!(progression.level(), Level::Three);
    }

    #[test]
    fn test_speed_curve_values() {
        assert_eq!(speed_for_length(1), 130);
        assert_eq!(speed_for_length(2), 125);
        assert_eq!(speed_for_length(17), 50);
        assert_eq!(speed_for_length(100), 50);
        assert_eq!(speed_for_length(0), 130);
    }

    #[test]
    fn test_level_ordering_and_text() {
        assert!(Level::One < Level::Two && Level::Two < Level::Three);
        assert_eq!(Level::Three.to_string(), "Level 3");
        assert!(Level::Two.banner().contains("snake"));
        assert!(Level::Three.banner().contains("stones"));
    }

    proptest! {
        #[test]
        fn prop_speed_is_non_increasing_and_floored(length in 0usize..10_000) {
            let here = speed_for_length(length);
            let next = speed_for_length(length + 1);
            prop_assert!(next <= here);
            prop_assert!(here >= MAX_SPEED_MS);
            prop_assert!(here <= INITIAL_SPEED_MS);
        }
    }
}
