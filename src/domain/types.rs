//! Shared types for the barbershop simulation

use serde::{Deserialize, Serialize};

/// Newtype wrapper for customer IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CustomerId(pub u64);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for barber IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BarberId(pub u32);

impl std::fmt::Display for BarberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post-service rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a rating, returning None when the score is outside 1..=5
    pub fn new(score: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&score).then_some(Self(score))
    }

    /// Build a rating, clamping the score into 1..=5
    pub fn saturating(score: u8) -> Self {
        Self(score.clamp(Self::MIN, Self::MAX))
    }

    #[inline]
    pub fn score(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal outcome of a single customer visit
///
/// Every customer reaches exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Haircut completed
    Served,
    /// Left the waiting room before being called
    LeftQueue,
    /// Walked out on arrival because every barber was asleep
    LeftSeeingAllAsleep,
    /// Waiting room was full
    TurnedAway,
}

impl Outcome {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Served => "served",
            Outcome::LeftQueue => "left_queue",
            Outcome::LeftSeeingAllAsleep => "left_all_asleep",
            Outcome::TurnedAway => "turned_away",
        }
    }
}

/// Result of an arrival attempting to take a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// Sitting in the waiting room; terminal outcome comes later
    Seated,
    /// Already terminal at the door
    Left(Outcome),
}

impl ArrivalOutcome {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrivalOutcome::Seated => "seated",
            ArrivalOutcome::Left(outcome) => outcome.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_none());
        assert_eq!(Rating::new(1).map(|r| r.score()), Some(1));
        assert_eq!(Rating::new(5).map(|r| r.score()), Some(5));
        assert!(Rating::new(6).is_none());
        assert_eq!(Rating::saturating(0).score(), 1);
        assert_eq!(Rating::saturating(9).score(), 5);
    }

    #[test]
    fn test_outcome_as_str() {
        assert_eq!(Outcome::Served.as_str(), "served");
        assert_eq!(Outcome::TurnedAway.as_str(), "turned_away");
        assert_eq!(ArrivalOutcome::Seated.as_str(), "seated");
        assert_eq!(ArrivalOutcome::Left(Outcome::LeftSeeingAllAsleep).as_str(), "left_all_asleep");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CustomerId(42).to_string(), "42");
        assert_eq!(BarberId(2).to_string(), "2");
    }
}
