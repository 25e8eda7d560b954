//! Motor state flags and polarity.
//!
//! The kernel reports motor state as space-separated tags.  [`STATE_TAGS`]
//! is the single table used for both directions, so the bit assigned to a
//! tag never depends on declaration order.

use core::fmt;
use core::str::FromStr;

bitflags::bitflags! {
    /// Flag set describing the state of a motor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MotorState: u32 {
        const RUNNING = 1 << 0;
        const RAMPING = 1 << 1;
        const HOLDING = 1 << 2;
        const OVERLOADED = 1 << 3;
        const STALLED = 1 << 4;
    }
}

/// Tag ↔ flag table.
pub const STATE_TAGS: [(&str, MotorState); 5] = [
    ("running", MotorState::RUNNING),
    ("ramping", MotorState::RAMPING),
    ("holding", MotorState::HOLDING),
    ("overloaded", MotorState::OVERLOADED),
    ("stalled", MotorState::STALLED),
];

/// A token that is not part of a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {what} {token:?}, valid values are {valid:?}")]
pub struct UnknownToken {
    pub what: &'static str,
    pub token: String,
    /// The full vocabulary, sorted.
    pub valid: Vec<String>,
}

impl MotorState {
    /// The valid state tags in sorted order.
    pub fn vocabulary() -> Vec<String> {
        let mut tags: Vec<String> = STATE_TAGS.iter().map(|(t, _)| (*t).to_owned()).collect();
        tags.sort();
        tags
    }

    /// Decode the attribute form.  Empty text is the empty set.
    pub fn from_attribute(text: &str) -> Result<Self, UnknownToken> {
        if text.is_empty() {
            return Ok(Self::empty());
        }
        text.split(' ').try_fold(Self::empty(), |acc, tag| {
            STATE_TAGS
                .iter()
                .find(|(t, _)| *t == tag)
                .map(|(_, bit)| acc | *bit)
                .ok_or_else(|| UnknownToken {
                    what: "motor state",
                    token: tag.to_owned(),
                    valid: Self::vocabulary(),
                })
        })
    }

    /// Encode to the attribute form, tags in bit order.
    pub fn to_attribute(self) -> String {
        self.tags().join(" ")
    }

    fn tags(self) -> Vec<&'static str> {
        let mut set: Vec<_> = STATE_TAGS
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .collect();
        set.sort_by_key(|(_, bit)| bit.bits());
        set.into_iter().map(|(t, _)| *t).collect()
    }
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = self.tags();
        if tags.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&tags.join("|"))
    }
}

impl FromStr for MotorState {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_attribute(s)
    }
}

/// Motor polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Normal,
    Inversed,
}

impl Polarity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Inversed => "inversed",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "inversed" => Ok(Self::Inversed),
            _ => Err(UnknownToken {
                what: "polarity",
                token: s.to_owned(),
                valid: vec!["inversed".to_owned(), "normal".to_owned()],
            }),
        }
    }
}
