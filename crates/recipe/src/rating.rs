use mealdeck_shared::invalid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// A star rating, always within `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    pub fn new(value: u8) -> mealdeck_shared::Result<Self> {
        if !(MIN_STARS..=MAX_STARS).contains(&value) {
            invalid!("rating must be between {MIN_STARS} and {MAX_STARS}, got {value}");
        }

        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = mealdeck_shared::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(value: Stars) -> Self {
        value.0
    }
}

/// Recipe id to its latest rating.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratings(BTreeMap<String, Stars>);

impl Ratings {
    pub fn rate(&mut self, id: impl Into<String>, stars: Stars) {
        self.0.insert(id.into(), stars);
    }

    pub fn get(&self, id: &str) -> Option<Stars> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
