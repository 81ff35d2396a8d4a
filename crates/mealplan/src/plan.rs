use mealdeck_shared::{
    mealplan::{Day, Slot, WeekKey, parse_date},
    recipe::Recipe,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Recipes assigned to each day and slot of one week.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekPlan(BTreeMap<Day, BTreeMap<Slot, Vec<Recipe>>>);

impl WeekPlan {
    /// Recipes in the cell, in the order they were assigned.
    pub fn slot(&self, day: Day, slot: Slot) -> &[Recipe] {
        self.0
            .get(&day)
            .and_then(|slots| slots.get(&slot))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends to the cell. The same recipe may be assigned more than once.
    pub fn assign(&mut self, day: Day, slot: Slot, recipe: Recipe) {
        self.0
            .entry(day)
            .or_default()
            .entry(slot)
            .or_default()
            .push(recipe);
    }

    /// Drops every entry of the cell with this id and returns how many went.
    pub fn unassign(&mut self, day: Day, slot: Slot, id: &str) -> usize {
        let Some(recipes) = self.0.get_mut(&day).and_then(|slots| slots.get_mut(&slot)) else {
            return 0;
        };

        let before = recipes.len();
        recipes.retain(|r| r.id != id);

        before - recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0
            .values()
            .all(|slots| slots.values().all(Vec::is_empty))
    }

    /// Appends every cell of `other` after the cells already held.
    pub fn absorb(&mut self, other: WeekPlan) {
        for (day, slots) in other.0 {
            let target = self.0.entry(day).or_default();
            for (slot, recipes) in slots {
                target.entry(slot).or_default().extend(recipes);
            }
        }
    }
}

/// Every planned week, keyed by its Monday.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MealPlan(BTreeMap<WeekKey, WeekPlan>);

impl MealPlan {
    pub fn week(&self, week: WeekKey) -> Option<&WeekPlan> {
        self.0.get(&week)
    }

    pub fn assign(&mut self, week: WeekKey, day: Day, slot: Slot, recipe: Recipe) {
        self.0.entry(week).or_default().assign(day, slot, recipe);
    }

    pub fn unassign(&mut self, week: WeekKey, day: Day, slot: Slot, id: &str) -> usize {
        self.0
            .get_mut(&week)
            .map(|plan| plan.unassign(day, slot, id))
            .unwrap_or_default()
    }

    /// Assigns to the cell of the week and weekday `date` falls on.
    pub fn send(&mut self, date: Date, slot: Slot, recipe: Recipe) -> (WeekKey, Day) {
        let week = WeekKey::of(date);
        let day = Day::of(date);
        self.assign(week, day, slot, recipe);

        (week, day)
    }
}

impl<'de> Deserialize<'de> for MealPlan {
    /// Keys written on a day other than Monday are folded into the week they
    /// fall in rather than replacing it.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, WeekPlan>::deserialize(deserializer)?;
        let mut weeks = BTreeMap::<WeekKey, WeekPlan>::new();

        for (key, plan) in raw {
            let date = parse_date(&key).map_err(serde::de::Error::custom)?;
            let week = WeekKey::of(date);

            if week.start() != date {
                tracing::warn!(key = %key, %week, "Week key is not a Monday, merging");
            }

            weeks.entry(week).or_default().absorb(plan);
        }

        Ok(Self(weeks))
    }
}
