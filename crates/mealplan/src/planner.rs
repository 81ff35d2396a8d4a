use mealdeck_shared::{
    Result,
    mealplan::{Day, Slot, WeekKey, short_date},
    recipe::Recipe,
};
use strum::VariantArray;
use time::Date;

use crate::{Plans, WeekDocument, WeekPlan};

#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub slot: Slot,
    pub recipes: Vec<Recipe>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridColumn {
    pub day: Day,
    pub date: Date,
    /// `Jun 4`
    pub label: String,
    pub cells: Vec<GridCell>,
}

/// Planner screen state: which week is visible and which recipe, if any, is
/// open in the detail view. The grid itself is always derived from the
/// persisted plan.
#[derive(Clone, Debug)]
pub struct Planner {
    week: WeekKey,
    detail: Option<Recipe>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(WeekKey::current())
    }
}

impl Planner {
    pub fn new(week: WeekKey) -> Self {
        Self { week, detail: None }
    }

    pub fn week(&self) -> WeekKey {
        self.week
    }

    pub fn set_week(&mut self, date: Date) {
        self.week = WeekKey::of(date);
    }

    pub fn assign(&self, plans: &mut Plans, day: Day, slot: Slot, recipe: Recipe) -> Result<()> {
        plans.assign(self.week, day, slot, recipe)
    }

    pub fn unassign(&self, plans: &mut Plans, day: Day, slot: Slot, id: &str) -> Result<usize> {
        plans.unassign(self.week, day, slot, id)
    }

    pub fn view_detail(&mut self, recipe: Recipe) {
        self.detail = Some(recipe);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&Recipe> {
        self.detail.as_ref()
    }

    /// Seven columns, Monday first, each with the three slots in order.
    pub fn grid(&self, plan: &WeekPlan) -> Vec<GridColumn> {
        self.week
            .days()
            .map(|(day, date)| GridColumn {
                day,
                date,
                label: short_date(date),
                cells: Slot::VARIANTS
                    .iter()
                    .map(|slot| GridCell {
                        slot: *slot,
                        recipes: plan.slot(day, *slot).to_vec(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn export_document(&self, plans: &Plans) -> WeekDocument {
        WeekDocument::new(self.week, &plans.week(self.week))
    }
}
