use mealdeck_shared::{
    Result,
    mealplan::{Day, Slot, WeekKey},
    recipe::Recipe,
};
use mealdeck_store::{MEAL_PLANS, SharedStore};
use time::Date;

use crate::{MealPlan, WeekPlan};

/// The meal plan as shared by both screens, backed by the store.
pub struct Plans {
    store: SharedStore,
    plan: MealPlan,
}

impl Plans {
    pub fn hydrate(store: SharedStore) -> Self {
        let plan = mealdeck_store::load(store.as_ref(), MEAL_PLANS);

        Self { store, plan }
    }

    pub fn plan(&self) -> &MealPlan {
        &self.plan
    }

    /// The week's assignments, empty when nothing is planned for it.
    pub fn week(&self, week: WeekKey) -> WeekPlan {
        self.plan.week(week).cloned().unwrap_or_default()
    }

    #[tracing::instrument(skip(self, recipe), fields(id = %recipe.id))]
    pub fn assign(&mut self, week: WeekKey, day: Day, slot: Slot, recipe: Recipe) -> Result<()> {
        self.commit(|plan| plan.assign(week, day, slot, recipe))
    }

    #[tracing::instrument(skip(self))]
    pub fn unassign(&mut self, week: WeekKey, day: Day, slot: Slot, id: &str) -> Result<usize> {
        self.commit(|plan| plan.unassign(week, day, slot, id))
    }

    /// Assigns to the week and weekday `date` falls on.
    #[tracing::instrument(skip(self, recipe), fields(id = %recipe.id))]
    pub fn send(&mut self, date: Date, slot: Slot, recipe: Recipe) -> Result<(WeekKey, Day)> {
        self.commit(|plan| plan.send(date, slot, recipe))
    }

    fn commit<T>(&mut self, change: impl FnOnce(&mut MealPlan) -> T) -> Result<T> {
        let mut plan = self.plan.clone();
        let outcome = change(&mut plan);

        mealdeck_store::save(self.store.as_ref(), MEAL_PLANS, &plan)?;
        self.plan = plan;

        Ok(outcome)
    }
}
