use mealdeck_mealplan::{MealPlan, Planner, Plans, WeekDocument};
use mealdeck_shared::{
    mealplan::{Day, Slot, WeekKey},
    recipe::Recipe,
};
use mealdeck_store::{FileStore, KeyValueStore, MEAL_PLANS, MemoryStore, SharedStore};
use std::sync::Arc;
use temp_dir::TempDir;
use time::macros::date;

fn teriyaki() -> Recipe {
    serde_json::from_str(r#"{"idMeal":"52772","strMeal":"Teriyaki Chicken"}"#).unwrap()
}

#[test]
fn test_send_then_reload_reproduces_cell() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store: SharedStore = Arc::new(FileStore::open(dir.path())?);

    let mut plans = Plans::hydrate(store.clone());
    let (week, day) = plans.send(date!(2024 - 06 - 06), Slot::Dinner, teriyaki())?;
    assert_eq!(day, Day::Thursday);
    assert_eq!(week.to_string(), "2024-06-03");

    let planner = Planner::new(week);
    planner.assign(&mut plans, Day::Tuesday, Slot::Dinner, teriyaki())?;

    let raw = store.get(MEAL_PLANS)?.unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(
        value["2024-06-03"]["Tuesday"]["dinner"],
        serde_json::json!([{"idMeal": "52772", "strMeal": "Teriyaki Chicken"}])
    );

    let reloaded = Plans::hydrate(store);
    let before = planner.grid(&plans.week(week));
    let after = planner.grid(&reloaded.week(week));
    assert_eq!(before, after);
    assert_eq!(after[1].cells[2].recipes, vec![teriyaki()]);

    Ok(())
}

#[test]
fn test_unassign_after_assign_clears_every_copy() -> anyhow::Result<()> {
    let mut plans = Plans::hydrate(Arc::new(MemoryStore::default()));
    let planner = Planner::new(WeekKey::of(date!(2024 - 06 - 03)));

    for _ in 0..3 {
        planner.assign(&mut plans, Day::Friday, Slot::Breakfast, teriyaki())?;
    }
    planner.assign(&mut plans, Day::Friday, Slot::Breakfast, Recipe::new("1", "Oats"))?;

    let removed = planner.unassign(&mut plans, Day::Friday, Slot::Breakfast, "52772")?;
    assert_eq!(removed, 3);

    let week = plans.week(planner.week());
    let left = week.slot(Day::Friday, Slot::Breakfast);
    assert!(left.iter().all(|r| r.id != "52772"));
    assert_eq!(left.len(), 1);

    Ok(())
}

#[test]
fn test_weeks_do_not_leak_into_each_other() -> anyhow::Result<()> {
    let mut plans = Plans::hydrate(Arc::new(MemoryStore::default()));
    let mut planner = Planner::new(WeekKey::of(date!(2024 - 06 - 03)));

    planner.assign(&mut plans, Day::Monday, Slot::Lunch, teriyaki())?;
    planner.set_week(date!(2024 - 06 - 12));
    assert_eq!(planner.week().to_string(), "2024-06-10");

    let document = planner.export_document(&plans);
    assert!(document.is_empty());
    assert_eq!(document.filename(), "meal-plan-2024-06-10.pdf");

    let earlier = WeekKey::of(date!(2024 - 06 - 03));
    assert!(!WeekDocument::new(earlier, &plans.week(earlier)).is_empty());

    Ok(())
}

#[test]
fn test_malformed_plan_hydrates_empty() {
    let store = MemoryStore::default().with(MEAL_PLANS, r#"{"2024-06-03":{"Funday":{}}}"#);
    let plans = Plans::hydrate(Arc::new(store));

    assert_eq!(plans.plan(), &MealPlan::default());
}
