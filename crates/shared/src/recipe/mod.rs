use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of numbered ingredient/measure field pairs in a catalog record.
pub const INGREDIENT_FIELDS: usize = 20;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngredientLine {
    pub ingredient: Option<String>,
    pub measure: Option<String>,
}

impl IngredientLine {
    /// `"<measure> <ingredient>"`, or `None` when the ingredient is blank.
    pub fn display(&self) -> Option<String> {
        let ingredient = non_blank(self.ingredient.as_deref())?;

        Some(match non_blank(self.measure.as_deref()) {
            Some(measure) => format!("{measure} {ingredient}"),
            None => ingredient.to_owned(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A catalog recipe, referenced but never modified by the application.
///
/// Serializes to the catalog's own record shape (`idMeal`, `strMeal`,
/// `strIngredient1`...) so persisted values stay readable by any consumer of
/// that API. Fields this type does not model are carried along untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "MealRecord", into = "MealRecord")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub lines: [IngredientLine; INGREDIENT_FIELDS],
    extra: Map<String, Value>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: None,
            category: None,
            area: None,
            instructions: None,
            lines: Default::default(),
            extra: Map::new(),
        }
    }

    /// Display lines for every non-blank ingredient, in field order.
    ///
    /// Computed on each call; nothing is cached.
    pub fn ingredients(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().filter_map(IngredientLine::display)
    }

    /// Abbreviated records (filter results) carry no instructions.
    pub fn is_complete(&self) -> bool {
        self.instructions.is_some()
    }
}

#[derive(Serialize, Deserialize)]
struct MealRecord {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strMealThumb", default, skip_serializing_if = "Option::is_none")]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(rename = "strArea", default, skip_serializing_if = "Option::is_none")]
    area: Option<String>,
    #[serde(rename = "strInstructions", default, skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

impl From<MealRecord> for Recipe {
    fn from(mut record: MealRecord) -> Self {
        let mut lines: [IngredientLine; INGREDIENT_FIELDS] = Default::default();

        for (i, line) in lines.iter_mut().enumerate() {
            let position = i + 1;
            line.ingredient = take_string(&mut record.fields, &format!("strIngredient{position}"));
            line.measure = take_string(&mut record.fields, &format!("strMeasure{position}"));
        }

        Self {
            id: record.id,
            name: record.name,
            thumbnail: record.thumbnail,
            category: record.category,
            area: record.area,
            instructions: record.instructions,
            lines,
            extra: record.fields,
        }
    }
}

impl From<Recipe> for MealRecord {
    fn from(recipe: Recipe) -> Self {
        let mut fields = recipe.extra;

        for (i, line) in recipe.lines.into_iter().enumerate() {
            let position = i + 1;

            if let Some(ingredient) = line.ingredient {
                fields.insert(format!("strIngredient{position}"), Value::String(ingredient));
            }

            if let Some(measure) = line.measure {
                fields.insert(format!("strMeasure{position}"), Value::String(measure));
            }
        }

        Self {
            id: recipe.id,
            name: recipe.name,
            thumbnail: recipe.thumbnail,
            category: recipe.category,
            area: recipe.area,
            instructions: recipe.instructions,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ingredients_skip_blank_fields() {
        let recipe: Recipe = serde_json::from_value(json!({
            "idMeal": "1",
            "strMeal": "Pancakes",
            "strIngredient1": "Flour",
            "strIngredient2": "",
            "strIngredient3": "  ",
            "strIngredient4": "Egg",
            "strMeasure1": "2 cups",
            "strMeasure2": "1",
            "strMeasure3": "",
            "strMeasure4": "1",
        }))
        .unwrap();

        let lines = recipe.ingredients().collect::<Vec<_>>();

        assert_eq!(lines, vec!["2 cups Flour", "1 Egg"]);
        // restartable
        assert_eq!(recipe.ingredients().count(), 2);
    }

    #[test]
    fn test_ingredients_null_fields_and_blank_measure() {
        let recipe: Recipe = serde_json::from_value(json!({
            "idMeal": "2",
            "strMeal": "Toast",
            "strIngredient1": null,
            "strIngredient2": "Bread",
            "strMeasure2": null,
            "strIngredient20": "Butter",
            "strMeasure20": "1 tbs",
        }))
        .unwrap();

        assert_eq!(
            recipe.ingredients().collect::<Vec<_>>(),
            vec!["Bread", "1 tbs Butter"]
        );
    }

    #[test]
    fn test_abbreviated_record() {
        let recipe: Recipe = serde_json::from_value(json!({
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
            "idMeal": "52772"
        }))
        .unwrap();

        assert_eq!(recipe.id, "52772");
        assert!(!recipe.is_complete());
        assert_eq!(recipe.ingredients().count(), 0);
    }

    #[test]
    fn test_persisted_shape_matches_catalog_record() {
        let value = json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350.",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s"
        });

        let recipe: Recipe = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(recipe.area.as_deref(), Some("Japanese"));

        assert_eq!(serde_json::to_value(&recipe).unwrap(), value);
    }
}
