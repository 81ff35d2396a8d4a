use mealdeck_shared::mealplan::{Day, Slot, WeekKey, short_date};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

use crate::WeekPlan;

pub const DOCUMENT_TITLE: &str = "Weekly Meal Plan";

#[derive(
    EnumString, Display, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PageFormat {
    #[default]
    Letter,
    A4,
}

impl PageFormat {
    /// Portrait width and height in millimetres.
    pub fn size_mm(self) -> (f32, f32) {
        match self {
            PageFormat::Letter => (215.9, 279.4),
            PageFormat::A4 => (210.0, 297.0),
        }
    }
}

#[derive(
    EnumString, Display, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Page margin in inches, applied on every side.
    pub margin_in: f32,
    pub page_format: PageFormat,
    pub orientation: Orientation,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin_in: 0.5,
            page_format: PageFormat::default(),
            orientation: Orientation::default(),
        }
    }
}

impl ExportOptions {
    /// Page width and height in millimetres, after orientation.
    pub fn page_mm(&self) -> (f32, f32) {
        let (w, h) = self.page_format.size_mm();

        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn margin_mm(&self) -> f32 {
        self.margin_in * 25.4
    }
}

pub fn filename(week: WeekKey) -> String {
    format!("meal-plan-{week}.pdf")
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentMeal {
    pub name: String,
    pub thumbnail: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSlot {
    pub slot: Slot,
    pub heading: String,
    pub meals: Vec<DocumentMeal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentDay {
    pub day: Day,
    /// `Tuesday – Jun 4`
    pub heading: String,
    /// Slots holding at least one recipe.
    pub slots: Vec<DocumentSlot>,
}

/// Print-oriented rendition of one whole week, shared by the HTML print view
/// and the PDF export.
#[derive(Clone, Debug, PartialEq)]
pub struct WeekDocument {
    pub week: WeekKey,
    pub title: String,
    /// `Week of Jun 3 – Jun 9, 2024`
    pub range: String,
    pub days: Vec<DocumentDay>,
}

impl WeekDocument {
    pub fn new(week: WeekKey, plan: &WeekPlan) -> Self {
        let days = week
            .days()
            .map(|(day, date)| DocumentDay {
                day,
                heading: format!("{day} – {}", short_date(date)),
                slots: Slot::VARIANTS
                    .iter()
                    .filter_map(|slot| {
                        let recipes = plan.slot(day, *slot);

                        if recipes.is_empty() {
                            return None;
                        }

                        Some(DocumentSlot {
                            slot: *slot,
                            heading: format!("{} {}", slot.emoji(), slot.title()),
                            meals: recipes
                                .iter()
                                .map(|recipe| DocumentMeal {
                                    name: recipe.name.clone(),
                                    thumbnail: recipe.thumbnail.clone(),
                                    ingredients: recipe.ingredients().collect(),
                                    instructions: recipe.instructions.clone(),
                                })
                                .collect(),
                        })
                    })
                    .collect(),
            })
            .collect();

        Self {
            week,
            title: DOCUMENT_TITLE.to_owned(),
            range: format!("Week of {}", week.range_label()),
            days,
        }
    }

    pub fn filename(&self) -> String {
        filename(self.week)
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.slots.is_empty())
    }
}
