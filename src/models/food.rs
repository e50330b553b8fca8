use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Macros;

pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fats: f64,
    pub created_at: DateTime<Utc>,
}

impl Food {
    /// Per-100 g values.
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.carbs, self.protein, self.fats)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FoodInput {
    pub name: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fats: f64,
}

impl FoodInput {
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.carbs, self.protein, self.fats)
    }

    /// Trims the name and checks every field, returning the cleaned input.
    pub fn validated(self) -> Result<Self, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Food name is required".to_string());
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(format!("Food name must be at most {} characters", MAX_NAME_LENGTH));
        }
        self.macros().validate()?;

        Ok(Self { name, ..self })
    }
}

/// Entry of the shared catalog users can copy foods from.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommonFood {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fats: f64,
}

#[derive(Debug, Serialize)]
pub struct CommonFoodListing {
    #[serde(flatten)]
    pub food: CommonFood,
    pub is_in_my_foods: bool,
}
