use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{food::MAX_NAME_LENGTH, Macros};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: String,
    pub order_number: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MealInput {
    pub meal_type: String,
    #[serde(default)]
    pub order_number: i32,
}

impl MealInput {
    pub fn validated(self) -> Result<Self, String> {
        let meal_type = self.meal_type.trim().to_string();
        if meal_type.is_empty() {
            return Err("Meal type is required".to_string());
        }
        if meal_type.chars().count() > MAX_NAME_LENGTH {
            return Err(format!("Meal type must be at most {} characters", MAX_NAME_LENGTH));
        }
        if self.order_number < 0 {
            return Err("Order number must not be negative".to_string());
        }

        Ok(Self { meal_type, ..self })
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MealFood {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub grams_quantity: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MealFoodInput {
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub grams_quantity: f64,
}

impl MealFoodInput {
    pub fn validate(&self) -> Result<(), String> {
        if !self.grams_quantity.is_finite() || self.grams_quantity <= 0.0 {
            return Err("Grams quantity must be a positive number".to_string());
        }
        Ok(())
    }
}

/// A meal food joined with its meal and food, as used by detail views and the
/// aggregator. `owner_id` is the owner of the meal.
#[derive(Debug, Clone, FromRow)]
pub struct MealFoodEntry {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub meal_type: String,
    pub owner_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub grams_quantity: f64,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fats: f64,
    pub created_at: DateTime<Utc>,
}

impl MealFoodEntry {
    /// Nutrients contributed by this entry's quantity of food.
    pub fn nutrients(&self) -> Macros {
        Macros::new(self.calories, self.carbs, self.protein, self.fats).for_quantity(self.grams_quantity)
    }
}

#[derive(Debug, Serialize)]
pub struct MealFoodResponse {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub meal_type: String,
    pub food_id: Uuid,
    pub food_name: String,
    pub grams_quantity: f64,
    pub nutrients: Macros,
    pub created_at: DateTime<Utc>,
}

impl From<MealFoodEntry> for MealFoodResponse {
    fn from(entry: MealFoodEntry) -> Self {
        let nutrients = entry.nutrients();
        Self {
            id: entry.id,
            meal_id: entry.meal_id,
            meal_type: entry.meal_type,
            food_id: entry.food_id,
            food_name: entry.food_name,
            grams_quantity: entry.grams_quantity,
            nutrients,
            created_at: entry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_input_validation() {
        let meal = MealInput { meal_type: " Breakfast ".into(), order_number: 1 }.validated().unwrap();
        assert_eq!(meal.meal_type, "Breakfast");

        assert!(MealInput { meal_type: "".into(), order_number: 1 }.validated().is_err());
        assert!(MealInput { meal_type: "Lunch".into(), order_number: -1 }.validated().is_err());
    }

    #[test]
    fn test_grams_must_be_positive() {
        let mut input = MealFoodInput { meal_id: Uuid::new_v4(), food_id: Uuid::new_v4(), grams_quantity: 50.0 };
        assert!(input.validate().is_ok());
        input.grams_quantity = 0.0;
        assert!(input.validate().is_err());
    }
}
