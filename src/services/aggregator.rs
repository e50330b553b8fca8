//! Per-meal and overall macronutrient totals for a user.
//!
//! Every meal food contributes `food_value * grams / 100` for each nutrient.
//! A meal's totals are the sum of its entries and the overall total is the sum
//! of the meal totals. Breakdown entries are keyed by meal food, so the same
//! food logged twice at the same quantity shows up twice.

use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    database::queries::{MealFoodQueries, MealQueries, UserQueries},
    errors::{AppError, Result},
    models::{Macros, Meal, MealFoodEntry, User},
};

#[derive(Debug, Clone, Serialize)]
pub struct FoodBreakdown {
    pub meal_food_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub grams_quantity: f64,
    pub nutrients: Macros,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealSummary {
    pub meal_id: Uuid,
    pub meal_type: String,
    pub order_number: i32,
    pub totals: Macros,
    pub foods: Vec<FoodBreakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyMacronutrients {
    pub username: String,
    /// Ordered by the meals' order number, then meal type.
    pub meals: Vec<MealSummary>,
    pub overall_total: Macros,
}

impl DailyMacronutrients {
    pub fn meal(&self, meal_type: &str) -> Option<&MealSummary> {
        self.meals.iter().find(|meal| meal.meal_type == meal_type)
    }
}

/// Builds the summary from already loaded rows. Entries pointing at a meal
/// that is not in `meals` are ignored.
pub fn aggregate(username: &str, meals: &[Meal], entries: &[MealFoodEntry]) -> DailyMacronutrients {
    let mut entries_by_meal: HashMap<Uuid, Vec<&MealFoodEntry>> = HashMap::new();
    for entry in entries {
        entries_by_meal.entry(entry.meal_id).or_default().push(entry);
    }

    let mut overall_total = Macros::default();
    let summaries = meals
        .iter()
        .map(|meal| {
            let foods: Vec<FoodBreakdown> = entries_by_meal
                .get(&meal.id)
                .map(|entries| {
                    entries
                        .iter()
                        .map(|entry| FoodBreakdown {
                            meal_food_id: entry.id,
                            food_id: entry.food_id,
                            food_name: entry.food_name.clone(),
                            grams_quantity: entry.grams_quantity,
                            nutrients: entry.nutrients(),
                        })
                        .collect()
                })
                .unwrap_or_default();

            let totals: Macros = foods.iter().map(|food| food.nutrients).sum();
            overall_total += totals;

            MealSummary {
                meal_id: meal.id,
                meal_type: meal.meal_type.clone(),
                order_number: meal.order_number,
                totals,
                foods,
            }
        })
        .collect();

    DailyMacronutrients {
        username: username.to_string(),
        meals: summaries,
        overall_total,
    }
}

pub struct MacroAggregator;

impl MacroAggregator {
    pub async fn find_user(pool: &SqlitePool, username: &str) -> Result<User> {
        UserQueries::find_by_username(pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }

    pub async fn summarize(pool: &SqlitePool, user: &User) -> Result<DailyMacronutrients> {
        let meals = MealQueries::list_by_owner(pool, user.id).await?;
        let entries = MealFoodQueries::list_entries_by_owner(pool, user.id).await?;

        tracing::debug!(
            username = %user.username,
            meals = meals.len(),
            entries = entries.len(),
            "aggregating macronutrients"
        );

        Ok(aggregate(&user.username, &meals, &entries))
    }

    /// Summary for `username`, or `NotFound` when no such user exists.
    pub async fn for_username(pool: &SqlitePool, username: &str) -> Result<DailyMacronutrients> {
        let user = Self::find_user(pool, username).await?;
        Self::summarize(pool, &user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn meal(user_id: Uuid, meal_type: &str, order_number: i32) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            user_id,
            meal_type: meal_type.to_string(),
            order_number,
            created_at: Utc::now(),
        }
    }

    fn entry(meal: &Meal, food_id: Uuid, name: &str, per_100g: Macros, grams: f64) -> MealFoodEntry {
        MealFoodEntry {
            id: Uuid::new_v4(),
            meal_id: meal.id,
            meal_type: meal.meal_type.clone(),
            owner_id: meal.user_id,
            food_id,
            food_name: name.to_string(),
            grams_quantity: grams,
            calories: per_100g.calories,
            carbs: per_100g.carbs,
            protein: per_100g.protein,
            fats: per_100g.fats,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_breakfast_example() {
        let user = Uuid::new_v4();
        let breakfast = meal(user, "Breakfast", 1);
        let entries = vec![
            entry(&breakfast, Uuid::new_v4(), "Egg", Macros::new(155.0, 1.1, 13.0, 11.0), 50.0),
            entry(&breakfast, Uuid::new_v4(), "Toast", Macros::new(265.0, 49.0, 9.0, 3.2), 30.0),
        ];

        let summary = aggregate("alice", &[breakfast], &entries);
        let breakfast = summary.meal("Breakfast").unwrap();

        assert_eq!(breakfast.totals.calories, 157.0);
        assert_eq!(breakfast.foods[0].nutrients.calories, 77.5);
        assert_eq!(breakfast.foods[1].nutrients.calories, 79.5);
        assert_eq!(summary.overall_total.calories, 157.0);
    }

    #[test]
    fn test_overall_total_is_sum_of_meal_totals() {
        let user = Uuid::new_v4();
        let breakfast = meal(user, "Breakfast", 1);
        let lunch = meal(user, "Lunch", 2);
        let rice = Macros::new(130.0, 28.0, 2.7, 0.3);
        let chicken = Macros::new(165.0, 0.0, 31.0, 3.6);
        let entries = vec![
            entry(&breakfast, Uuid::new_v4(), "Oats", Macros::new(389.0, 66.0, 17.0, 7.0), 40.0),
            entry(&lunch, Uuid::new_v4(), "Rice", rice, 200.0),
            entry(&lunch, Uuid::new_v4(), "Chicken", chicken, 150.0),
        ];

        let summary = aggregate("alice", &[breakfast, lunch], &entries);
        let meal_sum: Macros = summary.meals.iter().map(|m| m.totals).sum();

        assert_eq!(summary.overall_total, meal_sum);
        let lunch = summary.meal("Lunch").unwrap();
        assert_eq!(lunch.totals, rice.for_quantity(200.0) + chicken.for_quantity(150.0));
    }

    #[test]
    fn test_duplicate_food_and_quantity_are_kept_separately() {
        let user = Uuid::new_v4();
        let dinner = meal(user, "Dinner", 3);
        let bread = Uuid::new_v4();
        let per_100g = Macros::new(265.0, 49.0, 9.0, 3.2);
        let entries = vec![
            entry(&dinner, bread, "Bread", per_100g, 30.0),
            entry(&dinner, bread, "Bread", per_100g, 30.0),
        ];

        let summary = aggregate("alice", &[dinner], &entries);
        let dinner = summary.meal("Dinner").unwrap();

        assert_eq!(dinner.foods.len(), 2);
        assert_ne!(dinner.foods[0].meal_food_id, dinner.foods[1].meal_food_id);
        assert_eq!(dinner.totals.calories, 159.0);
    }

    #[test]
    fn test_meal_without_foods_has_zero_totals() {
        let snack = meal(Uuid::new_v4(), "Snack", 4);
        let summary = aggregate("alice", &[snack], &[]);

        assert_eq!(summary.meals.len(), 1);
        assert!(summary.meals[0].foods.is_empty());
        assert_eq!(summary.meals[0].totals, Macros::default());
        assert_eq!(summary.overall_total, Macros::default());
    }

    #[test]
    fn test_entries_for_unknown_meals_are_ignored() {
        let user = Uuid::new_v4();
        let breakfast = meal(user, "Breakfast", 1);
        let other = meal(user, "Other", 2);
        let entries = vec![entry(&other, Uuid::new_v4(), "Egg", Macros::new(155.0, 1.1, 13.0, 11.0), 100.0)];

        let summary = aggregate("alice", &[breakfast], &entries);
        assert_eq!(summary.overall_total, Macros::default());
    }
}
