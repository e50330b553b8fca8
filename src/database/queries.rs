use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::models::*;
use crate::errors::{AppError, Result};

/// Turns a unique-constraint violation into a user-facing validation error and
/// passes every other database error through.
fn map_unique_violation(err: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Validation(message())
        }
        _ => AppError::Database(err),
    }
}

pub struct UserQueries;

impl UserQueries {
    pub async fn create_user(
        pool: &SqlitePool,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Username '{}' is already taken", username)))?;

        Ok(user)
    }

    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

pub struct FoodQueries;

impl FoodQueries {
    pub async fn create_food(pool: &SqlitePool, owner_id: Uuid, input: &FoodInput) -> Result<Food> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            INSERT INTO foods (id, user_id, name, calories, carbs, protein, fats, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, name, calories, carbs, protein, fats, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&input.name)
        .bind(input.calories)
        .bind(input.carbs)
        .bind(input.protein)
        .bind(input.fats)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                format!("You already have a food '{}' added to food list.", input.name)
            })
        })?;

        Ok(food)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Food>> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, user_id, name, calories, carbs, protein, fats, created_at
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(food)
    }

    pub async fn list_by_owner(pool: &SqlitePool, owner_id: Uuid) -> Result<Vec<Food>> {
        let foods = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, user_id, name, calories, carbs, protein, fats, created_at
            FROM foods
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(foods)
    }

    pub async fn names_by_owner(pool: &SqlitePool, owner_id: Uuid) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM foods WHERE user_id = $1")
            .bind(owner_id)
            .fetch_all(pool)
            .await?;

        Ok(names)
    }

    pub async fn update_food(pool: &SqlitePool, id: Uuid, input: &FoodInput) -> Result<Food> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            UPDATE foods
            SET name = $1, calories = $2, carbs = $3, protein = $4, fats = $5
            WHERE id = $6
            RETURNING id, user_id, name, calories, carbs, protein, fats, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.calories)
        .bind(input.carbs)
        .bind(input.protein)
        .bind(input.fats)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                format!("You already have a food '{}' added to food list.", input.name)
            })
        })?
        .ok_or_else(|| AppError::NotFound("Food not found".to_string()))?;

        Ok(food)
    }

    pub async fn delete_food(pool: &SqlitePool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct MealQueries;

impl MealQueries {
    pub async fn create_meal(pool: &SqlitePool, owner_id: Uuid, input: &MealInput) -> Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, user_id, meal_type, order_number, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, meal_type, order_number, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&input.meal_type)
        .bind(input.order_number)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                format!("You already have a meal with name '{}'", input.meal_type)
            })
        })?;

        Ok(meal)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            "SELECT id, user_id, meal_type, order_number, created_at FROM meals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(meal)
    }

    pub async fn list_by_owner(pool: &SqlitePool, owner_id: Uuid) -> Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, meal_type, order_number, created_at
            FROM meals
            WHERE user_id = $1
            ORDER BY order_number, meal_type
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(meals)
    }

    pub async fn update_meal(pool: &SqlitePool, id: Uuid, input: &MealInput) -> Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
            SET meal_type = $1, order_number = $2
            WHERE id = $3
            RETURNING id, user_id, meal_type, order_number, created_at
            "#,
        )
        .bind(&input.meal_type)
        .bind(input.order_number)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                format!("You already have a meal with name '{}'", input.meal_type)
            })
        })?
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;

        Ok(meal)
    }

    pub async fn delete_meal(pool: &SqlitePool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

const MEAL_FOOD_ENTRY_SELECT: &str = r#"
    SELECT mf.id, mf.meal_id, m.meal_type, m.user_id AS owner_id,
           mf.food_id, f.name AS food_name, mf.grams_quantity,
           f.calories, f.carbs, f.protein, f.fats, mf.created_at
    FROM meal_foods mf
    JOIN meals m ON m.id = mf.meal_id
    JOIN foods f ON f.id = mf.food_id
"#;

pub struct MealFoodQueries;

impl MealFoodQueries {
    pub async fn create_meal_food(pool: &SqlitePool, input: &MealFoodInput) -> Result<MealFood> {
        let meal_food = sqlx::query_as::<_, MealFood>(
            r#"
            INSERT INTO meal_foods (id, meal_id, food_id, grams_quantity, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, meal_id, food_id, grams_quantity, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.meal_id)
        .bind(input.food_id)
        .bind(input.grams_quantity)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(meal_food)
    }

    pub async fn find_entry(pool: &SqlitePool, id: Uuid) -> Result<Option<MealFoodEntry>> {
        let sql = format!("{} WHERE mf.id = $1", MEAL_FOOD_ENTRY_SELECT);
        let entry = sqlx::query_as::<_, MealFoodEntry>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(entry)
    }

    /// All entries across the owner's meals, grouped by meal order and then
    /// insertion order.
    pub async fn list_entries_by_owner(pool: &SqlitePool, owner_id: Uuid) -> Result<Vec<MealFoodEntry>> {
        let sql = format!(
            "{} WHERE m.user_id = $1 ORDER BY m.order_number, m.meal_type, mf.created_at, mf.rowid",
            MEAL_FOOD_ENTRY_SELECT
        );
        let entries = sqlx::query_as::<_, MealFoodEntry>(&sql)
            .bind(owner_id)
            .fetch_all(pool)
            .await?;

        Ok(entries)
    }

    pub async fn update_meal_food(pool: &SqlitePool, id: Uuid, input: &MealFoodInput) -> Result<MealFood> {
        let meal_food = sqlx::query_as::<_, MealFood>(
            r#"
            UPDATE meal_foods
            SET meal_id = $1, food_id = $2, grams_quantity = $3
            WHERE id = $4
            RETURNING id, meal_id, food_id, grams_quantity, created_at
            "#,
        )
        .bind(input.meal_id)
        .bind(input.food_id)
        .bind(input.grams_quantity)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal food not found".to_string()))?;

        Ok(meal_food)
    }

    pub async fn delete_meal_food(pool: &SqlitePool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_foods WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct CommonFoodQueries;

impl CommonFoodQueries {
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<CommonFood>> {
        let foods = sqlx::query_as::<_, CommonFood>(
            "SELECT id, name, calories, carbs, protein, fats FROM common_foods ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(foods)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<CommonFood>> {
        let food = sqlx::query_as::<_, CommonFood>(
            "SELECT id, name, calories, carbs, protein, fats FROM common_foods WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(food)
    }
}
