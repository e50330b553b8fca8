//! Ownership-based authorization shared by every detail view and mutation.

use std::fmt;
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    middleware::auth::AuthenticatedUser,
    models::{Food, Meal, MealFoodEntry, User},
};

/// A resource that belongs to exactly one user.
pub trait Owned {
    /// Noun used in denial messages.
    const KIND: &'static str;

    fn owner_id(&self) -> Uuid;
}

impl Owned for Food {
    const KIND: &'static str = "food";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Meal {
    const KIND: &'static str = "meal";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for MealFoodEntry {
    const KIND: &'static str = "meal food";

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

impl Owned for User {
    const KIND: &'static str = "user's meals";

    fn owner_id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Update,
    Delete,
    /// Referencing the resource from another one, e.g. a meal food pointing at a food.
    Use,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::View => "view",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Use => "use",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Only the owner may act on a resource, whatever the action.
pub fn decide<R: Owned>(actor_id: Uuid, _action: Action, resource: &R) -> Decision {
    if resource.owner_id() == actor_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

pub fn authorize<R: Owned>(actor: &AuthenticatedUser, action: Action, resource: &R) -> Result<()> {
    match decide(actor.id, action, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::warn!(
                actor = %actor.username,
                kind = R::KIND,
                %action,
                "permission denied"
            );
            Err(AppError::Forbidden(format!(
                "You do not have permission to {} this {}.",
                action,
                R::KIND
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn food_owned_by(user_id: Uuid) -> Food {
        Food {
            id: Uuid::new_v4(),
            user_id,
            name: "Egg".to_string(),
            calories: 155.0,
            carbs: 1.1,
            protein: 13.0,
            fats: 11.0,
            created_at: Utc::now(),
        }
    }

    fn actor(id: Uuid) -> AuthenticatedUser {
        AuthenticatedUser { id, username: "alice".to_string() }
    }

    #[test]
    fn test_owner_is_allowed() {
        let owner = Uuid::new_v4();
        let food = food_owned_by(owner);

        for action in [Action::View, Action::Update, Action::Delete, Action::Use] {
            assert_eq!(decide(owner, action, &food), Decision::Allow);
            assert!(authorize(&actor(owner), action, &food).is_ok());
        }
    }

    #[test]
    fn test_other_user_is_denied() {
        let food = food_owned_by(Uuid::new_v4());
        let err = authorize(&actor(Uuid::new_v4()), Action::Delete, &food).unwrap_err();

        match err {
            AppError::Forbidden(msg) => {
                assert_eq!(msg, "You do not have permission to delete this food.")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_meal_food_ownership_follows_meal() {
        let owner = Uuid::new_v4();
        let entry = MealFoodEntry {
            id: Uuid::new_v4(),
            meal_id: Uuid::new_v4(),
            meal_type: "Breakfast".to_string(),
            owner_id: owner,
            food_id: Uuid::new_v4(),
            food_name: "Egg".to_string(),
            grams_quantity: 50.0,
            calories: 155.0,
            carbs: 1.1,
            protein: 13.0,
            fats: 11.0,
            created_at: Utc::now(),
        };

        assert_eq!(decide(owner, Action::View, &entry), Decision::Allow);
        assert_eq!(decide(Uuid::new_v4(), Action::View, &entry), Decision::Deny);
    }
}
