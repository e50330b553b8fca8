use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use utoipa::ToSchema;

/// Grams that the stored per-food values refer to.
pub const REFERENCE_GRAMS: f64 = 100.0;

/// Calories, carbs, protein and fats, either per 100 g of a food or an
/// absolute amount for a consumed quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Macros {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fats: f64,
}

impl Macros {
    pub fn new(calories: f64, carbs: f64, protein: f64, fats: f64) -> Self {
        Self { calories, carbs, protein, fats }
    }

    /// Scales per-100 g values to the given quantity: `value * grams / 100`.
    pub fn for_quantity(&self, grams: f64) -> Self {
        Self {
            calories: self.calories * grams / REFERENCE_GRAMS,
            carbs: self.carbs * grams / REFERENCE_GRAMS,
            protein: self.protein * grams / REFERENCE_GRAMS,
            fats: self.fats * grams / REFERENCE_GRAMS,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("calories", self.calories),
            ("carbs", self.carbs),
            ("protein", self.protein),
            ("fats", self.fats),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }
        Ok(())
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            calories: self.calories + other.calories,
            carbs: self.carbs + other.carbs,
            protein: self.protein + other.protein,
            fats: self.fats + other.fats,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, other: Macros) {
        *self = *self + other;
    }
}

impl Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Macros {
        iter.fold(Macros::default(), Add::add)
    }
}
