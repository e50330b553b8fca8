use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nutrition_tracker_server::{
    models::{Meal, MealFoodEntry},
    services::aggregator::aggregate,
};
use uuid::Uuid;

fn create_day(meal_count: usize, foods_per_meal: usize) -> (Vec<Meal>, Vec<MealFoodEntry>) {
    let user_id = Uuid::new_v4();
    let meals: Vec<Meal> = (0..meal_count)
        .map(|i| Meal {
            id: Uuid::new_v4(),
            user_id,
            meal_type: format!("Meal {}", i),
            order_number: i as i32,
            created_at: Utc::now(),
        })
        .collect();

    let entries = meals
        .iter()
        .flat_map(|meal| {
            (0..foods_per_meal).map(move |j| MealFoodEntry {
                id: Uuid::new_v4(),
                meal_id: meal.id,
                meal_type: meal.meal_type.clone(),
                owner_id: user_id,
                food_id: Uuid::new_v4(),
                food_name: format!("Food {}", j),
                grams_quantity: 25.0 + j as f64,
                calories: 100.0 + j as f64,
                carbs: 10.0,
                protein: 5.0,
                fats: 2.5,
                created_at: Utc::now(),
            })
        })
        .collect();

    (meals, entries)
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for (meals, foods) in [(3, 5), (6, 20), (10, 100)] {
        let (meal_rows, entries) = create_day(meals, foods);

        group.bench_with_input(
            BenchmarkId::new("meals_x_foods", format!("{}x{}", meals, foods)),
            &(meal_rows, entries),
            |b, (meal_rows, entries)| {
                b.iter(|| aggregate(black_box("alice"), black_box(meal_rows), black_box(entries)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
