//! The built-in meal-plan generator and its diet filter.
//!
//! Used when no language model is available. Recipes come from a
//! small static set chosen by diet, and days alternate through the set
//! deterministically: two recipes per day, plus a simple breakfast on
//! every other day.

use crate::proposals::{Ingredient, MealDayProposal, MealProposal};
use crate::week::WEEK;

/// A recipe from the built-in set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    pub id: &'static str,
    pub name: &'static str,
    pub calories: i64,
    pub ingredients: &'static [&'static str],
}

const KETO_RECIPES: [Recipe; 2] = [
    Recipe {
        id: "k1",
        name: "Keto Egg Bowl",
        calories: 400,
        ingredients: &["eggs", "spinach", "cheese"],
    },
    Recipe {
        id: "k2",
        name: "Grilled Fish",
        calories: 450,
        ingredients: &["salmon", "oil", "greens"],
    },
];

const VEGAN_RECIPES: [Recipe; 2] = [
    Recipe {
        id: "v1",
        name: "Tofu Stir Fry",
        calories: 420,
        ingredients: &["tofu", "veggies", "soy sauce"],
    },
    Recipe {
        id: "v2",
        name: "Chickpea Salad",
        calories: 350,
        ingredients: &["chickpeas", "lettuce", "tomato"],
    },
];

const DEFAULT_RECIPES: [Recipe; 4] = [
    Recipe {
        id: "r1",
        name: "Veg Curry",
        calories: 450,
        ingredients: &["vegetables", "spice", "oil"],
    },
    Recipe {
        id: "r2",
        name: "Quinoa Salad",
        calories: 350,
        ingredients: &["quinoa", "greens", "tomato"],
    },
    Recipe {
        id: "r3",
        name: "Oat Porridge",
        calories: 300,
        ingredients: &["oats", "milk", "banana"],
    },
    Recipe {
        id: "r4",
        name: "Lentil Soup",
        calories: 380,
        ingredients: &["lentils", "onion", "spice"],
    },
];

const MEAT_KEYWORDS: [&str; 7] = [
    "chicken", "beef", "pork", "fish", "shrimp", "salmon", "bacon",
];
const NON_VEGAN_KEYWORDS: [&str; 7] = [
    "milk", "egg", "cheese", "butter", "honey", "yogurt", "paneer",
];
const HIGH_CARB_KEYWORDS: [&str; 5] = ["rice", "sugar", "oats", "quinoa", "potato"];

/// The recipe set for a diet. Matching is by substring, so
/// `"strict keto"` still selects the keto set; anything else gets the
/// vegetarian-leaning default set.
pub fn builtin_recipes(diet: Option<&str>) -> &'static [Recipe] {
    let diet = diet.map(str::to_lowercase);
    match diet.as_deref() {
        Some(d) if d.contains("keto") => &KETO_RECIPES,
        Some(d) if d.contains("vegan") => &VEGAN_RECIPES,
        _ => &DEFAULT_RECIPES,
    }
}

fn banned_keywords(diet: &str) -> &'static [&'static str] {
    match diet {
        "vegetarian" | "veg" => &MEAT_KEYWORDS,
        "vegan" => &NON_VEGAN_KEYWORDS,
        "keto" | "lowcarb" => &HIGH_CARB_KEYWORDS,
        _ => &[],
    }
}

/// Drops recipes whose name or ingredients mention a keyword the diet
/// rejects. Unknown diets reject nothing, and a filter that would
/// empty the list returns the original list instead so there is always
/// something to cook.
pub fn filter_recipes_by_diet(recipes: &[Recipe], diet: Option<&str>) -> Vec<Recipe> {
    let Some(diet) = diet else {
        return recipes.to_vec();
    };
    let diet = diet.trim().to_lowercase();
    if diet.is_empty() {
        return recipes.to_vec();
    }

    let banned = banned_keywords(&diet);
    let kept: Vec<Recipe> = recipes
        .iter()
        .filter(|recipe| {
            let haystack =
                format!("{} {}", recipe.name, recipe.ingredients.join(" ")).to_lowercase();
            !banned.iter().any(|keyword| haystack.contains(keyword))
        })
        .copied()
        .collect();

    if kept.is_empty() { recipes.to_vec() } else { kept }
}

/// Generates one meal day per plan day from the built-in recipes.
///
/// Day `d` takes recipes `2d` and `2d + 1` modulo the set size as
/// lunch and dinner, and even days open with a simple breakfast. A
/// vegan diet drops the milk from that breakfast. Nonpositive plan
/// lengths yield no days at all.
pub fn fallback_meal_plan(diet: Option<&str>, plan_days: i64) -> Vec<MealDayProposal> {
    let diet = diet.map(str::to_lowercase);
    let diet = diet.as_deref();
    let recipes = filter_recipes_by_diet(builtin_recipes(diet), diet);

    let days = usize::try_from(plan_days).unwrap_or(0);
    let mut day_plans = Vec::with_capacity(days.min(366));
    for d in 0..days {
        let idx_a = (d * 2) % recipes.len();
        let idx_b = (d * 2 + 1) % recipes.len();
        let lunch = &recipes[idx_a];
        let dinner = &recipes[if idx_b == idx_a { idx_a } else { idx_b }];

        let mut meals = Vec::new();
        if d % 2 == 0 {
            meals.push(simple_breakfast(d + 1, diet));
        }
        meals.push(meal_from(lunch, "lunch"));
        meals.push(meal_from(dinner, "dinner"));

        let total_calories = meals.iter().map(|meal| meal.calories).sum();
        day_plans.push(MealDayProposal {
            day_index: Some(i64::try_from(d + 1).unwrap_or(i64::MAX)),
            day_name: Some(WEEK[d % 7].as_str().to_string()),
            day: None,
            meals,
            total_calories,
        });
    }

    tracing::debug!(days = day_plans.len(), "generated fallback meal plan");
    day_plans
}

fn simple_breakfast(day_number: usize, diet: Option<&str>) -> MealProposal {
    let mut ingredients = vec![Ingredient::from("oats"), Ingredient::from("banana")];
    if !diet.is_some_and(|d| d.contains("vegan")) {
        ingredients.push(Ingredient::from("milk"));
    }
    MealProposal {
        kind: "breakfast".to_string(),
        name: format!("Simple Breakfast {day_number}"),
        recipe_id: format!("bf{day_number}"),
        calories: 250,
        ingredients,
        duration_minutes: None,
    }
}

fn meal_from(recipe: &Recipe, kind: &str) -> MealProposal {
    MealProposal {
        kind: kind.to_string(),
        name: recipe.name.to_string(),
        recipe_id: recipe.id.to_string(),
        calories: recipe.calories,
        ingredients: recipe
            .ingredients
            .iter()
            .map(|&name| Ingredient::from(name))
            .collect(),
        duration_minutes: None,
    }
}
