//! Grocery cost estimation from a meal plan.
//!
//! Prices are a fixed table so budgets are reproducible. Each
//! occurrence of an ingredient across the plan counts as one unit;
//! quantities inside ingredient objects are advisory and do not
//! multiply cost.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::proposals::MealDayProposal;

/// Price applied to any ingredient missing from the table.
pub const DEFAULT_UNIT_PRICE: f64 = 2.0;

/// Unit price for a normalized (trimmed, lowercased) ingredient name.
pub fn unit_price(ingredient: &str) -> f64 {
    match ingredient {
        "rice" => 2.0,
        "vegetables" => 3.0,
        "spices" => 1.0,
        "greek yogurt" => 2.5,
        "berries" => 3.2,
        "quinoa" => 4.0,
        "greens" => 2.0,
        "tomato" => 1.0,
        "olive oil" => 5.0,
        "oats" => 1.5,
        "milk" => 1.2,
        "banana" => 0.5,
        "paneer" => 4.5,
        "lentils" => 2.5,
        "onion" => 0.8,
        "garlic" => 0.6,
        "soy sauce" => 1.3,
        "chicken" => 6.0,
        "egg" => 0.25,
        "broccoli" => 2.5,
        "carrot" => 1.2,
        "pasta" => 1.6,
        "tomato sauce" => 1.8,
        "black beans" => 1.5,
        "corn" => 1.2,
        "yogurt" => 2.3,
        "honey" => 3.5,
        _ => DEFAULT_UNIT_PRICE,
    }
}

/// One line of the tallied shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingItem {
    pub ingredient: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub cost: f64,
}

/// The budget attached to a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total: f64,
    pub within_budget: bool,
    pub shopping_list: Vec<String>,
    pub item_prices: BTreeMap<String, f64>,
}

impl Default for BudgetSummary {
    fn default() -> Self {
        Self {
            total: 0.0,
            within_budget: true,
            shopping_list: Vec::new(),
            item_prices: BTreeMap::new(),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tallies every ingredient occurrence in the plan into priced line
/// items, in first-seen order, and returns them with the rounded
/// total.
pub fn grocery_list(meal_days: &[MealDayProposal]) -> (Vec<ShoppingItem>, f64) {
    let mut items: Vec<ShoppingItem> = Vec::new();
    for day in meal_days {
        for meal in &day.meals {
            for ingredient in &meal.ingredients {
                let Some(name) = ingredient.name() else {
                    continue;
                };
                let name = name.trim().to_lowercase();
                if name.is_empty() {
                    continue;
                }
                if let Some(item) = items.iter_mut().find(|item| item.ingredient == name) {
                    item.quantity += 1;
                } else {
                    items.push(ShoppingItem {
                        ingredient: name,
                        quantity: 1,
                        unit_price: 0.0,
                        cost: 0.0,
                    });
                }
            }
        }
    }

    let mut total = 0.0;
    for item in &mut items {
        let unit = unit_price(&item.ingredient);
        item.unit_price = round2(unit);
        #[allow(clippy::cast_precision_loss)]
        let quantity = item.quantity as f64;
        item.cost = round2(unit * quantity);
        total += item.cost;
    }
    (items, round2(total))
}

/// Prices the plan's shopping list and compares it to the budget
/// limit. No limit means any total is within budget.
pub fn estimate_budget(meal_days: &[MealDayProposal], max_budget: Option<f64>) -> BudgetSummary {
    let (items, total) = grocery_list(meal_days);
    let within_budget = max_budget.is_none_or(|limit| total <= limit);
    let shopping_list: Vec<String> = items.iter().map(|item| item.ingredient.clone()).collect();
    let item_prices: BTreeMap<String, f64> = items
        .iter()
        .map(|item| (item.ingredient.clone(), item.unit_price))
        .collect();

    tracing::debug!(total, within_budget, items = items.len(), "estimated grocery budget");

    BudgetSummary {
        total,
        within_budget,
        shopping_list,
        item_prices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::fallback_meal_plan;
    use crate::proposals::{Ingredient, MealProposal};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn day_with_ingredients(ingredients: Vec<Ingredient>) -> MealDayProposal {
        MealDayProposal {
            meals: vec![MealProposal {
                ingredients,
                ..MealProposal::default()
            }],
            ..MealDayProposal::default()
        }
    }

    #[test]
    fn known_ingredients_use_the_table() {
        assert!(close(unit_price("chicken"), 6.0));
        assert!(close(unit_price("egg"), 0.25));
    }

    #[test]
    fn unknown_ingredients_cost_the_default() {
        assert!(close(unit_price("dragonfruit"), DEFAULT_UNIT_PRICE));
    }

    #[test]
    fn occurrences_tally_across_days_and_meals() {
        let plan = fallback_meal_plan(None, 3);
        let (items, total) = grocery_list(&plan);

        let oats = items.iter().find(|item| item.ingredient == "oats").unwrap();
        assert_eq!(oats.quantity, 3);
        assert!(close(oats.cost, 4.5));

        let milk = items.iter().find(|item| item.ingredient == "milk").unwrap();
        assert_eq!(milk.quantity, 3);
        assert!(close(milk.cost, 3.6));

        assert!(close(total, 42.9));
    }

    #[test]
    fn shopping_list_keeps_first_seen_order() {
        let plan = fallback_meal_plan(None, 3);
        let summary = estimate_budget(&plan, None);
        assert_eq!(
            summary.shopping_list,
            [
                "oats",
                "banana",
                "milk",
                "vegetables",
                "spice",
                "oil",
                "quinoa",
                "greens",
                "tomato",
                "lentils",
                "onion",
            ]
        );
    }

    #[test]
    fn quantity_field_does_not_multiply_cost() {
        let day = day_with_ingredients(vec![Ingredient::Detailed {
            ingredient: Some("milk".to_string()),
            name: None,
            quantity: 5.0,
        }]);
        let (items, total) = grocery_list(&[day]);
        assert_eq!(items[0].quantity, 1);
        assert!(close(total, 1.2));
    }

    #[test]
    fn names_normalize_before_tallying() {
        let day = day_with_ingredients(vec![
            Ingredient::from(" Milk "),
            Ingredient::from("milk"),
            Ingredient::from("MILK"),
        ]);
        let (items, _) = grocery_list(&[day]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].ingredient, "milk");
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn nameless_ingredients_are_skipped() {
        let day = day_with_ingredients(vec![
            Ingredient::Detailed {
                ingredient: None,
                name: None,
                quantity: 2.0,
            },
            Ingredient::from("rice"),
        ]);
        let (items, _) = grocery_list(&[day]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].ingredient, "rice");
    }

    #[test]
    fn missing_limit_is_always_within_budget() {
        let plan = fallback_meal_plan(None, 2);
        assert!(estimate_budget(&plan, None).within_budget);
    }

    #[test]
    fn limit_comparison_is_inclusive() {
        let plan = fallback_meal_plan(None, 3);
        assert!(estimate_budget(&plan, Some(42.9)).within_budget);
        assert!(estimate_budget(&plan, Some(50.0)).within_budget);
        assert!(!estimate_budget(&plan, Some(40.0)).within_budget);
    }

    #[test]
    fn zero_limit_still_compares() {
        let plan = fallback_meal_plan(None, 1);
        assert!(!estimate_budget(&plan, Some(0.0)).within_budget);
        assert!(estimate_budget(&[], Some(0.0)).within_budget);
    }

    #[test]
    fn summary_serialization_shape() {
        let day = day_with_ingredients(vec![Ingredient::from("milk")]);
        let summary = estimate_budget(&[day], Some(10.0));
        insta::assert_snapshot!(
            serde_json::to_string(&summary).unwrap(),
            @r#"{"total":1.2,"within_budget":true,"shopping_list":["milk"],"item_prices":{"milk":1.2}}"#
        );
    }

    #[test]
    fn empty_plan_costs_nothing() {
        let summary = estimate_budget(&[], None);
        assert!(close(summary.total, 0.0));
        assert!(summary.within_budget);
        assert!(summary.shopping_list.is_empty());
        assert!(summary.item_prices.is_empty());
    }
}
