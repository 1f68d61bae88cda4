use num_rational::Rational64;
use recipe_web::quantity::{format_decimal, parse_multiplier};
use recipe_web::yields::{decrease_multiplier, increase_multiplier, multiplier_from_input};
use recipe_web::{
    multiply_amount, parse_recipe, scale_ingredients, shopping_list, split_amount,
    split_amount_list, split_amount_unit, Repository, YieldControls,
};

fn r(numerator: i64, denominator: i64) -> Rational64 {
    Rational64::new(numerator, denominator)
}

const BREAD: &str = "# Bread

**1 loaf|750 g dough**

---

- *500 g* flour
- *1,5 tsp* salt
- *7 g* dry yeast
- *300-320 ml* water
- olive oil

---

Knead, rise, bake.
";

#[test]
fn test_multiply_amount() {
    assert_eq!(multiply_amount("4 servings", r(3, 2)), "6 servings");
    assert_eq!(multiply_amount("250g", r(2, 1)), "500 g");
    assert_eq!(multiply_amount("0,5 l", r(3, 1)), "1.5 l");
    assert_eq!(multiply_amount("2 - 3 eggs", r(2, 1)), "4-6 eggs");
    assert_eq!(multiply_amount("3", r(1, 3)), "1");
    assert_eq!(multiply_amount("1 cup", r(1, 3)), "0.33 cup");
    assert_eq!(multiply_amount("to taste", r(5, 1)), "to taste");
}

#[test]
fn test_repeated_scaling_does_not_drift() {
    let third = multiply_amount("10 g", r(1, 3));
    assert_eq!(third, "3.33 g");

    // Scaling once by an exact product stays exact
    assert_eq!(multiply_amount("10 g", r(1, 3) * r(3, 1)), "10 g");
}

#[test]
fn test_split_helpers() {
    assert_eq!(
        split_amount_unit("1.5 kg"),
        ("1.5".to_string(), "kg".to_string())
    );
    assert_eq!(split_amount("2-4 apples"), r(2, 1));
    assert_eq!(split_amount("a pinch"), r(1, 1));
    assert_eq!(
        split_amount_list("4 servings | 2 kg |  "),
        vec!["4 servings", "2 kg"]
    );
    assert!(split_amount_list("").is_empty());
}

#[test]
fn test_parse_multiplier() {
    assert_eq!(parse_multiplier("1.5"), Some(r(3, 2)));
    assert_eq!(parse_multiplier("1,5"), Some(r(3, 2)));
    assert_eq!(parse_multiplier("3/4"), Some(r(3, 4)));
    assert_eq!(parse_multiplier("-2"), None);
    assert_eq!(parse_multiplier("lots"), None);
    assert_eq!(parse_multiplier("1/0"), None);
}

#[test]
fn test_format_decimal() {
    assert_eq!(format_decimal(r(1, 2)), "0.5");
    assert_eq!(format_decimal(r(2, 3)), "0.67");
    assert_eq!(format_decimal(r(1, 200)), "0.01");
    assert_eq!(format_decimal(r(12, 1)), "12");
}

#[test]
fn test_yield_controls_for_parsed_recipe() {
    let recipe = parse_recipe("bread.md", BREAD, &Repository::new("alice", "recipes", "main"));
    let controls = YieldControls::new(&recipe.yields, r(2, 1));

    let labels: Vec<String> = controls.tracks.iter().map(|t| t.label()).collect();
    assert_eq!(labels, vec!["2 loaf", "1500 g dough"]);
    assert_eq!(controls.tracks[1].base, r(750, 1));
    assert!(!controls.needs_plain_multiplier());
}

#[test]
fn test_yield_controls_plain_multiplier() {
    let controls = YieldControls::new("4 servings|2 kg", r(1, 1));
    assert!(controls.needs_plain_multiplier());

    // Placeholder tracks count as one unit and never scale
    let controls = YieldControls::new("4 servings|some cookies", r(3, 1));
    assert!(!controls.needs_plain_multiplier());
    assert_eq!(controls.tracks[0].label(), "12 servings");
    assert_eq!(controls.tracks[1].label(), "1 some cookies");
    assert!(!controls.tracks[1].scalable);

    let controls = YieldControls::new("", r(1, 1));
    assert!(controls.tracks.is_empty());
    assert!(controls.needs_plain_multiplier());
}

#[test]
fn test_multiplier_stepping_over_a_track() {
    let divisor = r(4, 1);

    // Step up from one serving's worth by single servings
    let mut multiplier = r(1, 4);
    multiplier = increase_multiplier(multiplier, divisor);
    assert_eq!(multiplier, r(1, 2));
    multiplier = decrease_multiplier(multiplier, divisor);
    assert_eq!(multiplier, r(1, 4));
    multiplier = decrease_multiplier(multiplier, divisor);
    assert_eq!(multiplier, r(1, 8));
    multiplier = increase_multiplier(multiplier, divisor);
    assert_eq!(multiplier, r(1, 4));

    assert_eq!(multiplier_from_input("006", divisor), r(3, 2));
    assert_eq!(multiplier_from_input("", divisor), r(0, 1));
    assert_eq!(multiplier_from_input("-3", divisor), r(0, 1));
}

#[test]
fn test_scale_ingredients() {
    let recipe = parse_recipe("bread.md", BREAD, &Repository::new("alice", "recipes", "main"));

    let same = scale_ingredients(&recipe.ingredients, r(1, 1));
    assert_eq!(same, recipe.ingredients);

    let doubled = scale_ingredients(&recipe.ingredients, r(2, 1));
    assert!(doubled.contains("- *1000 g* flour"));
    assert!(doubled.contains("- *3 tsp* salt"));
    assert!(doubled.contains("- *600-640 ml* water"));
    assert!(doubled.contains("- olive oil"));
}

#[test]
fn test_shopping_list() {
    let recipe = parse_recipe("bread.md", BREAD, &Repository::new("alice", "recipes", "main"));
    let items = shopping_list(&recipe.ingredients, r(1, 2));
    assert_eq!(
        items,
        vec![
            "250 g flour",
            "0.75 tsp salt",
            "3.5 g dry yeast",
            "150-160 ml water",
            "olive oil",
        ]
    );
}

#[test]
fn test_scaling_follows_markdown_structure() {
    let ingredients = "```\n- 2 eggs\n```\n\n> - 2 eggs\n\n- *100 g* sugar\n";
    assert_eq!(
        scale_ingredients(ingredients, r(2, 1)),
        "```\n- 2 eggs\n```\n\n> - 4 eggs\n\n- *200 g* sugar\n"
    );
    assert_eq!(
        shopping_list(ingredients, r(2, 1)),
        vec!["4 eggs", "200 g sugar"]
    );
}
