use log::debug;
use num_rational::Rational64;
use num_traits::One;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use recipe_web::quantity::parse_multiplier;
use recipe_web::source::load_recipe;
use recipe_web::{
    load_corpus, parser_for, ranking_engine_for, scale_ingredients, shopping_list, Favorites,
    Filter, InMemoryFavorites, LocalSource, RankingContext, RecipeWebConfig, RecipeWebError,
    YieldControls,
};

const USAGE: &str = "Usage:
  recipe-web list [--author NAME] [--tag TAG] [--seed N] [QUERY...]
  recipe-web show SLUG [MULTIPLIER]
  recipe-web shop SLUG [MULTIPLIER]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, rest) = args.split_first().ok_or(USAGE)?;
    let config = RecipeWebConfig::load()?;

    match command.as_str() {
        "list" => list(&config, rest)?,
        "show" => show(&config, rest)?,
        "shop" => shop(&config, rest)?,
        _ => return Err(USAGE.into()),
    }
    Ok(())
}

fn list(config: &RecipeWebConfig, args: &[String]) -> Result<(), RecipeWebError> {
    let mut filter = Filter::default();
    let mut seed = config.seed;
    let mut query = Vec::new();

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--author" => filter.author = Some(flag_value(&mut args, arg)?),
            "--tag" => filter.tag = Some(flag_value(&mut args, arg)?),
            "--seed" => {
                let value = flag_value(&mut args, arg)?;
                seed = Some(value.parse().map_err(|_| {
                    RecipeWebError::InvalidArgument(format!("seed must be a number: {}", value))
                })?);
            }
            _ => query.push(arg.as_str()),
        }
    }

    let corpus = load_corpus(config)?;
    let favorites: InMemoryFavorites = config.favorites.iter().cloned().collect();
    let query = query.join(" ");
    let context = RankingContext {
        corpus: &corpus,
        filter: &filter,
        query: &query,
        favorites: &favorites,
        seed: seed.unwrap_or_else(session_seed),
    };
    let ranking = ranking_engine_for(config).rank(&context);

    if !query.is_empty() {
        println!("{}", ranking.summary());
    }
    for recipe in &ranking.recipes {
        let marker = if favorites.is_favorite(recipe.slug()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<40} {}",
            marker,
            recipe.meta.slug,
            if recipe.title.is_empty() {
                "(untitled)".to_string()
            } else {
                recipe.title.clone()
            }
        );
        if !recipe.tags.is_empty() {
            println!("  {:<40} {}", "", recipe.tags.join(", "));
        }
    }
    Ok(())
}

fn show(config: &RecipeWebConfig, args: &[String]) -> Result<(), RecipeWebError> {
    let (slug, multiplier) = slug_and_multiplier(args)?;
    let source = LocalSource::new(&config.library_dir);
    let recipe = load_recipe(slug, &source, &config.repositories, &parser_for(config))?;

    println!("# {}", recipe.title);
    if !recipe.tags.is_empty() {
        println!("{}", recipe.tags.join(", "));
    }
    println!("{}", recipe.meta.source_url());
    if !recipe.image_path.is_empty() {
        println!("{}", recipe.image_path);
    }
    println!();
    print!("{}", recipe.description);

    let controls = YieldControls::new(&recipe.yields, multiplier);
    for track in &controls.tracks {
        println!("**{}**", track.label());
    }
    if controls.needs_plain_multiplier() {
        println!("(Multiplier {})", recipe_web::quantity::format_decimal(multiplier));
    }
    println!("\n---\n");
    print!("{}", scale_ingredients(&recipe.ingredients, multiplier));
    println!("\n---\n");
    print!("{}", recipe.instructions);
    Ok(())
}

fn shop(config: &RecipeWebConfig, args: &[String]) -> Result<(), RecipeWebError> {
    let (slug, multiplier) = slug_and_multiplier(args)?;
    let source = LocalSource::new(&config.library_dir);
    let recipe = load_recipe(slug, &source, &config.repositories, &parser_for(config))?;
    for item in shopping_list(&recipe.ingredients, multiplier) {
        println!("{}", item);
    }
    Ok(())
}

fn flag_value<'a>(
    args: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<String, RecipeWebError> {
    args.next()
        .cloned()
        .ok_or_else(|| RecipeWebError::InvalidArgument(format!("{} needs a value", flag)))
}

fn slug_and_multiplier(args: &[String]) -> Result<(&str, Rational64), RecipeWebError> {
    let slug = args
        .first()
        .ok_or_else(|| RecipeWebError::InvalidArgument("missing recipe slug".to_string()))?;
    let multiplier = match args.get(1) {
        Some(text) => parse_multiplier(text).ok_or_else(|| {
            RecipeWebError::InvalidArgument(format!("invalid multiplier: {}", text))
        })?,
        None => Rational64::one(),
    };
    Ok((slug.as_str(), multiplier))
}

/// Seed for this process; stable for one invocation, different across runs
fn session_seed() -> u64 {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    debug!("Using session seed {}", seed);
    seed
}
