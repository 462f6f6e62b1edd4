//! Game Library demo
//!
//! Searches the catalog, shows details, similar games, the best price and a
//! trailer, then the trending view and wishlist-based recommendations.
//! Runs without a RAWG key on the built-in demo catalog.

use game_library_client::{
    save_comparison, Config, LocalStorage, Providers, RecommendationEngine, WishlistStore,
};
use game_library_core::constants::PRUNE_INTERVAL;
use game_library_core::{ComparisonSlots, Fetched, Game, WishlistEntry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn report<T>(what: &str, fetched: &Fetched<T>) {
    if let Some(reason) = fetched.reason() {
        tracing::warn!("{}: showing demo data ({})", what, reason);
    }
}

fn print_game(game: &Game) {
    println!(
        "  [{}] {} ({}) rating {:.2}, metacritic {}",
        game.id,
        game.name,
        game.released.as_deref().unwrap_or("TBA"),
        game.rating,
        game.metacritic.map(|m| m.to_string()).unwrap_or_else(|| "-".into()),
    );
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "game_library=info,game_library_client=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();
    if !config.is_api_key_configured() {
        tracing::warn!("RAWG API key not configured, using demo data");
    }

    let providers = Providers::new(&config);
    let _pruner = providers.rawg.limiter().spawn_pruner(PRUNE_INTERVAL);
    let engine = RecommendationEngine::with_ttl(providers.rawg.clone(), config.cache_ttl());

    let query = std::env::args().nth(1).unwrap_or_else(|| "witcher".to_string());
    let found = providers.rawg.search_games(&query).await;
    report("Search", &found);
    println!("Results for \"{}\":", query);
    for game in found.data() {
        print_game(game);
    }

    let Some(first) = found.data().first() else {
        println!("Nothing found.");
        return;
    };

    let details = providers.rawg.game_details(first.id).await;
    report("Details", &details);
    let game = details.into_inner();
    println!("\n{}", game.name);
    println!("  Genres: {}", game.genre_names().join(", "));
    println!("  Platforms: {}", game.platform_names().join(", "));

    let similar = engine.similar_games(&game).await;
    report("Similar games", &similar);
    println!("\nSimilar games:");
    for scored in engine.rank_by_similarity(&game, similar.into_inner()) {
        println!("  {:>5.1}  {}", scored.score, scored.game.name);
    }

    match providers.cheapshark.best_price(&game.name).await {
        Some(deal) => println!("\nBest price: ${} (was ${})", deal.sale_price, deal.normal_price),
        None => println!("\nNo deals found"),
    }

    println!("Trailer: {:?}", providers.trailers.find(&game.name).await);

    let trending = providers.trending().await;
    println!("\nTop rated:");
    for game in trending.top_rated.data().iter().take(5) {
        print_game(game);
    }
    println!("On sale:");
    for deal in trending.on_sale.iter().take(5) {
        println!("  {} ${}", deal.title, deal.sale_price);
    }
    println!("Free to play:");
    for free in trending.free_to_play.data().iter().take(5) {
        println!("  {} ({})", free.title, free.genre);
    }

    let mut wishlist = WishlistStore::new(LocalStorage::from_config(&config));
    for candidate in found.data().iter().take(2) {
        if let Err(e) = wishlist.add(WishlistEntry::from(candidate)) {
            tracing::error!("Failed to save wishlist: {}", e);
        }
    }
    let personalized = engine.personalized(wishlist.wishlist()).await;
    report("Recommendations", &personalized);
    println!("\nRecommended for your wishlist:");
    for game in personalized.data() {
        print_game(game);
    }

    let mut comparison = ComparisonSlots::new();
    for candidate in found.data().iter().take(3) {
        if let Err(e) = comparison.add(candidate.clone()) {
            tracing::debug!("Skipping {} in comparison: {}", candidate.name, e);
        }
    }
    if let Some(winners) = comparison.winners() {
        println!("\nComparison winners:");
        for (attribute, name) in winners {
            println!("  {}: {}", attribute, name);
        }
    }
    if let Err(e) = save_comparison(wishlist.storage_mut(), &comparison) {
        tracing::error!("Failed to save comparison: {}", e);
    }
}
