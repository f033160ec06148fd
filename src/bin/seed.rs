use autopartes_chatbot::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    seed::seed_catalog_if_empty,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, &config);
    // Ensure migrations are applied.
    run_migrations(&state.orm).await?;

    let inserted = seed_catalog_if_empty(&state).await?;
    if inserted == 0 {
        println!("Catalog already has products; nothing to seed.");
    } else {
        println!("Seed completed: {inserted} products added.");
    }
    Ok(())
}
