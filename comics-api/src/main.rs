use comics_api::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let state = AppState::in_memory(config.clone());
    tracing::info!(
        assets_dir = %state.assets().assets_dir().display(),
        "Comic store ready"
    );

    Server::new(config).serve(router(state)).await?;

    Ok(())
}
