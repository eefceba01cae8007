use incolpan_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, work dir, logging)
    setup_environment()?;

    print_banner();

    tracing::info!("Incolpan distribution server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Server state (database pool, message bus)
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server
    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}
