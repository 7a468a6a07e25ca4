use std::sync::Arc;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads `config.toml`, wires the engine and serves until Ctrl-C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(configuration::load_config()?);
    let _guard = configuration::init_tracing(&config.logging)?;

    let addr = config.server.socket_addr();
    let state = web_server::AppState::from_config(config).await?;
    web_server::run_server(state, addr).await
}
