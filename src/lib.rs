pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod cli;
pub mod history;
pub mod error;

use agent::ChatAgent;
use cli::Args;
use config::responses::resolve_responses;
use log::info;
use server::Server;
use std::error::Error;

const ENDPOINTS: &[(&str, &str)] = &[
    ("POST /chat", "Send a message"),
    ("GET /chat/history", "Get conversation history"),
    ("DELETE /chat/history", "Clear history"),
    ("GET /health", "Health check"),
];

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr());
    info!("CORS Origins: {}", args.allowed_origins().join(", "));
    info!(
        "Responses File: {}",
        args.responses_path.as_deref().unwrap_or("built-in")
    );
    info!("Debug: {}", args.debug);
    info!("-------------------------");

    let responses = resolve_responses(args.responses_path.as_deref())?;
    let agent = ChatAgent::new(responses);
    info!("Keyword table ready with {} entries", agent.responses().entries().len());
    info!("Fallback template: {}", agent.responses().default_template());

    info!("Endpoints:");
    for (route, description) in ENDPOINTS {
        info!("   {} - {}", route, description);
    }

    let addr = args.server_addr();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
