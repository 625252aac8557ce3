pub mod api;

use crate::agent::ChatAgent;
use crate::cli::Args;
use std::error::Error;

pub struct Server {
    addr: String,
    agent: ChatAgent,
    args: Args,
}

impl Server {
    pub fn new(
        addr: String,
        agent: ChatAgent,
        args: Args,
    ) -> Self {
        Self {
            addr,
            agent,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(
            &self.addr,
            self.agent.clone(),
            &self.args.allowed_origins(),
        ).await
    }
}
