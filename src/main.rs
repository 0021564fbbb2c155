// src/main.rs

use std::env;
use std::process;
use std::sync::Arc;

use colored::Colorize;
use secrecy::ExposeSecret;
use sol_balance_agent::{
    agent::{AgentDispatcher, ChatClient},
    blockchain::{SolanaRpcClient, Wallet},
    config::Config,
    mcp::server::run_mcp_server,
    shell::Shell,
    AppContext,
};
use tokio::io::{self, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn fail(message: &str) -> ! {
    error!("{}", message);
    eprintln!("{} {}", "Initialization failed:".red().bold(), message);
    process::exit(1);
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sol_balance_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => fail(&format!("{:#}", e)),
    };

    let wallet = match Wallet::from_secret(config.private_key.expose_secret()) {
        Ok(wallet) => wallet,
        Err(e) => fail(&e.to_string()),
    };

    let chain = match SolanaRpcClient::new(&config.rpc_url, config.request_timeout) {
        Ok(client) => client,
        Err(e) => fail(&format!("Failed to initialize Solana client: {}", e)),
    };
    info!("Using RPC endpoint {}", chain.rpc_url());

    let mcp_mode = env::args().any(|a| a == "--mcp") || env::var("MCP_MODE").is_ok();
    let wallet_address = wallet.address().to_string();
    let ctx = AppContext::new(config, wallet, Arc::new(chain));

    // stdout belongs to the protocol stream in MCP mode
    if mcp_mode {
        info!("Wallet {} ready", wallet_address);
        run_mcp_server(ctx, BufReader::new(io::stdin()), io::stdout()).await;
        return;
    }

    let model = match ChatClient::new(&ctx.config) {
        Ok(client) => client,
        Err(e) => fail(&e.to_string()),
    };
    println!("{}", "Solana agent initialized successfully".green());
    println!("Wallet address: {}", wallet_address.bold());

    let dispatcher = AgentDispatcher::new(ctx, Arc::new(model));
    let mut shell = Shell::new(
        BufReader::new(io::stdin()),
        io::stdout(),
        &dispatcher,
        wallet_address,
    );
    if let Err(e) = shell.run().await {
        error!("Terminal I/O failed: {}", e);
        process::exit(1);
    }
}
