//! GrubDash order API server
//!
//! Reads its configuration from the YAML file named by `GRUBDASH_CONFIG`
//! (defaults apply when unset), seeds the store and serves until Ctrl+C.
//!
//! ```text
//! GRUBDASH_CONFIG=demos/order_api/config.yaml cargo run --example order_api
//! ```

use grubdash::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::var("GRUBDASH_CONFIG") {
        Ok(path) => ServerConfig::from_yaml_file(path)?,
        Err(_) => ServerConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = config.bind_address();
    println!("🚀 Starting GrubDash order API on http://{}", addr);
    println!("    GET    /orders             - List all orders");
    println!("    POST   /orders             - Create an order");
    println!("    GET    /orders/{{orderId}}   - Get an order");
    println!("    PUT    /orders/{{orderId}}   - Update an order");
    println!("    DELETE /orders/{{orderId}}   - Delete a pending order");

    ServerBuilder::from_config(&config)?.serve(&addr).await
}
