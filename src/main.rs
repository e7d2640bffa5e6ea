use std::error::Error;

use aws_env_bootstrap::{logging, setup, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init(tracing::Level::INFO);

    let env = setup(&Settings::default())?.init().await?;

    let out = serde_json::to_string_pretty(env.config())?;
    println!("{out}");
    Ok(())
}
