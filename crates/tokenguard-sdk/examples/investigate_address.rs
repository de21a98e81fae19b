//! Investiga um endereço usando a API pública do explorer.
//!
//! Uso: `ETHERSCAN_API_KEY=... cargo run -p tokenguard-sdk --example investigate_address -- <endereço> [url]`

use anyhow::Context;
use rust_decimal::Decimal;
use tokenguard_core::Address;
use tokenguard_sdk::{ExplorerConfig, InvestigationRequest, Investigator, InvestigatorConfig};

/// Código de saída quando o explorer não pôde ser consultado
const GATEWAY_FAILURE_EXIT: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let address: Address = args
        .next()
        .context("informe o endereço a investigar")?
        .parse()?;

    let explorer = ExplorerConfig {
        api_key: std::env::var("ETHERSCAN_API_KEY").ok(),
        ..Default::default()
    };

    let mut builder = InvestigatorConfig::builder();
    if let Ok(price) = std::env::var("ETH_PRICE_USD") {
        builder = builder
            .native_price(price.parse::<Decimal>().context("ETH_PRICE_USD inválido")?)
            .currency("USD");
    }
    let investigator = Investigator::with_explorer(explorer, builder.build()?)?;

    let mut request = InvestigationRequest::new(address);
    if let Some(url) = args.next() {
        request = request.with_url(url);
    }

    match investigator.investigate(&request).await {
        Ok(report) => {
            println!("{}", report);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Err(e) if e.is_gateway_failure() => {
            eprintln!("Não foi possível consultar o explorer: {}", e);
            eprintln!("Isso não significa que o endereço esteja limpo.");
            std::process::exit(GATEWAY_FAILURE_EXIT);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
