//! Read-only smoke test for the deployed savings-pool contract
//!
//! Exercises the three metadata queries without touching the ledger.
//! Configuration is hard-coded below; there are no flags.
//!
//! Run with: cargo run --bin smoke-test

use std::error::Error;

use savings_pool_client::{ContractClient, ContractRef, SavingsPool, SignerIdentity, StacksNetwork};

const PRIVATE_KEY: &str = "edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc";
const CONTRACT_ADDRESS: &str = "ST2GG7HZZHEB3JHQFXHKD65HZXVRRNV6AYTS2VGMS";
const CONTRACT_NAME: &str = "savings-pool";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run_smoke_test().await {
        log::error!("❌ Error testing contract: {}", e);
        std::process::exit(1);
    }
}

async fn run_smoke_test() -> Result<(), Box<dyn Error>> {
    log::info!("🧪 Testing contract on testnet...");
    log::info!("📍 Contract: {}.{}", CONTRACT_ADDRESS, CONTRACT_NAME);

    let network = StacksNetwork::testnet();
    let contract = ContractRef::new(CONTRACT_ADDRESS, CONTRACT_NAME)?;
    let signer = SignerIdentity::from_private_key_hex(PRIVATE_KEY, &network)?;
    let pool = SavingsPool::new(ContractClient::new(network, contract, signer));

    log::info!("📋 Getting contract info...");
    let info = pool.get_contract_info().await?;
    log::info!("   {:?}", info);

    log::info!("✅ Checking if pool is enabled...");
    let enabled = pool.is_pool_enabled().await?;
    log::info!("   Pool enabled: {}", enabled);

    log::info!("📊 Getting pool statistics...");
    let stats = pool.get_pool_stats().await?;
    log::info!("   {:?}", stats);

    log::info!("🎉 Contract is responding on testnet!");
    log::info!("📝 Summary:");
    log::info!("   - All read-only functions working");
    log::info!(
        "   - Pool {} for deposits",
        if enabled { "enabled and ready" } else { "currently disabled" }
    );
    log::info!("   - Interest rate: {} bps", info.interest_rate);
    log::info!("   - Minimum deposit: {} µSTX", info.min_deposit);

    Ok(())
}
