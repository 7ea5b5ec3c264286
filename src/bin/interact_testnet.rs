//! Scripted end-to-end demo against the deployed savings-pool contract
//!
//! Walks the full interaction sequence on testnet: metadata queries, pool
//! initialization, a deposit, and the post-deposit balance and interest
//! checks. Configuration is hard-coded below; there are no flags.
//!
//! Run with: cargo run --bin interact-testnet

use std::error::Error;
use std::time::Duration;

use savings_pool_client::{ContractClient, ContractRef, SavingsPool, SignerIdentity, StacksNetwork};

// Wallet configuration
const PRIVATE_KEY: &str = "edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc";

// Contract details
const CONTRACT_ADDRESS: &str = "ST2GG7HZZHEB3JHQFXHKD65HZXVRRNV6AYTS2VGMS";
const CONTRACT_NAME: &str = "savings-pool";

// Demo amounts (µSTX)
const DEPOSIT_AMOUNT: u64 = 5_000_000;
const POTENTIAL_AMOUNT: u64 = 10_000_000;
const POTENTIAL_BLOCKS: u64 = 1_000;

/// How long to wait for the deposit to confirm before checking balances.
/// This is a guess, not a guarantee from the network; the deposit may still
/// be unconfirmed when the post-checks run.
const CONFIRMATION_WAIT_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run_demo().await {
        log::error!("❌ Demo failed: {}", e);
        std::process::exit(1);
    }
}

async fn run_demo() -> Result<(), Box<dyn Error>> {
    log::info!("🎯 Starting Savings Pool Demo");
    log::info!("================================");

    let network = StacksNetwork::testnet();
    let contract = ContractRef::new(CONTRACT_ADDRESS, CONTRACT_NAME)?;
    let signer = SignerIdentity::from_private_key_hex(PRIVATE_KEY, &network)?;
    let pool = SavingsPool::new(ContractClient::new(network, contract, signer));
    let sender = pool.sender_address();

    log::info!("Sender Address: {}", sender);
    log::info!("Contract: {}.{}", CONTRACT_ADDRESS, CONTRACT_NAME);

    // 1. Get contract info
    log::info!("📋 Getting contract information...");
    let info = pool.get_contract_info().await?;
    log::info!(
        "   {} v{} (rate {} bps, min deposit {} µSTX)",
        info.name,
        info.version,
        info.interest_rate,
        info.min_deposit
    );

    // 2. Check if pool is enabled
    log::info!("✅ Checking if pool is enabled...");
    let enabled = pool.is_pool_enabled().await?;
    log::info!("   Pool enabled: {}", enabled);

    // 3. Get initial pool stats
    log::info!("📊 Getting pool statistics...");
    let stats = pool.get_pool_stats().await?;
    log::info!(
        "   Deposits: {} µSTX across {} depositors",
        stats.total_deposits,
        stats.total_depositors
    );

    // 4. Initialize pool (if needed)
    log::info!("🚀 Initializing savings pool...");
    let receipt = pool.initialize_pool().await?;
    log::info!("   Broadcast: {:?}", receipt);

    // 5. Get pool stats after initialization
    let stats = pool.get_pool_stats().await?;
    log::info!("📊 Pool stats after init: {:?}", stats);

    // 6. Check user balance before deposit
    let balance_before = pool.get_user_balance(&sender).await?;
    log::info!("💳 Balance before deposit: {} µSTX", balance_before);

    // 7. Make a deposit (5 STX)
    log::info!("💰 Depositing {} µSTX...", DEPOSIT_AMOUNT);
    let receipt = pool.deposit(DEPOSIT_AMOUNT).await?;
    log::info!("   Broadcast: {:?}", receipt);

    log::info!(
        "⏳ Waiting {}s for transaction to confirm...",
        CONFIRMATION_WAIT_SECS
    );
    tokio::time::sleep(Duration::from_secs(CONFIRMATION_WAIT_SECS)).await;

    // 8. Check user deposit after deposit
    match pool.get_user_deposit(&sender).await? {
        Some(deposit) => log::info!(
            "👤 User deposit: {} µSTX (since block {})",
            deposit.amount,
            deposit.deposited_at
        ),
        None => log::info!("👤 No deposit recorded yet"),
    }

    // 9. Check user balance after deposit
    let balance_after = pool.get_user_balance(&sender).await?;
    log::info!("💳 Balance after deposit: {} µSTX", balance_after);

    // 10. Get updated pool stats
    let stats = pool.get_pool_stats().await?;
    log::info!("📊 Updated pool stats: {:?}", stats);

    // 11. Calculate current interest
    let interest = pool.calculate_interest(&sender).await?;
    log::info!("📈 Accrued interest: {} µSTX", interest);

    // 12. Calculate potential interest (10 STX over 1000 blocks)
    let potential = pool
        .calculate_potential_interest(POTENTIAL_AMOUNT, POTENTIAL_BLOCKS)
        .await?;
    log::info!(
        "🔮 Potential interest for {} µSTX over {} blocks: {} µSTX",
        POTENTIAL_AMOUNT,
        POTENTIAL_BLOCKS,
        potential
    );

    // 13. Get user history
    let history = pool.get_user_history(&sender).await?;
    log::info!("📜 User history: {}", history);

    log::info!("✅ Demo completed successfully!");
    Ok(())
}
