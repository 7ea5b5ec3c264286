//! SavingsPool scenario tests
//!
//! Runs the typed pool API through the demo's end-to-end sequence against
//! the in-process mock node: metadata queries, initialization, deposit,
//! balance and interest checks, and the rejection paths.
//!
//! Run with: cargo test --test pool_test -- --nocapture

use savings_pool_client::{
    BroadcastReceipt, ClarityValue, ContractClient, ContractRef, QueryError, SavingsPool,
    SignerIdentity, StacksNetwork,
};
use stacks_node_mock::{spawn_server, PoolState, INTEREST_RATE_BPS, MIN_DEPOSIT};

const TEST_KEY: &str = "edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc";
const CONTRACT_ADDRESS: &str = "ST2GG7HZZHEB3JHQFXHKD65HZXVRRNV6AYTS2VGMS";

fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

async fn pool_against_mock() -> SavingsPool {
    init_logging();

    let state = PoolState::new();
    let addr = spawn_server(state).await.expect("mock node failed to start");

    let network = StacksNetwork::testnet().with_core_api_url(format!("http://{}", addr));
    let contract = ContractRef::new(CONTRACT_ADDRESS, "savings-pool").expect("contract ref");
    let signer = SignerIdentity::from_private_key_hex(TEST_KEY, &network).expect("signer");

    SavingsPool::new(ContractClient::new(network, contract, signer))
}

/// Initialize the pool and fail the test if the node rejects it
async fn initialize(pool: &SavingsPool) {
    let receipt = pool.initialize_pool().await.expect("initialize broadcast failed");
    assert!(receipt.is_accepted(), "initialize rejected: {:?}", receipt);
}

#[tokio::test]
async fn test_pool_enabled_on_fresh_pool() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;

    assert!(pool.is_pool_enabled().await.expect("query failed"));
}

#[tokio::test]
async fn test_pool_stats_shape() -> anyhow::Result<()> {
    let pool = pool_against_mock().await;
    initialize(&pool).await;

    let stats = pool.get_pool_stats().await?;
    assert_eq!(stats.total_deposits, 0);
    assert_eq!(stats.total_depositors, 0);
    assert!(stats.pool_enabled);
    assert_eq!(stats.interest_rate, INTEREST_RATE_BPS);
    Ok(())
}

#[tokio::test]
async fn test_contract_info_shape() {
    let pool = pool_against_mock().await;

    let info = pool.get_contract_info().await.expect("query failed");
    assert_eq!(info.name, "savings-pool");
    assert!(!info.version.is_empty());
    assert_eq!(info.min_deposit, MIN_DEPOSIT);
}

#[tokio::test]
async fn test_deposit_reflected_in_balance() -> anyhow::Result<()> {
    let pool = pool_against_mock().await;
    initialize(&pool).await;
    let sender = pool.sender_address();

    assert_eq!(pool.get_user_balance(&sender).await?, 0);

    let receipt = pool.deposit(5_000_000).await?;
    assert!(receipt.is_accepted(), "deposit rejected: {:?}", receipt);

    // Mock applies effects at mempool admission, so no confirmation wait
    let balance = pool.get_user_balance(&sender).await?;
    assert_eq!(balance, 5_000_000);

    let deposit = pool
        .get_user_deposit(&sender)
        .await?
        .expect("deposit record missing");
    assert_eq!(deposit.amount, 5_000_000);

    let stats = pool.get_pool_stats().await?;
    assert_eq!(stats.total_deposits, 5_000_000);
    assert_eq!(stats.total_depositors, 1);
    Ok(())
}

#[tokio::test]
async fn test_deposit_below_minimum_rejected() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;

    let receipt = pool.deposit(1_000).await.expect("broadcast failed");
    match receipt {
        BroadcastReceipt::Rejected { reason, .. } => {
            assert!(reason.contains("DepositBelowMinimum"), "reason was {}", reason);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_withdraw_without_deposit_rejected_not_error() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;

    // A remote failure surfaces as a rejected receipt, never as a decode
    // error or panic
    let receipt = pool.withdraw(1_000_000).await.expect("broadcast failed");
    assert!(!receipt.is_accepted());
}

#[tokio::test]
async fn test_deposit_then_withdraw_roundtrip() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;
    let sender = pool.sender_address();

    assert!(pool.deposit(5_000_000).await.unwrap().is_accepted());
    assert!(pool.withdraw(2_000_000).await.unwrap().is_accepted());

    assert_eq!(pool.get_user_balance(&sender).await.unwrap(), 3_000_000);

    // Withdrawing more than remains is rejected
    let receipt = pool.withdraw(4_000_000).await.unwrap();
    assert!(!receipt.is_accepted());
}

#[tokio::test]
async fn test_claim_interest_accepted() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;

    assert!(pool.deposit(5_000_000).await.unwrap().is_accepted());
    let receipt = pool.claim_interest().await.expect("broadcast failed");
    assert!(receipt.is_accepted());
}

#[tokio::test]
async fn test_user_deposit_none_for_unknown_user() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;

    // A well-formed address that never deposited
    let stranger = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
    let deposit = pool.get_user_deposit(stranger).await.expect("query failed");
    assert!(deposit.is_none());
    assert_eq!(pool.get_user_balance(stranger).await.unwrap(), 0);
}

#[tokio::test]
async fn test_calculate_potential_interest() {
    let pool = pool_against_mock().await;

    // 10 STX over a full year of blocks at 5% = 0.5 STX
    let interest = pool
        .calculate_potential_interest(10_000_000, 52_560)
        .await
        .expect("query failed");
    assert_eq!(interest, 500_000);

    assert_eq!(
        pool.calculate_potential_interest(10_000_000, 0).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_user_history_records_actions() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;
    let sender = pool.sender_address();

    assert!(pool.deposit(5_000_000).await.unwrap().is_accepted());
    assert!(pool.withdraw(1_000_000).await.unwrap().is_accepted());

    let history = pool.get_user_history(&sender).await.expect("query failed");
    match history {
        ClarityValue::List(entries) => {
            assert_eq!(entries.len(), 2);
            let first_action = entries[0]
                .tuple_get("action")
                .and_then(|v| v.as_ascii().map(|s| s.to_string()));
            assert_eq!(first_action.as_deref(), Some("deposit"));
        }
        other => panic!("expected a list, got {}", other),
    }
}

#[tokio::test]
async fn test_malformed_address_never_defaults() {
    let pool = pool_against_mock().await;
    initialize(&pool).await;

    // Wrong network prefix entirely (Bitcoin bech32)
    let result = pool
        .get_user_balance("bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq")
        .await;
    assert!(
        matches!(result, Err(QueryError::InvalidArgument(_))),
        "expected InvalidArgument, got {:?}",
        result
    );
}
