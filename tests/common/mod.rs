//! Shared utilities for integration testing.
//!
//! [`MockChain`] stands in for the RPC connection. It decodes real calldata
//! with the `sol!` bindings, keeps contract state in memory and answers with
//! real ABI-encoded return data and event logs.

#![allow(dead_code)]

use alloy::primitives::{hex, keccak256, Address, Bytes, Log, TxHash, B256, U256};
use alloy::sol_types::{SolCall, SolEvent, SolInterface};
use async_trait::async_trait;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use x402_trust::blockchain::{to_checksummed, BlockchainError, BlockchainResult, ChainAccess, TxOutcome};
use x402_trust::config::TrustConfig;
use x402_trust::contracts::abi::{IEscrowVault, IERC20, ITrustProtocol};
use x402_trust::{Params, TrustSkill};

pub const STATUS_PENDING: u8 = 1;
pub const STATUS_COMPLETED: u8 = 2;
pub const STATUS_DISPUTED: u8 = 4;

/// Score the mock adds to a provider when delivery is confirmed.
pub const CONFIRM_SCORE_BONUS: u64 = 10;

pub fn buyer() -> Address {
    Address::repeat_byte(0xb0)
}

pub fn stranger() -> Address {
    Address::repeat_byte(0x5e)
}

pub fn usdc(amount: u64) -> U256 {
    U256::from(amount) * U256::from(1_000_000u64)
}

pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("params must be an object, got {}", other),
    }
}

/// Provider state held by the trust contract.
#[derive(Debug, Clone)]
pub struct MockProvider {
    pub score: u64,
    pub tier_code: u8,
    pub tier_name: String,
    pub timeout_secs: u64,
    pub active: bool,
    pub needs_escrow: bool,
}

impl MockProvider {
    /// Active provider whose tier name follows the contract's thresholds.
    pub fn active(score: u64) -> Self {
        let (tier_code, tier_name) = match score {
            850.. => (6, "Elite"),
            700..=849 => (5, "Excellent"),
            600..=699 => (4, "Good"),
            500..=599 => (3, "Verified"),
            400..=499 => (2, "Fair"),
            1..=399 => (1, "Newcomer"),
            0 => (0, "None"),
        };
        Self {
            score,
            tier_code,
            tier_name: tier_name.to_string(),
            timeout_secs: 1800,
            active: true,
            needs_escrow: score < 700,
        }
    }

    pub fn inactive() -> Self {
        Self {
            active: false,
            ..Self::active(0)
        }
    }
}

#[derive(Default)]
struct MockState {
    providers: HashMap<Address, MockProvider>,
    payments: HashMap<B256, IEscrowVault::Payment>,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    last_proof: Option<IEscrowVault::DeliveryProof>,
    last_evidence: Option<B256>,
    reads: Vec<&'static str>,
    submissions: Vec<&'static str>,
    suppress_events: bool,
    fail_reads: Option<String>,
    unconfirmed: bool,
    tx_count: u64,
}

/// In-memory trust protocol, escrow vault and token.
pub struct MockChain {
    state: Mutex<MockState>,
    sender: Option<Address>,
    trust: Address,
    escrow: Address,
    token: Address,
}

impl MockChain {
    /// Chain at the default contract addresses, signing as [`buyer`].
    pub fn new() -> Self {
        Self::with_sender(Some(buyer()))
    }

    /// Chain without a signing key.
    pub fn read_only() -> Self {
        Self::with_sender(None)
    }

    fn with_sender(sender: Option<Address>) -> Self {
        let contracts = TrustConfig::default().contracts;
        let parse = |s: &str| to_checksummed(s).expect("default address");
        Self {
            state: Mutex::new(MockState::default()),
            sender,
            trust: parse(&contracts.trust_protocol),
            escrow: parse(&contracts.escrow_vault),
            token: parse(&contracts.usdc),
        }
    }

    pub fn escrow_address(&self) -> Address {
        self.escrow
    }

    pub fn add_provider(&self, address: Address, provider: MockProvider) {
        self.state.lock().unwrap().providers.insert(address, provider);
    }

    pub fn provider_score(&self, address: Address) -> u64 {
        self.state.lock().unwrap().providers[&address].score
    }

    pub fn set_balance(&self, owner: Address, amount: U256) {
        self.state.lock().unwrap().balances.insert(owner, amount);
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, amount: U256) {
        self.state.lock().unwrap().allowances.insert((owner, spender), amount);
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Store a payment directly, bypassing `createPayment`.
    pub fn insert_payment(&self, id: B256, buyer: Address, provider: Address, amount: U256, status: u8) {
        let payment = IEscrowVault::Payment {
            buyer,
            provider,
            amount,
            requestHash: keccak256("seeded request"),
            createdAt: U256::from(1_700_000_000u64),
            timeout: U256::from(1800),
            deliveryBlock: U256::ZERO,
            status,
            useEscrow: true,
        };
        self.state.lock().unwrap().payments.insert(id, payment);
    }

    pub fn payment(&self, id: B256) -> Option<IEscrowVault::Payment> {
        self.state.lock().unwrap().payments.get(&id).cloned()
    }

    pub fn last_proof(&self) -> Option<IEscrowVault::DeliveryProof> {
        self.state.lock().unwrap().last_proof.clone()
    }

    pub fn last_evidence(&self) -> Option<B256> {
        self.state.lock().unwrap().last_evidence
    }

    /// Emit no event logs from now on.
    pub fn suppress_events(&self) {
        self.state.lock().unwrap().suppress_events = true;
    }

    /// Broadcast succeeds but no receipt arrives before the deadline.
    pub fn leave_unconfirmed(&self) {
        self.state.lock().unwrap().unconfirmed = true;
    }

    /// Fail every read call with an RPC error.
    pub fn fail_reads(&self, message: &str) {
        self.state.lock().unwrap().fail_reads = Some(message.to_string());
    }

    pub fn reads(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().reads.clone()
    }

    pub fn submissions(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn network_calls(&self) -> usize {
        let st = self.state.lock().unwrap();
        st.reads.len() + st.submissions.len()
    }

    fn read_trust(st: &mut MockState, input: &[u8]) -> BlockchainResult<Vec<u8>> {
        use ITrustProtocol::ITrustProtocolCalls as Call;

        let call = Call::abi_decode(input).map_err(|e| BlockchainError::Rpc(e.to_string()))?;
        let provider = |st: &MockState, a: &Address| st.providers.get(a).cloned().unwrap_or_else(MockProvider::inactive);

        Ok(match call {
            Call::getProviderInfo(c) => {
                st.reads.push("getProviderInfo");
                let p = provider(&*st, &c.provider);
                ITrustProtocol::getProviderInfoCall::abi_encode_returns(&ITrustProtocol::getProviderInfoReturn {
                    score: U256::from(p.score),
                    tier: p.tier_code,
                    timeout: U256::from(p.timeout_secs),
                    isActive: p.active,
                })
            }
            Call::getTrustTier(c) => {
                st.reads.push("getTrustTier");
                let p = provider(&*st, &c.provider);
                ITrustProtocol::getTrustTierCall::abi_encode_returns(&p.tier_name)
            }
            Call::needsEscrow(c) => {
                st.reads.push("needsEscrow");
                let p = provider(&*st, &c.provider);
                ITrustProtocol::needsEscrowCall::abi_encode_returns(&p.needs_escrow)
            }
            Call::compareProviders(c) => {
                st.reads.push("compareProviders");
                let (scores, timeouts) = c
                    .providers
                    .iter()
                    .map(|a| {
                        let p = provider(&*st, a);
                        (U256::from(p.score), U256::from(p.timeout_secs))
                    })
                    .unzip();
                ITrustProtocol::compareProvidersCall::abi_encode_returns(&ITrustProtocol::compareProvidersReturn {
                    scores,
                    timeouts,
                })
            }
        })
    }

    fn read_escrow(st: &mut MockState, input: &[u8]) -> BlockchainResult<Vec<u8>> {
        use IEscrowVault::IEscrowVaultCalls as Call;

        match Call::abi_decode(input).map_err(|e| BlockchainError::Rpc(e.to_string()))? {
            Call::getPayment(c) => {
                st.reads.push("getPayment");
                let payment = st.payments.get(&c.paymentId).cloned().unwrap_or(IEscrowVault::Payment {
                    buyer: Address::ZERO,
                    provider: Address::ZERO,
                    amount: U256::ZERO,
                    requestHash: B256::ZERO,
                    createdAt: U256::ZERO,
                    timeout: U256::ZERO,
                    deliveryBlock: U256::ZERO,
                    status: 0,
                    useEscrow: false,
                });
                Ok(IEscrowVault::getPaymentCall::abi_encode_returns(&payment))
            }
            _ => Err(BlockchainError::Rpc("execution reverted: not a view function".into())),
        }
    }

    fn read_token(st: &mut MockState, input: &[u8]) -> BlockchainResult<Vec<u8>> {
        use IERC20::IERC20Calls as Call;

        match Call::abi_decode(input).map_err(|e| BlockchainError::Rpc(e.to_string()))? {
            Call::balanceOf(c) => {
                st.reads.push("balanceOf");
                let balance = st.balances.get(&c.account).copied().unwrap_or_default();
                Ok(IERC20::balanceOfCall::abi_encode_returns(&balance))
            }
            Call::allowance(c) => {
                st.reads.push("allowance");
                let allowance = st.allowances.get(&(c.owner, c.spender)).copied().unwrap_or_default();
                Ok(IERC20::allowanceCall::abi_encode_returns(&allowance))
            }
            Call::approve(_) => Err(BlockchainError::Rpc("execution reverted: not a view function".into())),
        }
    }

    fn apply_escrow(&self, st: &mut MockState, sender: Address, tx_hash: TxHash, input: &[u8]) -> BlockchainResult<Vec<Log>> {
        use IEscrowVault::IEscrowVaultCalls as Call;

        let call = Call::abi_decode(input).map_err(|e| BlockchainError::Rpc(e.to_string()))?;
        let mut logs = Vec::new();

        match call {
            Call::createPayment(c) => {
                st.submissions.push("createPayment");
                let balance = st.balances.get(&sender).copied().unwrap_or_default();
                let allowance = st.allowances.get(&(sender, self.escrow)).copied().unwrap_or_default();
                if balance < c.amount || allowance < c.amount {
                    return Err(BlockchainError::Reverted(tx_hash));
                }
                st.balances.insert(sender, balance - c.amount);
                st.allowances.insert((sender, self.escrow), allowance - c.amount);

                let provider = st.providers.get(&c.provider).cloned().unwrap_or_else(MockProvider::inactive);
                let payment_id = keccak256(tx_hash);
                st.payments.insert(
                    payment_id,
                    IEscrowVault::Payment {
                        buyer: sender,
                        provider: c.provider,
                        amount: c.amount,
                        requestHash: c.requestHash,
                        createdAt: U256::from(1_700_000_000u64),
                        timeout: U256::from(provider.timeout_secs),
                        deliveryBlock: U256::ZERO,
                        status: STATUS_PENDING,
                        useEscrow: provider.needs_escrow,
                    },
                );
                logs.push(
                    IEscrowVault::PaymentCreated {
                        paymentId: payment_id,
                        buyer: sender,
                        provider: c.provider,
                        amount: c.amount,
                        useEscrow: provider.needs_escrow,
                        timeout: U256::from(provider.timeout_secs),
                    }
                    .encode_log_data(),
                );
            }
            Call::confirmDelivery(c) => {
                st.submissions.push("confirmDelivery");
                let payment = st.payments.get_mut(&c.paymentId).ok_or(BlockchainError::Reverted(tx_hash))?;
                if payment.status != STATUS_PENDING || payment.buyer != sender {
                    return Err(BlockchainError::Reverted(tx_hash));
                }
                payment.status = STATUS_COMPLETED;
                let provider = payment.provider;
                if let Some(p) = st.providers.get_mut(&provider) {
                    p.score += CONFIRM_SCORE_BONUS;
                }
                st.last_proof = Some(c.proof);
            }
            Call::raiseDispute(c) => {
                st.submissions.push("raiseDispute");
                let payment = st.payments.get_mut(&c.paymentId).ok_or(BlockchainError::Reverted(tx_hash))?;
                if payment.status != STATUS_PENDING || payment.buyer != sender {
                    return Err(BlockchainError::Reverted(tx_hash));
                }
                payment.status = STATUS_DISPUTED;
                st.last_evidence = Some(c.evidence);
                logs.push(
                    IEscrowVault::DisputeRaised {
                        paymentId: c.paymentId,
                        disputeId: dispute_id_for(c.paymentId),
                    }
                    .encode_log_data(),
                );
            }
            Call::getPayment(_) => return Err(BlockchainError::Rpc("getPayment is a view function".into())),
        }

        Ok(logs
            .into_iter()
            .map(|data| Log {
                address: self.escrow,
                data,
            })
            .collect())
    }

    fn apply_token(&self, st: &mut MockState, sender: Address, input: &[u8]) -> BlockchainResult<Vec<Log>> {
        use IERC20::IERC20Calls as Call;

        match Call::abi_decode(input).map_err(|e| BlockchainError::Rpc(e.to_string()))? {
            Call::approve(c) => {
                st.submissions.push("approve");
                st.allowances.insert((sender, c.spender), c.amount);
                Ok(Vec::new())
            }
            _ => Err(BlockchainError::Rpc("not a state-changing function".into())),
        }
    }
}

/// Dispute id the mock vault assigns to a payment.
pub fn dispute_id_for(payment_id: B256) -> B256 {
    keccak256([payment_id.as_slice(), b"dispute"].concat())
}

#[async_trait]
impl ChainAccess for MockChain {
    async fn call(&self, to: Address, input: Bytes) -> BlockchainResult<Bytes> {
        let mut st = self.state.lock().unwrap();
        if let Some(message) = &st.fail_reads {
            return Err(BlockchainError::Rpc(message.clone()));
        }

        let output = if to == self.trust {
            Self::read_trust(&mut st, &input)?
        } else if to == self.escrow {
            Self::read_escrow(&mut st, &input)?
        } else if to == self.token {
            Self::read_token(&mut st, &input)?
        } else {
            return Err(BlockchainError::Rpc(format!("no contract at {}", to)));
        };
        Ok(output.into())
    }

    async fn submit(&self, _method: &'static str, to: Address, input: Bytes) -> BlockchainResult<TxOutcome> {
        let sender = self.sender()?;
        let mut st = self.state.lock().unwrap();
        st.tx_count += 1;
        let tx_hash = keccak256(st.tx_count.to_be_bytes());
        if st.unconfirmed {
            return Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                waited_secs: TrustConfig::default().blockchain.confirmation_timeout_secs,
            });
        }

        let logs = if to == self.escrow {
            self.apply_escrow(&mut st, sender, tx_hash, &input)?
        } else if to == self.token {
            self.apply_token(&mut st, sender, &input)?
        } else {
            return Err(BlockchainError::Rpc(format!("no contract at {}", to)));
        };

        Ok(TxOutcome {
            tx_hash,
            block_number: Some(100 + st.tx_count),
            logs: if st.suppress_events { Vec::new() } else { logs },
        })
    }

    fn sender(&self) -> BlockchainResult<Address> {
        self.sender
            .ok_or_else(|| BlockchainError::Wallet("No signing key configured".to_string()))
    }

    async fn chain_id(&self) -> BlockchainResult<u64> {
        Ok(TrustConfig::default().blockchain.chain_id)
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        Ok(100 + self.state.lock().unwrap().tx_count)
    }
}

/// Skill wired to `chain` with default configuration.
pub fn skill(chain: &Arc<MockChain>) -> TrustSkill {
    TrustSkill::with_chain(Arc::new(TrustConfig::default()), chain.clone())
}

// =============================================================================
// JSON-RPC endpoint stub
// =============================================================================

/// Chain id the RPC stub reports.
pub const STUB_CHAIN_ID: u64 = 31337;

/// Hash the RPC stub returns for every broadcast.
pub fn stub_tx_hash() -> TxHash {
    TxHash::repeat_byte(0xab)
}

#[derive(Clone)]
struct RpcStub {
    receipt: Arc<dyn Fn(usize) -> Option<Value> + Send + Sync>,
    polls: Arc<AtomicUsize>,
}

impl RpcStub {
    fn answer(&self, call: &Value) -> Value {
        let result = match call["method"].as_str().unwrap_or_default() {
            "eth_chainId" => json!(format!("{:#x}", STUB_CHAIN_ID)),
            "eth_blockNumber" => json!("0x10"),
            "eth_getTransactionCount" => json!("0x0"),
            "eth_gasPrice" => json!("0x3b9aca00"),
            "eth_estimateGas" => json!("0x5208"),
            "eth_sendRawTransaction" => json!(stub_tx_hash().to_string()),
            "eth_getTransactionReceipt" => {
                let poll = self.polls.fetch_add(1, Ordering::SeqCst);
                (self.receipt)(poll).unwrap_or(Value::Null)
            }
            other => {
                return json!({
                    "jsonrpc": "2.0",
                    "id": call["id"],
                    "error": { "code": -32601, "message": format!("method {} not found", other) }
                });
            }
        };
        json!({ "jsonrpc": "2.0", "id": call["id"], "result": result })
    }
}

async fn rpc_handler(State(stub): State<RpcStub>, Json(body): Json<Value>) -> Json<Value> {
    match body {
        Value::Array(calls) => Json(Value::Array(calls.iter().map(|c| stub.answer(c)).collect())),
        call => Json(stub.answer(&call)),
    }
}

/// Start a JSON-RPC endpoint that accepts any signed transaction.
///
/// `receipt` is called with the zero-based poll count and answers
/// `eth_getTransactionReceipt`; `None` means not mined yet.
pub async fn start_rpc_stub<F>(receipt: F) -> SocketAddr
where
    F: Fn(usize) -> Option<Value> + Send + Sync + 'static,
{
    let stub = RpcStub {
        receipt: Arc::new(receipt),
        polls: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new().route("/", post(rpc_handler)).with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Receipt for [`stub_tx_hash`] in node JSON format, mined in block 16.
pub fn stub_receipt(success: bool, logs: &[Log]) -> Value {
    let tx_hash = stub_tx_hash().to_string();
    let block_hash = B256::repeat_byte(0xbb).to_string();
    let logs: Vec<Value> = logs
        .iter()
        .enumerate()
        .map(|(i, log)| {
            json!({
                "address": log.address.to_string(),
                "topics": log.topics().iter().map(|t| t.to_string()).collect::<Vec<_>>(),
                "data": hex::encode_prefixed(&log.data.data),
                "blockHash": block_hash,
                "blockNumber": "0x10",
                "transactionHash": tx_hash,
                "transactionIndex": "0x0",
                "logIndex": format!("{:#x}", i),
                "removed": false
            })
        })
        .collect();

    json!({
        "type": "0x0",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": logs,
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": block_hash,
        "blockNumber": "0x10",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": buyer().to_string(),
        "to": Address::repeat_byte(0xe5).to_string(),
        "contractAddress": null
    })
}
