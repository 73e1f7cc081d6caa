use std::time::Duration;

use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use sale_core::sale::{RedeemableConfig, SaleConfig};
use tracing::{debug, info};

use crate::abi::{ISale, ISaleFactory};
use crate::{ChainError, Result};

// ─── SaleFactory ──────────────────────────────────────────────────────────

/// The on-chain factory that deploys a sale and its redeemable token in one
/// transaction.
#[derive(Debug, Clone)]
pub struct SaleFactory {
    address: Address,
    receipt_timeout: Duration,
}

/// A successful deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    pub sale: DeployedSale,
    pub tx_hash: B256,
    pub block_number: u64,
}

impl SaleFactory {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            receipt_timeout: Duration::from_secs(120),
        }
    }

    /// How long to wait for the deployment to be mined.
    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Send `createChildTyped(config, redeemableConfig)` from `from` and wait
    /// for the receipt.
    pub async fn deploy<P: Provider>(
        &self,
        provider: &P,
        from: Address,
        sale: &SaleConfig,
        redeemable: &RedeemableConfig,
    ) -> Result<Deployment> {
        let factory = ISaleFactory::new(self.address, provider);
        let pending = factory
            .createChildTyped(sale.into(), redeemable.into())
            .from(from)
            .send()
            .await?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, factory = %self.address, "deployment transaction submitted");

        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|source| ChainError::Unconfirmed { tx_hash, source })?;
        if !receipt.status() {
            return Err(ChainError::Reverted { tx_hash });
        }

        let child = self.find_child(&receipt)?;
        let block_number = receipt.block_number().unwrap_or_default();
        info!(sale = %child, block = block_number, "sale deployed");
        Ok(Deployment {
            sale: DeployedSale::new(child),
            tx_hash,
            block_number,
        })
    }

    /// Address of the sale announced by this factory's `NewChild` event.
    fn find_child(&self, receipt: &TransactionReceipt) -> Result<Address> {
        receipt
            .inner
            .logs()
            .iter()
            .filter(|log| log.address() == self.address)
            .find_map(|log| log.log_decode::<ISaleFactory::NewChild>().ok())
            .map(|log| log.inner.data.child)
            .ok_or(ChainError::MissingChild {
                tx_hash: receipt.transaction_hash,
            })
    }
}

// ─── DeployedSale ─────────────────────────────────────────────────────────

/// Handle to a deployed sale contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedSale {
    address: Address,
}

impl DeployedSale {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Price per unit the sale would charge `from` for buying `units` now.
    pub async fn calculate_price<P: Provider>(
        &self,
        provider: &P,
        from: Address,
        units: U256,
    ) -> Result<U256> {
        let price = ISale::new(self.address, provider)
            .calculatePrice(units)
            .from(from)
            .call()
            .await?;
        debug!(sale = %self.address, %units, %price, "calculatePrice");
        Ok(price)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{receipt_json, rpc_mock, rpc_mock_matching};
    use crate::wallet::connect;
    use alloy::primitives::Bytes;
    use alloy::sol_types::{SolCall, SolEvent, SolValue};
    use mockito::Matcher;
    use sale_core::sale::SaleParams;

    fn records() -> (SaleConfig, RedeemableConfig) {
        SaleParams::default()
            .build(Address::repeat_byte(0xaa), 1_000)
            .unwrap()
    }

    fn new_child_log(factory: Address, child: Address) -> serde_json::Value {
        let event = ISaleFactory::NewChild {
            sender: Address::repeat_byte(0xaa),
            child,
        };
        serde_json::json!({
            "address": factory,
            "topics": [ISaleFactory::NewChild::SIGNATURE_HASH],
            "data": Bytes::from(event.encode_data()),
        })
    }

    #[test]
    fn find_child_ignores_foreign_logs() {
        let factory = SaleFactory::new(Address::repeat_byte(0xf0));
        let child = Address::repeat_byte(0x5a);
        let receipt: TransactionReceipt = serde_json::from_value(receipt_json(
            B256::repeat_byte(9),
            1,
            true,
            vec![new_child_log(Address::repeat_byte(0x01), child)],
        ))
        .unwrap();
        assert!(matches!(
            factory.find_child(&receipt),
            Err(ChainError::MissingChild { .. })
        ));
    }

    #[test]
    fn find_child_reads_factory_event() {
        let factory = SaleFactory::new(Address::repeat_byte(0xf0));
        let child = Address::repeat_byte(0x5a);
        let receipt: TransactionReceipt = serde_json::from_value(receipt_json(
            B256::repeat_byte(9),
            1,
            true,
            vec![
                new_child_log(Address::repeat_byte(0x01), Address::repeat_byte(0x02)),
                new_child_log(factory.address(), child),
            ],
        ))
        .unwrap();
        assert_eq!(factory.find_child(&receipt).unwrap(), child);
    }

    #[tokio::test]
    async fn deploy_submits_and_reads_child_address() {
        let mut server = mockito::Server::new_async().await;
        let factory_addr = Address::repeat_byte(0xf0);
        let child = Address::repeat_byte(0x5a);
        let tx_hash = B256::repeat_byte(0x77);

        let selector =
            alloy::primitives::hex::encode(ISaleFactory::createChildTypedCall::SELECTOR);
        let send = rpc_mock_matching(
            &mut server,
            Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({ "method": "eth_sendTransaction" })),
                Matcher::Regex(format!("0x{selector}")),
            ]),
            serde_json::json!(tx_hash),
        )
        .await;
        rpc_mock(
            &mut server,
            "eth_getTransactionReceipt",
            receipt_json(tx_hash, 1008, true, vec![new_child_log(factory_addr, child)]),
        )
        .await;
        rpc_mock(&mut server, "eth_blockNumber", serde_json::json!("0x3f0")).await;

        let provider = connect(Some(&server.url())).unwrap();
        let (sale, redeemable) = records();
        let deployment = SaleFactory::new(factory_addr)
            .with_receipt_timeout(Duration::from_secs(5))
            .deploy(&provider, Address::repeat_byte(0xaa), &sale, &redeemable)
            .await
            .unwrap();

        send.assert_async().await;
        assert_eq!(deployment.sale.address(), child);
        assert_eq!(deployment.tx_hash, tx_hash);
        assert_eq!(deployment.block_number, 1008);
    }

    #[tokio::test]
    async fn reverted_deploy_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let tx_hash = B256::repeat_byte(0x78);
        rpc_mock(&mut server, "eth_sendTransaction", serde_json::json!(tx_hash)).await;
        rpc_mock(
            &mut server,
            "eth_getTransactionReceipt",
            receipt_json(tx_hash, 1, false, vec![]),
        )
        .await;
        rpc_mock(&mut server, "eth_blockNumber", serde_json::json!("0x1")).await;

        let provider = connect(Some(&server.url())).unwrap();
        let (sale, redeemable) = records();
        let err = SaleFactory::new(Address::repeat_byte(0xf0))
            .with_receipt_timeout(Duration::from_secs(5))
            .deploy(&provider, Address::repeat_byte(0xaa), &sale, &redeemable)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Reverted { tx_hash: h } if h == tx_hash));
    }

    #[tokio::test]
    async fn unmined_deploy_times_out() {
        let mut server = mockito::Server::new_async().await;
        let tx_hash = B256::repeat_byte(1);
        rpc_mock(&mut server, "eth_sendTransaction", serde_json::json!(tx_hash)).await;
        rpc_mock(
            &mut server,
            "eth_getTransactionReceipt",
            serde_json::Value::Null,
        )
        .await;
        rpc_mock(&mut server, "eth_blockNumber", serde_json::json!("0x1")).await;

        let provider = connect(Some(&server.url())).unwrap();
        let (sale, redeemable) = records();
        let err = SaleFactory::new(Address::repeat_byte(0xf0))
            .with_receipt_timeout(Duration::from_millis(500))
            .deploy(&provider, Address::repeat_byte(0xaa), &sale, &redeemable)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Unconfirmed { tx_hash: h, .. } if h == tx_hash));
    }

    #[tokio::test]
    async fn calculate_price_decodes_uint() {
        let mut server = mockito::Server::new_async().await;
        let sale_addr = Address::repeat_byte(0x5a);
        let price = U256::from(75_000_000u64);
        rpc_mock(
            &mut server,
            "eth_call",
            serde_json::json!(Bytes::from(price.abi_encode())),
        )
        .await;

        let provider = connect(Some(&server.url())).unwrap();
        let got = DeployedSale::new(sale_addr)
            .calculate_price(&provider, Address::repeat_byte(0xaa), U256::from(1u64))
            .await
            .unwrap();
        assert_eq!(got, price);
    }
}
