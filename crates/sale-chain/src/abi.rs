//! Solidity interfaces of the sale factory and the sale contract.

use alloy::primitives::U256;
use alloy::sol;
use sale_core::{opcode, sale};

sol! {
    struct StateConfig {
        bytes[] sources;
        uint256[] constants;
    }

    struct SaleConfig {
        StateConfig canStartStateConfig;
        StateConfig canEndStateConfig;
        StateConfig calculatePriceStateConfig;
        address recipient;
        address reserve;
        uint256 saleTimeout;
        uint256 cooldownDuration;
        uint256 minimumRaise;
        uint256 dustSize;
    }

    struct ERC20Config {
        string name;
        string symbol;
        address distributor;
        uint256 initialSupply;
    }

    struct SaleRedeemableERC20Config {
        ERC20Config erc20Config;
        address tier;
        uint256 minimumTier;
        address distributionEndForwardingAddress;
    }

    #[sol(rpc)]
    interface ISaleFactory {
        event NewChild(address sender, address child);

        function createChildTyped(
            SaleConfig calldata config,
            SaleRedeemableERC20Config calldata saleRedeemableERC20Config
        ) external returns (address child);
    }

    #[sol(rpc)]
    interface ISale {
        function calculatePrice(uint256 units) external view returns (uint256 price);
    }
}

impl From<&opcode::StateConfig> for StateConfig {
    fn from(cfg: &opcode::StateConfig) -> Self {
        Self {
            sources: cfg.sources.clone(),
            constants: cfg.constants.clone(),
        }
    }
}

impl From<&sale::SaleConfig> for SaleConfig {
    fn from(cfg: &sale::SaleConfig) -> Self {
        Self {
            canStartStateConfig: (&cfg.can_start).into(),
            canEndStateConfig: (&cfg.can_end).into(),
            calculatePriceStateConfig: (&cfg.calculate_price).into(),
            recipient: cfg.recipient,
            reserve: cfg.reserve,
            saleTimeout: U256::from(cfg.sale_timeout),
            cooldownDuration: U256::from(cfg.cooldown_duration),
            minimumRaise: cfg.minimum_raise,
            dustSize: cfg.dust_size,
        }
    }
}

impl From<&sale::RedeemableConfig> for SaleRedeemableERC20Config {
    fn from(cfg: &sale::RedeemableConfig) -> Self {
        Self {
            erc20Config: ERC20Config {
                name: cfg.erc20.name.clone(),
                symbol: cfg.erc20.symbol.clone(),
                distributor: cfg.erc20.distributor,
                initialSupply: cfg.erc20.initial_supply,
            },
            tier: cfg.tier,
            minimumTier: U256::from(cfg.minimum_tier),
            distributionEndForwardingAddress: cfg.distribution_end_forwarding_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use alloy::sol_types::{SolCall, SolEvent};
    use sale_core::sale::SaleParams;

    #[test]
    fn create_child_typed_round_trips() {
        let (sale, redeemable) = SaleParams::default()
            .build(Address::repeat_byte(0xaa), 50)
            .unwrap();
        let call = ISaleFactory::createChildTypedCall {
            config: (&sale).into(),
            saleRedeemableERC20Config: (&redeemable).into(),
        };
        let encoded = call.abi_encode();
        assert_eq!(&encoded[..4], ISaleFactory::createChildTypedCall::SELECTOR.as_slice());

        let decoded = ISaleFactory::createChildTypedCall::abi_decode_validate(&encoded).unwrap();
        assert_eq!(decoded.config.recipient, Address::repeat_byte(0xaa));
        assert_eq!(decoded.config.saleTimeout, U256::from(100u64));
        assert_eq!(
            decoded.config.calculatePriceStateConfig.constants,
            sale.calculate_price.constants
        );
        assert_eq!(decoded.saleRedeemableERC20Config.erc20Config.symbol, "rTKN");
    }

    #[test]
    fn new_child_signature() {
        assert_eq!(ISaleFactory::NewChild::SIGNATURE, "NewChild(address,address)");
    }

    #[test]
    fn calculate_price_selector() {
        assert_eq!(ISale::calculatePriceCall::SIGNATURE, "calculatePrice(uint256)");
    }
}
