use crate::error::{Result, SaleError};
use crate::opcode::{self, StateConfig};
use alloy_primitives::utils::parse_units;
use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

/// Redeemable sale tokens always carry 18 decimals.
pub const TOKEN_DECIMALS: u8 = 18;

// ---------------------------------------------------------------------------
// Records handed to the sale factory
// ---------------------------------------------------------------------------

/// Sale contract configuration. Durations are counted in blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    pub can_start: StateConfig,
    pub can_end: StateConfig,
    pub calculate_price: StateConfig,
    pub recipient: Address,
    pub reserve: Address,
    pub sale_timeout: u64,
    pub cooldown_duration: u64,
    pub minimum_raise: U256,
    pub dust_size: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Config {
    pub name: String,
    pub symbol: String,
    pub distributor: Address,
    pub initial_supply: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemableConfig {
    pub erc20: Erc20Config,
    pub tier: Address,
    pub minimum_tier: u8,
    pub distribution_end_forwarding_address: Address,
}

// ---------------------------------------------------------------------------
// SaleParams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenParams {
    #[serde(default = "default_token_name")]
    pub name: String,
    #[serde(default = "default_token_symbol")]
    pub symbol: String,
    /// Whole tokens; scaled by [`TOKEN_DECIMALS`].
    #[serde(default = "default_initial_supply")]
    pub initial_supply: String,
    #[serde(default)]
    pub distributor: Address,
}

fn default_token_name() -> String {
    "Raise token".to_string()
}

fn default_token_symbol() -> String {
    "rTKN".to_string()
}

fn default_initial_supply() -> String {
    "1000".to_string()
}

impl Default for TokenParams {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            initial_supply: default_initial_supply(),
            distributor: Address::ZERO,
        }
    }
}

/// User-facing sale parameters, as written in the project config.
///
/// Reserve-denominated amounts (`static_price`, `minimum_raise`,
/// `dust_size`) are decimal strings scaled by `reserve_decimals`. Token
/// amounts (`wallet_cap`, `token.initial_supply`) are scaled by 18 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleParams {
    #[serde(default = "default_reserve")]
    pub reserve: Address,
    #[serde(default = "default_reserve_decimals")]
    pub reserve_decimals: u8,
    #[serde(default = "default_start_delay")]
    pub start_delay_blocks: u64,
    #[serde(default = "default_duration")]
    pub duration_blocks: u64,
    #[serde(default = "default_sale_timeout")]
    pub sale_timeout_blocks: u64,
    #[serde(default = "default_cooldown")]
    pub cooldown_blocks: u64,
    #[serde(default = "default_minimum_raise")]
    pub minimum_raise: String,
    #[serde(default = "default_dust_size")]
    pub dust_size: String,
    #[serde(default = "default_static_price")]
    pub static_price: String,
    #[serde(default = "default_wallet_cap")]
    pub wallet_cap: String,
    #[serde(default)]
    pub token: TokenParams,
    #[serde(default = "default_tier")]
    pub tier: Address,
    #[serde(default)]
    pub minimum_tier: u8,
    #[serde(default)]
    pub forwarding_address: Address,
}

fn default_reserve() -> Address {
    address!("25a4dd4cd97ed462eb5228de47822e636ec3e31a")
}

fn default_reserve_decimals() -> u8 {
    6
}

fn default_start_delay() -> u64 {
    5
}

fn default_duration() -> u64 {
    100
}

fn default_sale_timeout() -> u64 {
    100
}

fn default_cooldown() -> u64 {
    100
}

fn default_minimum_raise() -> String {
    "1000".to_string()
}

fn default_dust_size() -> String {
    "0".to_string()
}

fn default_static_price() -> String {
    "75".to_string()
}

fn default_wallet_cap() -> String {
    "10".to_string()
}

fn default_tier() -> Address {
    address!("c064055dff6de32f44bb7ccb0ca59cbd8434b2de")
}

impl Default for SaleParams {
    fn default() -> Self {
        Self {
            reserve: default_reserve(),
            reserve_decimals: default_reserve_decimals(),
            start_delay_blocks: default_start_delay(),
            duration_blocks: default_duration(),
            sale_timeout_blocks: default_sale_timeout(),
            cooldown_blocks: default_cooldown(),
            minimum_raise: default_minimum_raise(),
            dust_size: default_dust_size(),
            static_price: default_static_price(),
            wallet_cap: default_wallet_cap(),
            token: TokenParams::default(),
            tier: default_tier(),
            minimum_tier: 0,
            forwarding_address: Address::ZERO,
        }
    }
}

impl SaleParams {
    /// Block at which the sale may start, given the chain head.
    pub fn start_block(&self, current_block: u64) -> u64 {
        current_block.saturating_add(self.start_delay_blocks)
    }

    pub fn end_block(&self, current_block: u64) -> u64 {
        self.start_block(current_block)
            .saturating_add(self.duration_blocks)
    }

    /// Build both factory records. `recipient` is the connected account and
    /// receives the raised reserve.
    pub fn build(
        &self,
        recipient: Address,
        current_block: u64,
    ) -> Result<(SaleConfig, RedeemableConfig)> {
        self.check()?;

        let static_price = parse_amount(&self.static_price, self.reserve_decimals)?;
        let wallet_cap = parse_amount(&self.wallet_cap, TOKEN_DECIMALS)?;
        if wallet_cap.is_zero() {
            return Err(SaleError::InvalidParams(
                "wallet_cap must be greater than zero".to_string(),
            ));
        }
        let initial_supply = parse_amount(&self.token.initial_supply, TOKEN_DECIMALS)?;
        if initial_supply.is_zero() {
            return Err(SaleError::InvalidParams(
                "token.initial_supply must be greater than zero".to_string(),
            ));
        }

        let sale = SaleConfig {
            can_start: opcode::after_block_number(self.start_block(current_block)),
            can_end: opcode::after_block_number(self.end_block(current_block)),
            calculate_price: opcode::wallet_capped_price(static_price, wallet_cap),
            recipient,
            reserve: self.reserve,
            sale_timeout: self.sale_timeout_blocks,
            cooldown_duration: self.cooldown_blocks,
            minimum_raise: parse_amount(&self.minimum_raise, self.reserve_decimals)?,
            dust_size: parse_amount(&self.dust_size, self.reserve_decimals)?,
        };

        let redeemable = RedeemableConfig {
            erc20: Erc20Config {
                name: self.token.name.clone(),
                symbol: self.token.symbol.clone(),
                distributor: self.token.distributor,
                initial_supply,
            },
            tier: self.tier,
            minimum_tier: self.minimum_tier,
            distribution_end_forwarding_address: self.forwarding_address,
        };

        Ok((sale, redeemable))
    }

    fn check(&self) -> Result<()> {
        if self.token.name.trim().is_empty() {
            return Err(SaleError::InvalidParams("token.name is empty".to_string()));
        }
        if self.token.symbol.trim().is_empty() {
            return Err(SaleError::InvalidParams("token.symbol is empty".to_string()));
        }
        if self.duration_blocks == 0 {
            return Err(SaleError::InvalidParams(
                "duration_blocks must be greater than zero".to_string(),
            ));
        }
        if self.reserve == Address::ZERO {
            return Err(SaleError::InvalidParams(
                "reserve is the zero address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a non-negative decimal string into base units.
///
/// More fractional digits than `decimals` is an error rather than a silent
/// truncation.
pub fn parse_amount(value: &str, decimals: u8) -> Result<U256> {
    let trimmed = value.trim();
    if trimmed.starts_with('-') {
        return Err(SaleError::InvalidAmount {
            value: value.to_string(),
            reason: "amount must not be negative".to_string(),
        });
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > usize::from(decimals) {
            return Err(SaleError::InvalidAmount {
                value: value.to_string(),
                reason: format!("more than {decimals} decimal places"),
            });
        }
    }
    parse_units(trimmed, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| SaleError::InvalidAmount {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
