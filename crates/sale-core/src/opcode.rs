//! Opcode programs for the sale contract's virtual machine.
//!
//! A program is a [`StateConfig`]: one or more byte sources plus a table of
//! constants. Each instruction in a source is two bytes, the opcode followed
//! by its operand. The VM itself runs on chain; this module only assembles
//! and disassembles programs.

use crate::error::{Result, SaleError};
use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// Opcodes understood by the sale VM, in on-chain numbering order.
///
/// Codes 0..=4 are the core VM ops, 5..=43 the standard ops and 44..=52 the
/// sale-local ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Opcode {
    Skip,
    Val,
    Dup,
    Zipmap,
    Debug,
    BlockNumber,
    BlockTimestamp,
    Sender,
    ThisAddress,
    Scale18Mul,
    Scale18Div,
    Scale18,
    ScaleN,
    ScaleBy,
    Add,
    SaturatingAdd,
    Sub,
    SaturatingSub,
    Mul,
    SaturatingMul,
    Div,
    Mod,
    Exp,
    Min,
    Max,
    IsZero,
    EagerIf,
    EqualTo,
    LessThan,
    GreaterThan,
    Every,
    Any,
    Report,
    Never,
    Always,
    SaturatingDiff,
    UpdateBlocksForTierRange,
    SelectLte,
    Ierc20BalanceOf,
    Ierc20TotalSupply,
    Ierc721BalanceOf,
    Ierc721OwnerOf,
    Ierc1155BalanceOf,
    Ierc1155BalanceOfBatch,
    RemainingUnits,
    TotalReserveIn,
    LastReserveIn,
    LastBuyBlock,
    LastBuyUnits,
    LastBuyPrice,
    CurrentBuyUnits,
    TokenAddress,
    ReserveAddress,
}

const OPCODES: [Opcode; 53] = [
    Opcode::Skip,
    Opcode::Val,
    Opcode::Dup,
    Opcode::Zipmap,
    Opcode::Debug,
    Opcode::BlockNumber,
    Opcode::BlockTimestamp,
    Opcode::Sender,
    Opcode::ThisAddress,
    Opcode::Scale18Mul,
    Opcode::Scale18Div,
    Opcode::Scale18,
    Opcode::ScaleN,
    Opcode::ScaleBy,
    Opcode::Add,
    Opcode::SaturatingAdd,
    Opcode::Sub,
    Opcode::SaturatingSub,
    Opcode::Mul,
    Opcode::SaturatingMul,
    Opcode::Div,
    Opcode::Mod,
    Opcode::Exp,
    Opcode::Min,
    Opcode::Max,
    Opcode::IsZero,
    Opcode::EagerIf,
    Opcode::EqualTo,
    Opcode::LessThan,
    Opcode::GreaterThan,
    Opcode::Every,
    Opcode::Any,
    Opcode::Report,
    Opcode::Never,
    Opcode::Always,
    Opcode::SaturatingDiff,
    Opcode::UpdateBlocksForTierRange,
    Opcode::SelectLte,
    Opcode::Ierc20BalanceOf,
    Opcode::Ierc20TotalSupply,
    Opcode::Ierc721BalanceOf,
    Opcode::Ierc721OwnerOf,
    Opcode::Ierc1155BalanceOf,
    Opcode::Ierc1155BalanceOfBatch,
    Opcode::RemainingUnits,
    Opcode::TotalReserveIn,
    Opcode::LastReserveIn,
    Opcode::LastBuyBlock,
    Opcode::LastBuyUnits,
    Opcode::LastBuyPrice,
    Opcode::CurrentBuyUnits,
    Opcode::TokenAddress,
    Opcode::ReserveAddress,
];

const NAMES: [&str; 53] = [
    "SKIP",
    "VAL",
    "DUP",
    "ZIPMAP",
    "DEBUG",
    "BLOCK_NUMBER",
    "BLOCK_TIMESTAMP",
    "SENDER",
    "THIS_ADDRESS",
    "SCALE18_MUL",
    "SCALE18_DIV",
    "SCALE18",
    "SCALEN",
    "SCALE_BY",
    "ADD",
    "SATURATING_ADD",
    "SUB",
    "SATURATING_SUB",
    "MUL",
    "SATURATING_MUL",
    "DIV",
    "MOD",
    "EXP",
    "MIN",
    "MAX",
    "ISZERO",
    "EAGER_IF",
    "EQUAL_TO",
    "LESS_THAN",
    "GREATER_THAN",
    "EVERY",
    "ANY",
    "REPORT",
    "NEVER",
    "ALWAYS",
    "SATURATING_DIFF",
    "UPDATE_BLOCKS_FOR_TIER_RANGE",
    "SELECT_LTE",
    "IERC20_BALANCE_OF",
    "IERC20_TOTAL_SUPPLY",
    "IERC721_BALANCE_OF",
    "IERC721_OWNER_OF",
    "IERC1155_BALANCE_OF",
    "IERC1155_BALANCE_OF_BATCH",
    "REMAINING_UNITS",
    "TOTAL_RESERVE_IN",
    "LAST_RESERVE_IN",
    "LAST_BUY_BLOCK",
    "LAST_BUY_UNITS",
    "LAST_BUY_PRICE",
    "CURRENT_BUY_UNITS",
    "TOKEN_ADDRESS",
    "RESERVE_ADDRESS",
];

impl Opcode {
    pub fn all() -> &'static [Opcode] {
        &OPCODES
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Opcode> {
        OPCODES.get(code as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        NAMES[self as usize]
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Op
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Op {
    pub opcode: Opcode,
    pub operand: u8,
}

impl Op {
    pub fn to_bytes(self) -> [u8; 2] {
        [self.opcode.code(), self.operand]
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operand == 0 && self.opcode != Opcode::Val {
            write!(f, "{}", self.opcode)
        } else {
            write!(f, "{} {}", self.opcode, self.operand)
        }
    }
}

pub fn op(opcode: Opcode, operand: u8) -> Op {
    Op { opcode, operand }
}

/// Concatenate instructions into a single program source.
pub fn source(ops: &[Op]) -> Bytes {
    let bytes: Vec<u8> = ops.iter().flat_map(|o| o.to_bytes()).collect();
    Bytes::from(bytes)
}

// ---------------------------------------------------------------------------
// StateConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    pub sources: Vec<Bytes>,
    pub constants: Vec<U256>,
}

impl StateConfig {
    pub fn new(sources: Vec<Bytes>, constants: Vec<U256>) -> Self {
        Self { sources, constants }
    }

    /// Decode every source back into instructions.
    pub fn disassemble(&self) -> Result<Vec<Vec<Op>>> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, src)| disassemble_source(i, src))
            .collect()
    }

    /// Check that every source decodes and every `VAL` reads an existing
    /// constant.
    pub fn validate(&self) -> Result<()> {
        for (i, ops) in self.disassemble()?.iter().enumerate() {
            for o in ops {
                if o.opcode == Opcode::Val && o.operand as usize >= self.constants.len() {
                    return Err(SaleError::InvalidProgram(format!(
                        "source {i}: VAL {} is out of range ({} constants)",
                        o.operand,
                        self.constants.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn disassemble_source(index: usize, src: &Bytes) -> Result<Vec<Op>> {
    if src.len() % 2 != 0 {
        return Err(SaleError::InvalidProgram(format!(
            "source {index} has odd length {}",
            src.len()
        )));
    }
    src.chunks_exact(2)
        .map(|pair| {
            let opcode = Opcode::from_code(pair[0]).ok_or_else(|| {
                SaleError::InvalidProgram(format!("source {index}: unknown opcode {}", pair[0]))
            })?;
            Ok(op(opcode, pair[1]))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Program builders
// ---------------------------------------------------------------------------

/// Program that becomes true once the chain reaches `block`.
pub fn after_block_number(block: u64) -> StateConfig {
    StateConfig::new(
        vec![source(&[
            op(Opcode::BlockNumber, 0),
            op(Opcode::Val, 0),
            op(Opcode::GreaterThan, 0),
        ])],
        vec![U256::from(block.saturating_sub(1))],
    )
}

pub const PRICE_CONSTANT: u8 = 0;
pub const WALLET_CAP_CONSTANT: u8 = 1;
pub const SENTINEL_CONSTANT: u8 = 2;

/// Static price program with a per-wallet cap.
///
/// Evaluates `units + token.balanceOf(sender) > wallet_cap`; when the cap is
/// exceeded the price is `U256::MAX`, which no buyer can pay, otherwise
/// `static_price`.
pub fn wallet_capped_price(static_price: U256, wallet_cap: U256) -> StateConfig {
    StateConfig::new(
        vec![source(&[
            op(Opcode::CurrentBuyUnits, 0),
            op(Opcode::TokenAddress, 0),
            op(Opcode::Sender, 0),
            op(Opcode::Ierc20BalanceOf, 0),
            op(Opcode::Add, 2),
            op(Opcode::Val, WALLET_CAP_CONSTANT),
            op(Opcode::GreaterThan, 0),
            op(Opcode::Val, SENTINEL_CONSTANT),
            op(Opcode::Val, PRICE_CONSTANT),
            op(Opcode::EagerIf, 0),
        ])],
        vec![static_price, wallet_cap, U256::MAX],
    )
}
