//! Fee Tier Engine
//!
//! Pure fee computation shared by the fee manager contract and the stations.
//! The same function backs both the `Quote` query and the `Bridge` execution,
//! so an estimate and the settlement it describes can never diverge.
//!
//! ## Tier Selection
//!
//! A table is an ordered list of `(threshold, fee_rate_bps)` pairs with strictly
//! increasing thresholds, the last one being `Uint128::MAX`. The applicable tier
//! is the first whose threshold is `>=` the amount, so a boundary amount uses
//! the lower tier.
//!
//! | Tier | Threshold (6 decimals) | Default rate |
//! |------|------------------------|--------------|
//! | 0    | 1,000                  | 1.50% (150 bps) |
//! | 1    | 10,000                 | 1.25% (125 bps) |
//! | 2    | 100,000                | 1.10% (110 bps) |
//! | 3    | 1,000,000              | 1.00% (100 bps) |
//! | 4    | max                    | 0.50% (50 bps)  |
//!
//! ## Fee Split
//!
//! The total fee is split into a protocol component (`protocol_share_bps` of the
//! fee, floored) and a relayer component (the remainder). With the default
//! 80/20 split a 1% tier charges 0.8% + 0.2%.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Precision the tier thresholds and the wire amounts are expressed in
pub const CANONICAL_DECIMALS: u8 = 6;

/// Basis points denominator (10000 = 100%)
pub const FEE_DENOMINATOR: u128 = 10_000;

/// Maximum tier rate in basis points (10%)
pub const MAX_FEE_RATE_BPS: u64 = 1_000;

/// Default protocol share of the total fee (80%)
pub const DEFAULT_PROTOCOL_SHARE_BPS: u64 = 8_000;

/// Sanity ceiling for a single transfer amount
pub const AMOUNT_CEILING: u128 = 1_000_000_000_000_000_000_000_000_000_000;

/// Finite default thresholds, canonical units
pub const DEFAULT_THRESHOLDS: [u128; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Default rates, one per threshold plus the unbounded tier
pub const DEFAULT_FEE_RATES_BPS: [u64; 5] = [150, 125, 110, 100, 50];

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug, PartialEq)]
pub enum FeeError {
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Invalid fee tier table: {reason}")]
    InvalidTierTable { reason: String },

    #[error("Invalid fee split: protocol share {share_bps} bps exceeds {max_bps} bps")]
    InvalidSplit { share_bps: u64, max_bps: u64 },

    #[error("Invalid decimals: {decimals} (minimum {min})")]
    InvalidDecimals { decimals: u8, min: u8 },
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single `(threshold, rate)` pair
#[cw_serde]
pub struct FeeTier {
    /// Inclusive upper bound of the tier, canonical units
    pub threshold: Uint128,
    /// Total fee rate in basis points
    pub fee_rate_bps: u64,
}

/// Ordered fee tier table
#[cw_serde]
pub struct FeeTierTable {
    pub tiers: Vec<FeeTier>,
}

impl FeeTierTable {
    /// Build a validated table
    pub fn new(tiers: Vec<FeeTier>) -> Result<Self, FeeError> {
        let table = Self { tiers };
        table.validate()?;
        Ok(table)
    }

    /// The five-tier table stations start with
    pub fn default_tiers() -> Self {
        let mut tiers: Vec<FeeTier> = DEFAULT_THRESHOLDS
            .iter()
            .zip(DEFAULT_FEE_RATES_BPS.iter())
            .map(|(threshold, rate)| FeeTier {
                threshold: Uint128::new(*threshold),
                fee_rate_bps: *rate,
            })
            .collect();
        tiers.push(FeeTier {
            threshold: Uint128::MAX,
            fee_rate_bps: DEFAULT_FEE_RATES_BPS[4],
        });
        Self { tiers }
    }

    /// Check the ordering and coverage invariants
    pub fn validate(&self) -> Result<(), FeeError> {
        let last = self.tiers.last().ok_or_else(|| FeeError::InvalidTierTable {
            reason: "table must contain at least one tier".to_string(),
        })?;
        if last.threshold != Uint128::MAX {
            return Err(FeeError::InvalidTierTable {
                reason: "last threshold must be the maximum amount".to_string(),
            });
        }
        for pair in self.tiers.windows(2) {
            if pair[0].threshold >= pair[1].threshold {
                return Err(FeeError::InvalidTierTable {
                    reason: format!(
                        "thresholds must be strictly increasing ({} >= {})",
                        pair[0].threshold, pair[1].threshold
                    ),
                });
            }
        }
        if let Some(tier) = self.tiers.iter().find(|t| t.fee_rate_bps > MAX_FEE_RATE_BPS) {
            return Err(FeeError::InvalidTierTable {
                reason: format!(
                    "rate {} bps exceeds max {} bps",
                    tier.fee_rate_bps, MAX_FEE_RATE_BPS
                ),
            });
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Vec<Uint128> {
        self.tiers.iter().map(|t| t.threshold).collect()
    }

    /// Select the first tier whose threshold, rescaled to `decimals`, is `>= amount`
    pub fn select(&self, amount: Uint128, decimals: u8) -> Result<(usize, &FeeTier), FeeError> {
        self.tiers
            .iter()
            .enumerate()
            .find(|(_, tier)| rescale_threshold(tier.threshold, decimals) >= amount)
            .ok_or_else(|| FeeError::InvalidTierTable {
                reason: format!("no tier covers amount {}", amount),
            })
    }
}

/// How the total fee is divided between components
#[cw_serde]
pub struct FeeSplit {
    /// Share of the total fee paid to the protocol, in basis points
    pub protocol_share_bps: u64,
}

impl Default for FeeSplit {
    fn default() -> Self {
        Self {
            protocol_share_bps: DEFAULT_PROTOCOL_SHARE_BPS,
        }
    }
}

impl FeeSplit {
    pub fn validate(&self) -> Result<(), FeeError> {
        if self.protocol_share_bps as u128 > FEE_DENOMINATOR {
            return Err(FeeError::InvalidSplit {
                share_bps: self.protocol_share_bps,
                max_bps: FEE_DENOMINATOR as u64,
            });
        }
        Ok(())
    }

    /// Split `fee` into components; the relayer component takes the rounding remainder
    pub fn split(&self, fee: Uint128) -> Vec<FeeComponent> {
        let protocol = fee.multiply_ratio(self.protocol_share_bps as u128, FEE_DENOMINATOR);
        let relayer = fee - protocol;
        vec![
            FeeComponent {
                kind: FeeComponentKind::Protocol,
                amount: protocol,
            },
            FeeComponent {
                kind: FeeComponentKind::Relayer,
                amount: relayer,
            },
        ]
    }
}

/// Named fee component
#[cw_serde]
pub enum FeeComponentKind {
    Protocol,
    Relayer,
}

impl FeeComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeComponentKind::Protocol => "protocol",
            FeeComponentKind::Relayer => "relayer",
        }
    }
}

#[cw_serde]
pub struct FeeComponent {
    pub kind: FeeComponentKind,
    pub amount: Uint128,
}

/// Result of a fee computation
#[cw_serde]
pub struct FeeBreakdown {
    /// Amount the fee was computed on
    pub gross: Uint128,
    /// `gross` minus every component
    pub net: Uint128,
    /// Index of the applied tier
    pub tier_index: u32,
    /// Rate of the applied tier
    pub fee_rate_bps: u64,
    pub components: Vec<FeeComponent>,
}

impl FeeBreakdown {
    pub fn total_fee(&self) -> Uint128 {
        self.components
            .iter()
            .fold(Uint128::zero(), |acc, c| acc + c.amount)
    }

    pub fn component(&self, kind: FeeComponentKind) -> Uint128 {
        self.components
            .iter()
            .filter(|c| c.kind == kind)
            .fold(Uint128::zero(), |acc, c| acc + c.amount)
    }

    /// Re-express every amount at `decimals` precision (exact, canonical → local)
    pub fn to_local(&self, decimals: u8) -> Result<Self, FeeError> {
        let components = self
            .components
            .iter()
            .map(|c| {
                Ok(FeeComponent {
                    kind: c.kind.clone(),
                    amount: from_canonical(c.amount, decimals)?,
                })
            })
            .collect::<Result<Vec<_>, FeeError>>()?;
        Ok(Self {
            gross: from_canonical(self.gross, decimals)?,
            net: from_canonical(self.net, decimals)?,
            tier_index: self.tier_index,
            fee_rate_bps: self.fee_rate_bps,
            components,
        })
    }
}

// ============================================================================
// Fee Calculation
// ============================================================================

/// Compute the net amount and fee components for `amount` at `decimals` precision.
pub fn compute_fee(
    amount: Uint128,
    decimals: u8,
    table: &FeeTierTable,
    split: &FeeSplit,
) -> Result<FeeBreakdown, FeeError> {
    if amount.is_zero() {
        return Err(FeeError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }
    if amount > Uint128::new(AMOUNT_CEILING) {
        return Err(FeeError::InvalidAmount {
            reason: format!("amount {} exceeds ceiling {}", amount, AMOUNT_CEILING),
        });
    }
    split.validate()?;

    let (tier_index, tier) = table.select(amount, decimals)?;
    let fee = amount.multiply_ratio(tier.fee_rate_bps as u128, FEE_DENOMINATOR);
    let net = amount
        .checked_sub(fee)
        .map_err(|_| FeeError::InvalidAmount {
            reason: "fee exceeds amount".to_string(),
        })?;

    Ok(FeeBreakdown {
        gross: amount,
        net,
        tier_index: tier_index as u32,
        fee_rate_bps: tier.fee_rate_bps,
        components: split.split(fee),
    })
}

/// Rescale a canonical threshold to `decimals`; `MAX` stays unbounded
fn rescale_threshold(threshold: Uint128, decimals: u8) -> Uint128 {
    if threshold == Uint128::MAX || decimals == CANONICAL_DECIMALS {
        return threshold;
    }
    if decimals > CANONICAL_DECIMALS {
        match pow10(decimals - CANONICAL_DECIMALS) {
            Some(factor) => threshold.checked_mul(factor).unwrap_or(Uint128::MAX),
            None => Uint128::MAX,
        }
    } else {
        match pow10(CANONICAL_DECIMALS - decimals) {
            Some(factor) => threshold / factor,
            None => Uint128::zero(),
        }
    }
}

fn pow10(exp: u8) -> Option<Uint128> {
    10u128.checked_pow(exp as u32).map(Uint128::new)
}

// ============================================================================
// Decimal Normalization
// ============================================================================

fn canonical_factor(decimals: u8) -> Result<Uint128, FeeError> {
    if decimals < CANONICAL_DECIMALS {
        return Err(FeeError::InvalidDecimals {
            decimals,
            min: CANONICAL_DECIMALS,
        });
    }
    pow10(decimals - CANONICAL_DECIMALS).ok_or(FeeError::InvalidDecimals {
        decimals,
        min: CANONICAL_DECIMALS,
    })
}

/// Convert a local amount to canonical units, dropping sub-canonical dust
pub fn to_canonical(amount: Uint128, decimals: u8) -> Result<Uint128, FeeError> {
    let factor = canonical_factor(decimals)?;
    Ok(amount / factor)
}

/// Convert a canonical amount to local units
pub fn from_canonical(amount: Uint128, decimals: u8) -> Result<Uint128, FeeError> {
    let factor = canonical_factor(decimals)?;
    amount
        .checked_mul(factor)
        .map_err(|_| FeeError::InvalidAmount {
            reason: format!("{} overflows {} decimal precision", amount, decimals),
        })
}

/// Largest amount not above `amount` that converts to canonical units exactly
pub fn strip_dust(amount: Uint128, decimals: u8) -> Result<Uint128, FeeError> {
    from_canonical(to_canonical(amount, decimals)?, decimals)
}
