//! Domain types for coin pots and their ledger rows

use crate::errors::{PotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a pot.
///
/// No pot entity is persisted; the id only exists as the foreign key on
/// ledger rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PotId(pub u64);

impl fmt::Display for PotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pot:{}", self.0)
    }
}

impl From<u64> for PotId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifier of a single ledger row, assigned by the store on insert.
///
/// Stores hand out row ids in increasing order, so ordering by row id is
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row:{}", self.0)
    }
}

/// Coin denomination.
///
/// Discriminants are the wire codes of the coin RPC schema. `Unknown` is a
/// sentinel for unrecognised codes; it is never a valid insert or removal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum Denomination {
    /// Unrecognised denomination
    #[default]
    Unknown = 0,
    /// Gold coin
    Gold = 1,
    /// Silver coin
    Silver = 2,
    /// Bronze coin
    Bronze = 3,
}

impl Denomination {
    /// Denominations that can be held and removed, in sampling order.
    pub const REMOVABLE: [Denomination; 3] =
        [Denomination::Gold, Denomination::Silver, Denomination::Bronze];

    /// Map a wire code to a denomination; unrecognised codes become `Unknown`.
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Gold,
            2 => Self::Silver,
            3 => Self::Bronze,
            _ => Self::Unknown,
        }
    }

    /// Wire code of this denomination.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Whether this is one of the three real coin kinds.
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Upper-case name used in logs and JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Gold => "GOLD",
            Self::Silver => "SILVER",
            Self::Bronze => "BRONZE",
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a denomination name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown denomination: {0}")]
pub struct UnknownDenomination(pub String);

impl FromStr for Denomination {
    type Err = UnknownDenomination;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "bronze" => Ok(Self::Bronze),
            _ => Err(UnknownDenomination(s.to_string())),
        }
    }
}

/// A persisted ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Row identifier
    pub id: RowId,
    /// Pot the coins belong to
    pub pot_id: PotId,
    /// Kind of coin held by this row
    pub denomination: Denomination,
    /// Number of coins held by this row
    pub count: u64,
}

/// Insert payload for a ledger row; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerRow {
    /// Pot the coins belong to
    pub pot_id: PotId,
    /// Kind of coin
    pub denomination: Denomination,
    /// Number of coins
    pub count: u64,
}

impl NewLedgerRow {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: RowId) -> LedgerRow {
        LedgerRow {
            id,
            pot_id: self.pot_id,
            denomination: self.denomination,
            count: self.count,
        }
    }
}

/// A `(denomination, count)` entry as it crosses the service boundary.
///
/// Incoming entries may be malformed (negative count, `Unknown` kind) and are
/// validated before use. Outgoing entries are always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins {
    /// Kind of coin
    #[serde(rename = "kind")]
    pub denomination: Denomination,
    /// Number of coins
    pub count: i64,
}

impl Coins {
    /// Largest count an entry can carry, and so the most coins a pot may
    /// hold.
    pub const MAX_COUNT: u64 = i64::MAX as u64;

    /// Create a coin entry.
    pub fn new(denomination: Denomination, count: i64) -> Self {
        Self {
            denomination,
            count,
        }
    }

    fn from_stored(denomination: Denomination, count: u64) -> Result<Self> {
        let count = i64::try_from(count).map_err(|_| {
            PotError::consistency(format!("{denomination} count {count} exceeds i64::MAX"))
        })?;
        Ok(Self::new(denomination, count))
    }
}

impl TryFrom<&LedgerRow> for Coins {
    type Error = PotError;

    fn try_from(row: &LedgerRow) -> Result<Self> {
        Self::from_stored(row.denomination, row.count)
    }
}

/// Coins removed by one shake, per denomination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalSummary {
    removed: BTreeMap<Denomination, u64>,
}

impl RemovalSummary {
    /// Empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one removed coin.
    pub fn record(&mut self, denomination: Denomination) {
        *self.removed.entry(denomination).or_insert(0) += 1;
    }

    /// Coins removed of the given denomination.
    pub fn removed(&self, denomination: Denomination) -> u64 {
        self.removed.get(&denomination).copied().unwrap_or(0)
    }

    /// Total coins removed across all denominations.
    pub fn total(&self) -> u64 {
        self.removed.values().sum()
    }

    /// True when nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate `(denomination, removed)` pairs with a nonzero count, in
    /// GOLD, SILVER, BRONZE order.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u64)> + '_ {
        self.removed
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(denomination, count)| (*denomination, *count))
    }

    /// Render as service-boundary coin entries.
    ///
    /// Fails with [`PotError::Consistency`] when a count does not fit an
    /// entry, which a pot within [`Coins::MAX_COUNT`] never produces.
    pub fn to_coins(&self) -> Result<Vec<Coins>> {
        self.iter()
            .map(|(denomination, count)| Coins::from_stored(denomination, count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denomination_codes_round_trip() {
        for denomination in Denomination::REMOVABLE {
            assert_eq!(Denomination::from_code(denomination.code()), denomination);
        }
        assert_eq!(Denomination::from_code(0), Denomination::Unknown);
        assert_eq!(Denomination::from_code(42), Denomination::Unknown);
        assert_eq!(Denomination::from_code(-1), Denomination::Unknown);
    }

    #[test]
    fn denomination_parses_case_insensitively() {
        assert_eq!("GOLD".parse::<Denomination>(), Ok(Denomination::Gold));
        assert_eq!("Silver".parse::<Denomination>(), Ok(Denomination::Silver));
        assert_eq!("bronze".parse::<Denomination>(), Ok(Denomination::Bronze));
        assert!("unknown".parse::<Denomination>().is_err());
        assert!("copper".parse::<Denomination>().is_err());
    }

    #[test]
    fn coins_serialize_with_kind_names() {
        let json = serde_json::to_string(&Coins::new(Denomination::Gold, 3)).unwrap();
        assert_eq!(json, r#"{"kind":"GOLD","count":3}"#);
    }

    #[test]
    fn summary_orders_gold_silver_bronze_and_skips_empty() {
        let mut summary = RemovalSummary::new();
        summary.record(Denomination::Bronze);
        summary.record(Denomination::Gold);
        summary.record(Denomination::Bronze);

        assert_eq!(
            summary.to_coins().unwrap(),
            vec![
                Coins::new(Denomination::Gold, 1),
                Coins::new(Denomination::Bronze, 2),
            ]
        );
        assert_eq!(summary.removed(Denomination::Silver), 0);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn oversized_row_count_is_not_clamped() {
        let row = LedgerRow {
            id: RowId(1),
            pot_id: PotId(1),
            denomination: Denomination::Gold,
            count: Coins::MAX_COUNT + 1,
        };
        assert!(matches!(
            Coins::try_from(&row),
            Err(PotError::Consistency { .. })
        ));

        let row = LedgerRow {
            count: Coins::MAX_COUNT,
            ..row
        };
        assert_eq!(
            Coins::try_from(&row),
            Ok(Coins::new(Denomination::Gold, i64::MAX))
        );
    }
}
