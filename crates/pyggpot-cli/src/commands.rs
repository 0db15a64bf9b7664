//! Command handlers
//!
//! Each handler runs one ledger operation and returns the response body that
//! `main` prints as JSON.

use anyhow::{anyhow, Context, Result};
use pyggpot_core::{Coins, Denomination, LedgerStore, PotId, RandomEffects};
use pyggpot_ledger::CoinLedger;
use serde::Serialize;

/// Response body shared by every command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinsListResponse {
    /// Coins added, removed or listed
    pub coins: Vec<Coins>,
}

/// Parse a `KIND=COUNT` argument.
///
/// `KIND` is a denomination name or its numeric wire code. Unrecognised
/// codes and negative counts are passed through so the ledger's own
/// validation reports them.
pub fn parse_coins(arg: &str) -> std::result::Result<Coins, String> {
    let (kind, count) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KIND=COUNT, got {arg:?}"))?;
    let denomination = kind
        .parse::<Denomination>()
        .or_else(|err| kind.parse::<i32>().map(Denomination::from_code).map_err(|_| err))
        .map_err(|err| err.to_string())?;
    let count = count
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid count {count:?}: {err}"))?;
    Ok(Coins::new(denomination, count))
}

/// Add coins to a pot
pub fn add<S, R>(ledger: &CoinLedger<S, R>, pot: PotId, coins: &[Coins]) -> Result<CoinsListResponse>
where
    S: LedgerStore,
    R: RandomEffects,
{
    if coins.is_empty() {
        return Err(anyhow!("nothing to add: pass at least one KIND=COUNT"));
    }
    let coins = ledger
        .add_coins(pot, coins)
        .with_context(|| format!("Failed to add coins to {pot}"))?;
    Ok(CoinsListResponse { coins })
}

/// Shake coins out of a pot
pub fn remove<S, R>(ledger: &CoinLedger<S, R>, pot: PotId, count: u64) -> Result<CoinsListResponse>
where
    S: LedgerStore,
    R: RandomEffects,
{
    let coins = ledger
        .remove_coins(pot, count)
        .with_context(|| format!("Failed to remove coins from {pot}"))?;
    Ok(CoinsListResponse { coins })
}

/// List the rows of a pot
pub fn list<S, R>(ledger: &CoinLedger<S, R>, pot: PotId) -> Result<CoinsListResponse>
where
    S: LedgerStore,
    R: RandomEffects,
{
    let coins = ledger
        .list_coins(pot)
        .with_context(|| format!("Failed to list coins in {pot}"))?;
    Ok(CoinsListResponse { coins })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyggpot_core::PotError;
    use pyggpot_effects::{MemoryLedgerHandler, SeededRandomHandler};

    fn ledger() -> CoinLedger<MemoryLedgerHandler, SeededRandomHandler> {
        CoinLedger::new(MemoryLedgerHandler::new(), SeededRandomHandler::with_seed(1))
    }

    #[test]
    fn parses_names_and_codes() {
        assert_eq!(parse_coins("gold=3"), Ok(Coins::new(Denomination::Gold, 3)));
        assert_eq!(parse_coins("BRONZE=0"), Ok(Coins::new(Denomination::Bronze, 0)));
        assert_eq!(parse_coins("2=5"), Ok(Coins::new(Denomination::Silver, 5)));
        assert_eq!(parse_coins("9=5"), Ok(Coins::new(Denomination::Unknown, 5)));
        assert_eq!(parse_coins("gold=-1"), Ok(Coins::new(Denomination::Gold, -1)));
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(parse_coins("gold").is_err());
        assert!(parse_coins("copper=1").is_err());
        assert!(parse_coins("gold=many").is_err());
    }

    #[test]
    fn add_remove_list_flow() {
        let ledger = ledger();
        let pot = PotId(5);

        add(&ledger, pot, &[Coins::new(Denomination::Gold, 2)]).unwrap();
        let removed = remove(&ledger, pot, 1).unwrap();
        assert_eq!(removed.coins, vec![Coins::new(Denomination::Gold, 1)]);

        let listed = list(&ledger, pot).unwrap();
        assert_eq!(listed.coins, vec![Coins::new(Denomination::Gold, 1)]);
    }

    #[test]
    fn validation_error_is_kept_in_the_chain() {
        let err = add(&ledger(), PotId(1), &[Coins::new(Denomination::Gold, -1)]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PotError>(),
            Some(PotError::Validation { .. })
        ));
    }

    #[test]
    fn empty_add_is_refused() {
        assert!(add(&ledger(), PotId(1), &[]).is_err());
    }

    #[test]
    fn response_serializes_as_coin_list() {
        let response = CoinsListResponse {
            coins: vec![Coins::new(Denomination::Silver, 4)],
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"coins":[{"kind":"SILVER","count":4}]}"#
        );
    }
}
