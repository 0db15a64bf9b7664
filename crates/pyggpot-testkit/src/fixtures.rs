//! Pot fixtures and proptest strategies

use proptest::prelude::*;
use pyggpot_core::{
    Denomination, LedgerRow, LedgerStore, LedgerTransaction, NewLedgerRow, PotId, StoreError,
};
use std::collections::BTreeMap;

/// Insert one row per `(denomination, count)` pair and commit.
pub fn seed_pot<S>(
    store: &S,
    pot: PotId,
    rows: &[(Denomination, u64)],
) -> Result<Vec<LedgerRow>, StoreError>
where
    S: LedgerStore + ?Sized,
{
    let mut tx = store.begin()?;
    let inserted = rows
        .iter()
        .map(|&(denomination, count)| {
            tx.insert_row(NewLedgerRow {
                pot_id: pot,
                denomination,
                count,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    tx.commit()?;
    Ok(inserted)
}

/// Sum row counts per denomination.
pub fn denomination_totals(rows: &[LedgerRow]) -> BTreeMap<Denomination, u64> {
    let mut totals = BTreeMap::new();
    for row in rows {
        *totals.entry(row.denomination).or_insert(0) += row.count;
    }
    totals
}

/// Strategy for one removable denomination.
pub fn arb_denomination() -> impl Strategy<Value = Denomination> {
    prop::sample::select(Denomination::REMOVABLE.to_vec())
}

/// Strategy for the rows of a pot: up to `max_rows` rows, each holding up to
/// `max_count` coins (zero-count rows included).
pub fn arb_pot(max_rows: usize, max_count: u64) -> impl Strategy<Value = Vec<(Denomination, u64)>> {
    prop::collection::vec((arb_denomination(), 0..=max_count), 0..=max_rows)
}
