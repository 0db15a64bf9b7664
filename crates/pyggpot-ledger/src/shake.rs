//! Proportional sampler
//!
//! "Shaking" a pot removes `n` coins one at a time. Each draw picks a
//! denomination with probability equal to its *current* share of the pot,
//! so the weights are recomputed after every single removal (sampling
//! without replacement).
//!
//! A draw `r` in `[0, total)` maps onto consecutive ranges in the fixed order
//! GOLD, SILVER, BRONZE:
//!
//! ```text
//! 0            gold        gold+silver                 total
//! ├─── GOLD ───┼── SILVER ──┼────────── BRONZE ──────────┤
//! ```
//!
//! BRONZE is the unconditional fallthrough. The three aggregates always sum
//! to `total`, so any in-range draw past the silver boundary lands in a
//! nonempty bronze range. That branch has no upper-bound check; an
//! aggregation bug shows up as a missing bronze row.
//!
//! The sampler is pure. It reads a snapshot slice and returns a new
//! snapshot; persisting the result is the caller's job (see
//! [`crate::apply`]).

use pyggpot_core::{
    Denomination, LedgerRow, PotError, RandomEffects, RemovalSummary, Result, RowId,
};
use tracing::debug;

/// Result of shaking one pot snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShakeOutcome {
    /// Coins removed per denomination
    pub removed: RemovalSummary,
    /// Rows whose count changed and is still positive
    pub updated: Vec<LedgerRow>,
    /// Rows whose count changed and reached zero
    pub deleted: Vec<RowId>,
    /// Every input row with its post-removal count, in input order
    pub remaining: Vec<LedgerRow>,
}

impl ShakeOutcome {
    /// Coins left in the pot after the shake.
    pub fn remaining_total(&self) -> u64 {
        self.remaining
            .iter()
            .filter(|row| row.denomination.is_recognized())
            .map(|row| row.count)
            .sum()
    }
}

/// Per-denomination coin counts of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    gold: u64,
    silver: u64,
    bronze: u64,
    total: u64,
}

impl Tally {
    /// Sum the snapshot. Rows of unknown denomination are left out so the
    /// three aggregates sum exactly to `total`.
    fn from_rows(rows: &[LedgerRow]) -> Result<Self> {
        let mut tally = Self::default();
        for row in rows {
            let slot = match row.denomination {
                Denomination::Gold => &mut tally.gold,
                Denomination::Silver => &mut tally.silver,
                Denomination::Bronze => &mut tally.bronze,
                Denomination::Unknown => {
                    debug!(row = %row.id, count = row.count, "skipping row of unknown denomination");
                    continue;
                }
            };
            *slot = slot
                .checked_add(row.count)
                .ok_or_else(|| PotError::consistency("coin total overflows u64"))?;
            tally.total = tally
                .total
                .checked_add(row.count)
                .ok_or_else(|| PotError::consistency("coin total overflows u64"))?;
        }
        Ok(tally)
    }

    fn select(&self, draw: u64) -> Denomination {
        if draw < self.gold {
            Denomination::Gold
        } else if draw < self.gold + self.silver {
            Denomination::Silver
        } else {
            Denomination::Bronze
        }
    }

    fn take(&mut self, denomination: Denomination) -> Result<()> {
        let slot = match denomination {
            Denomination::Gold => &mut self.gold,
            Denomination::Silver => &mut self.silver,
            Denomination::Bronze => &mut self.bronze,
            Denomination::Unknown => {
                return Err(PotError::consistency("selected UNKNOWN denomination"));
            }
        };
        *slot = slot.checked_sub(1).ok_or_else(|| {
            PotError::consistency(format!("{denomination} aggregate is already zero"))
        })?;
        self.total -= 1;
        Ok(())
    }
}

/// Index of the first row of each denomination that may still hold coins.
///
/// Rows only ever lose coins during a shake, so once a row is empty it stays
/// empty and the cursor never moves backwards.
#[derive(Debug, Default)]
struct Cursors {
    gold: usize,
    silver: usize,
    bronze: usize,
}

impl Cursors {
    fn get_mut(&mut self, denomination: Denomination) -> Option<&mut usize> {
        match denomination {
            Denomination::Gold => Some(&mut self.gold),
            Denomination::Silver => Some(&mut self.silver),
            Denomination::Bronze => Some(&mut self.bronze),
            Denomination::Unknown => None,
        }
    }
}

/// Take one coin of `denomination` from the first row, in snapshot order,
/// that still holds one.
fn take_from_first_row(
    rows: &mut [LedgerRow],
    cursors: &mut Cursors,
    denomination: Denomination,
) -> Result<()> {
    let cursor = cursors
        .get_mut(denomination)
        .ok_or_else(|| PotError::consistency("selected UNKNOWN denomination"))?;

    while let Some(row) = rows.get_mut(*cursor) {
        if row.denomination == denomination && row.count > 0 {
            row.count -= 1;
            return Ok(());
        }
        *cursor += 1;
    }

    Err(PotError::consistency(format!(
        "no {denomination} row with coins left for a selected draw"
    )))
}

/// Remove up to `count` coins from a pot snapshot.
///
/// Removes exactly `min(count, available)` coins; running out of coins is
/// not an error. The input slice is left untouched. Rows are consumed
/// greedily in slice order, so pass them in a stable order (the stores
/// return ascending row id).
///
/// # Errors
///
/// [`PotError::Consistency`] when the bookkeeping breaks: the aggregate
/// overflows, the random source returns a value outside `[0, total)`, or a
/// selected denomination has no row with coins left.
pub fn shake_pot<R>(rows: &[LedgerRow], count: u64, random: &R) -> Result<ShakeOutcome>
where
    R: RandomEffects + ?Sized,
{
    let mut tally = Tally::from_rows(rows)?;
    let available = tally.total;
    let mut remaining = rows.to_vec();
    let mut cursors = Cursors::default();
    let mut removed = RemovalSummary::new();

    for _ in 0..count {
        if tally.total == 0 {
            break;
        }

        let draw = random.uniform_below(tally.total);
        if draw >= tally.total {
            return Err(PotError::consistency(format!(
                "random draw {draw} outside [0, {})",
                tally.total
            )));
        }

        let denomination = tally.select(draw);
        tally.take(denomination)?;
        take_from_first_row(&mut remaining, &mut cursors, denomination)?;
        removed.record(denomination);
    }

    let mut updated = Vec::new();
    let mut deleted = Vec::new();
    for (before, after) in rows.iter().zip(&remaining) {
        if before.count == after.count {
            continue;
        }
        if after.count == 0 {
            deleted.push(after.id);
        } else {
            updated.push(after.clone());
        }
    }

    debug!(
        requested = count,
        available,
        removed = removed.total(),
        updated = updated.len(),
        deleted = deleted.len(),
        "pot shaken"
    );

    Ok(ShakeOutcome {
        removed,
        updated,
        deleted,
        remaining,
    })
}
