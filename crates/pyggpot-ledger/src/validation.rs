//! Input validation for coin entries
//!
//! Entry checks run before any transaction is opened; the first bad entry
//! rejects the whole batch. The capacity check needs the pot's current rows
//! and runs inside the add transaction.

use pyggpot_core::{Coins, Denomination, LedgerRow, PotError, Result};

/// Check every entry and return the validated `(denomination, count)` pairs
/// in input order.
///
/// An entry is valid when its denomination is GOLD, SILVER or BRONZE and its
/// count is non-negative. Zero counts are accepted.
pub fn validate_entries(entries: &[Coins]) -> Result<Vec<(Denomination, u64)>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.denomination.is_recognized() {
                return Err(PotError::validation(format!(
                    "entry {index}: unrecognized denomination {}",
                    entry.denomination
                )));
            }
            let count = u64::try_from(entry.count).map_err(|_| {
                PotError::validation(format!(
                    "entry {index}: count {} is negative",
                    entry.count
                ))
            })?;
            Ok((entry.denomination, count))
        })
        .collect()
}

/// Check that a pot holding `rows` can take `batch` without its total
/// exceeding [`Coins::MAX_COUNT`].
///
/// Rows of unknown denomination do not count, matching the sampler.
pub fn ensure_capacity(rows: &[LedgerRow], batch: &[(Denomination, u64)]) -> Result<()> {
    let held = rows
        .iter()
        .filter(|row| row.denomination.is_recognized())
        .map(|row| row.count);
    let added = batch.iter().map(|&(_, count)| count);

    held.chain(added)
        .try_fold(0u64, |total, count| {
            total
                .checked_add(count)
                .filter(|total| *total <= Coins::MAX_COUNT)
        })
        .map(|_| ())
        .ok_or_else(|| {
            PotError::validation(format!(
                "pot would hold more than {} coins",
                Coins::MAX_COUNT
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_recognized_non_negative_entries() {
        let entries = [
            Coins::new(Denomination::Gold, 3),
            Coins::new(Denomination::Bronze, 0),
        ];
        assert_eq!(
            validate_entries(&entries).unwrap(),
            vec![(Denomination::Gold, 3), (Denomination::Bronze, 0)]
        );
    }

    #[test]
    fn rejects_negative_count_with_its_index() {
        let entries = [
            Coins::new(Denomination::Gold, 3),
            Coins::new(Denomination::Silver, -1),
        ];
        assert_matches!(
            validate_entries(&entries),
            Err(PotError::Validation { message }) if message.starts_with("entry 1:")
        );
    }

    #[test]
    fn rejects_unknown_denomination() {
        let entries = [Coins::new(Denomination::from_code(7), 1)];
        assert_matches!(
            validate_entries(&entries),
            Err(PotError::Validation { message }) if message.contains("UNKNOWN")
        );
    }

    #[test]
    fn empty_batch_is_valid() {
        assert!(validate_entries(&[]).unwrap().is_empty());
    }

    #[test]
    fn capacity_counts_existing_rows_and_the_batch() {
        let rows = [LedgerRow {
            id: pyggpot_core::RowId(1),
            pot_id: pyggpot_core::PotId(1),
            denomination: Denomination::Gold,
            count: Coins::MAX_COUNT - 1,
        }];

        assert!(ensure_capacity(&rows, &[(Denomination::Bronze, 1)]).is_ok());
        assert_matches!(
            ensure_capacity(&rows, &[(Denomination::Bronze, 1), (Denomination::Silver, 1)]),
            Err(PotError::Validation { .. })
        );
        assert_matches!(
            ensure_capacity(&[], &[(Denomination::Gold, u64::MAX), (Denomination::Gold, 2)]),
            Err(PotError::Validation { .. })
        );
    }
}
