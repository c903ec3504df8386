//! Net balances and settlement previews for shared expenses.
//!
//! Every expense is split evenly: the amount is divided across the payer set
//! on the credit side and across the beneficiary set on the debit side. A
//! member's net balance is the sum of `paid share - owed share` over all
//! entries. Positive means the household owes them, negative means they owe
//! the household. Because both sides of every entry split to exactly the
//! entry's amount, balances over any entry set sum to zero.

use std::collections::BTreeMap;

use crate::{Error, database_id::DatabaseId, expense::core::Expense, expense::split::split_amount_evenly};

/// A single reimbursement in a settlement preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// The member paying.
    pub from: DatabaseId,
    /// The member being reimbursed.
    pub to: DatabaseId,
    /// How much moves, in cents.
    pub amount_cents: i64,
}

/// Compute each member's net balance over `entries`.
///
/// Members in `member_ids` appear in the result even with no entries (at
/// zero). Participants on entries are accumulated even when they are not in
/// `member_ids` so the closed-system property holds for ex-members too.
pub fn compute_balances(
    entries: &[Expense],
    member_ids: &[DatabaseId],
) -> Result<BTreeMap<DatabaseId, i64>, Error> {
    let mut balances: BTreeMap<DatabaseId, i64> =
        member_ids.iter().map(|&id| (id, 0)).collect();

    for entry in entries {
        apply_entry(
            &mut balances,
            entry.amount_cents,
            &entry.payers,
            &entry.beneficiaries,
        )?;
    }

    Ok(balances)
}

/// Compute the per-member signed deltas for a hypothetical expense.
///
/// Positive delta: the member would be owed money; negative: they would owe.
///
/// # Errors
/// Returns [Error::InvalidSplitInput] if either participant set is empty or
/// the amount is not positive.
pub fn reimbursement_preview(
    amount_cents: i64,
    payer_ids: &[DatabaseId],
    beneficiary_ids: &[DatabaseId],
) -> Result<BTreeMap<DatabaseId, i64>, Error> {
    let mut deltas = BTreeMap::new();
    apply_entry(&mut deltas, amount_cents, payer_ids, beneficiary_ids)?;

    Ok(deltas)
}

fn apply_entry(
    balances: &mut BTreeMap<DatabaseId, i64>,
    amount_cents: i64,
    payer_ids: &[DatabaseId],
    beneficiary_ids: &[DatabaseId],
) -> Result<(), Error> {
    // Split in ascending id order so remainder cents land deterministically.
    let paid_shares = split_amount_evenly(amount_cents, &sorted_unique(payer_ids))?;
    let owed_shares = split_amount_evenly(amount_cents, &sorted_unique(beneficiary_ids))?;

    for (member_id, share) in paid_shares {
        *balances.entry(member_id).or_insert(0) += share;
    }

    for (member_id, share) in owed_shares {
        *balances.entry(member_id).or_insert(0) -= share;
    }

    Ok(())
}

fn sorted_unique(ids: &[DatabaseId]) -> Vec<DatabaseId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Pair debtors with creditors to zero out `balances` with at most `n - 1`
/// transfers.
///
/// Greedy: the largest debtor pays the largest creditor, ties broken by
/// member id, so the preview is deterministic for a given balance map.
pub fn settlement_transfers(balances: &BTreeMap<DatabaseId, i64>) -> Vec<Transfer> {
    // BTreeMap iteration gives ascending id order, which makes the
    // sort_by tie-breaks below stable across runs.
    let mut creditors: Vec<(DatabaseId, i64)> = balances
        .iter()
        .filter(|&(_, &amount)| amount > 0)
        .map(|(&id, &amount)| (id, amount))
        .collect();
    let mut debtors: Vec<(DatabaseId, i64)> = balances
        .iter()
        .filter(|&(_, &amount)| amount < 0)
        .map(|(&id, &amount)| (id, -amount))
        .collect();

    creditors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    debtors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].1.min(creditors[j].1);

        transfers.push(Transfer {
            from: debtors[i].0,
            to: creditors[j].0,
            amount_cents: amount,
        });

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;

        if debtors[i].1 == 0 {
            i += 1;
        }
        if creditors[j].1 == 0 {
            j += 1;
        }
    }

    transfers
}

#[cfg(test)]
mod compute_balances_tests {
    use time::macros::date;

    use crate::expense::core::Expense;

    use super::compute_balances;

    fn entry(amount_cents: i64, payers: &[i64], beneficiaries: &[i64]) -> Expense {
        Expense {
            id: 0,
            description: "test".to_owned(),
            amount_cents,
            category: "General".to_owned(),
            date: date!(2026 - 08 - 01),
            created_by: payers[0],
            payers: payers.to_vec(),
            beneficiaries: beneficiaries.to_vec(),
        }
    }

    #[test]
    fn single_payer_three_beneficiaries() {
        // amount=30, payers=[A], beneficiaries=[A,B,C]:
        // A nets +30 paid - 10 owed = +20, B and C owe 10 each.
        let entries = [entry(3000, &[1], &[1, 2, 3])];

        let balances = compute_balances(&entries, &[1, 2, 3]).unwrap();

        assert_eq!(balances[&1], 2000);
        assert_eq!(balances[&2], -1000);
        assert_eq!(balances[&3], -1000);
    }

    #[test]
    fn balances_sum_to_zero() {
        let entries = [
            entry(3000, &[1], &[1, 2, 3]),
            entry(1001, &[2, 3], &[1, 2]),
            entry(999, &[3], &[1]),
            entry(7, &[1, 2, 3], &[2]),
        ];

        let balances = compute_balances(&entries, &[1, 2, 3]).unwrap();

        assert_eq!(balances.values().sum::<i64>(), 0);
    }

    #[test]
    fn members_without_entries_have_zero_balance() {
        let entries = [entry(1000, &[1], &[1, 2])];

        let balances = compute_balances(&entries, &[1, 2, 3]).unwrap();

        assert_eq!(balances[&3], 0);
    }

    #[test]
    fn empty_entry_set_gives_all_zeroes() {
        let balances = compute_balances(&[], &[1, 2]).unwrap();

        assert!(balances.values().all(|&amount| amount == 0));
    }

    #[test]
    fn includes_participants_outside_member_list() {
        // An ex-member who paid for something still shows up, otherwise the
        // remaining balances would not sum to zero.
        let entries = [entry(1000, &[9], &[1, 2])];

        let balances = compute_balances(&entries, &[1, 2]).unwrap();

        assert_eq!(balances[&9], 1000);
        assert_eq!(balances.values().sum::<i64>(), 0);
    }
}

#[cfg(test)]
mod reimbursement_preview_tests {
    use crate::Error;

    use super::reimbursement_preview;

    #[test]
    fn splits_hypothetical_amount() {
        let deltas = reimbursement_preview(3000, &[1], &[1, 2, 3]).unwrap();

        assert_eq!(deltas[&1], 2000);
        assert_eq!(deltas[&2], -1000);
        assert_eq!(deltas[&3], -1000);
    }

    #[test]
    fn rejects_empty_payer_set() {
        assert_eq!(
            reimbursement_preview(3000, &[], &[1, 2]),
            Err(Error::InvalidSplitInput)
        );
    }

    #[test]
    fn rejects_empty_beneficiary_set() {
        assert_eq!(
            reimbursement_preview(3000, &[1], &[]),
            Err(Error::InvalidSplitInput)
        );
    }

    #[test]
    fn deltas_sum_to_zero_with_remainder() {
        let deltas = reimbursement_preview(1000, &[1, 2], &[1, 2, 3]).unwrap();

        assert_eq!(deltas.values().sum::<i64>(), 0);
    }
}

#[cfg(test)]
mod settlement_transfers_tests {
    use std::collections::BTreeMap;

    use super::{Transfer, settlement_transfers};

    #[test]
    fn settles_three_member_household() {
        let balances = BTreeMap::from([(1, 2000), (2, -1000), (3, -1000)]);

        let transfers = settlement_transfers(&balances);

        assert_eq!(
            transfers,
            vec![
                Transfer {
                    from: 2,
                    to: 1,
                    amount_cents: 1000
                },
                Transfer {
                    from: 3,
                    to: 1,
                    amount_cents: 1000
                },
            ]
        );
    }

    #[test]
    fn transfers_zero_all_balances() {
        let balances = BTreeMap::from([(1, 2500), (2, -700), (3, -1300), (4, -500)]);

        let transfers = settlement_transfers(&balances);

        let mut after = balances.clone();
        for transfer in &transfers {
            *after.get_mut(&transfer.from).unwrap() += transfer.amount_cents;
            *after.get_mut(&transfer.to).unwrap() -= transfer.amount_cents;
        }

        assert!(after.values().all(|&amount| amount == 0));
        assert!(transfers.len() <= balances.len() - 1);
    }

    #[test]
    fn settled_household_needs_no_transfers() {
        let balances = BTreeMap::from([(1, 0), (2, 0)]);

        assert!(settlement_transfers(&balances).is_empty());
    }

    #[test]
    fn is_deterministic_for_tied_balances() {
        let balances = BTreeMap::from([(1, 1000), (2, 1000), (3, -1000), (4, -1000)]);

        let first = settlement_transfers(&balances);
        let second = settlement_transfers(&balances);

        assert_eq!(first, second);
        // Ties break by id: member 3 pays member 1 first.
        assert_eq!(first[0].from, 3);
        assert_eq!(first[0].to, 1);
    }
}
