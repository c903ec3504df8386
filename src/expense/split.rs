//! Deterministic even splitting of money amounts across members.

use crate::{Error, database_id::DatabaseId};

/// Split `amount_cents` evenly across `member_ids`.
///
/// Remainder cents are handed out one each to the earliest members in the
/// given order, so the result is deterministic and the shares always sum to
/// the original amount. Callers that need a canonical result should pass ids
/// in ascending order.
///
/// # Errors
/// Returns [Error::InvalidSplitInput] if `member_ids` is empty or
/// `amount_cents` is not positive.
pub fn split_amount_evenly(
    amount_cents: i64,
    member_ids: &[DatabaseId],
) -> Result<Vec<(DatabaseId, i64)>, Error> {
    if member_ids.is_empty() || amount_cents <= 0 {
        return Err(Error::InvalidSplitInput);
    }

    let count = member_ids.len() as i64;
    let base_share = amount_cents / count;
    let remainder = amount_cents % count;

    Ok(member_ids
        .iter()
        .enumerate()
        .map(|(i, &member_id)| {
            let share = if (i as i64) < remainder {
                base_share + 1
            } else {
                base_share
            };

            (member_id, share)
        })
        .collect())
}
