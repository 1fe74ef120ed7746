//! Equal splits
//!
//! Dividing a total by the member count rarely lands on whole satoshis. The
//! leftover satoshis go one each to the first members, so the shares always
//! add back up to the total.

use satsplit_types::{Amount, ExpenseRecord, Split, UserId};

/// Split `total` evenly across `members`, in member order
pub fn split_equally(total: Amount, members: &[UserId]) -> Vec<Split> {
    let Ok(count) = i64::try_from(members.len()) else {
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }

    let base = total.sats() / count;
    let remainder = total.sats() % count;
    let extra = remainder.unsigned_abs() as usize;

    members
        .iter()
        .enumerate()
        .map(|(idx, user_id)| {
            let bump = if idx < extra { remainder.signum() } else { 0 };
            Split {
                user_id: user_id.clone(),
                share: Amount::from_sats(base + bump),
            }
        })
        .collect()
}

/// Build an expense paid by `payer` and shared equally by `members`
pub fn equal_split_expense(payer: UserId, total: Amount, members: &[UserId]) -> ExpenseRecord {
    ExpenseRecord {
        payer_id: payer,
        total,
        splits: split_equally(total, members),
    }
}
