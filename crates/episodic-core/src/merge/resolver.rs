//! Pure conflict resolution for one guest row

use crate::models::{ConflictPolicy, OwnedRow, UserId};

/// Decision for a guest row, given the target's row for the same natural key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<R> {
    /// No collision: the guest row moves to the target as-is
    Reassign(R),
    /// Collision where the target row already holds the winning value
    KeepTarget { discard: i64 },
    /// Collision where the guest value is newer; the target row takes it
    AdoptGuest { updated: R, discard: i64 },
}

impl<R> Resolution<R> {
    /// Id of the guest row dropped by this decision, if any
    pub const fn discarded(&self) -> Option<i64> {
        match self {
            Self::Reassign(_) => None,
            Self::KeepTarget { discard } | Self::AdoptGuest { discard, .. } => Some(*discard),
        }
    }
}

/// Decide what happens to `guest` when merged into `into`.
///
/// `target` is the row `into` already owns for the same natural key. For
/// temporal kinds the strictly newer `updated_at` wins and ties keep the
/// target's value; for membership kinds an existing target row always wins.
pub fn resolve<R: OwnedRow>(guest: &R, target: Option<&R>, into: UserId) -> Resolution<R> {
    let Some(target) = target else {
        return reassigned(guest, into);
    };

    match R::KIND.policy() {
        ConflictPolicy::Reassign => reassigned(guest, into),
        ConflictPolicy::FirstClaim => Resolution::KeepTarget {
            discard: guest.id(),
        },
        ConflictPolicy::Temporal => {
            if guest.updated_at() > target.updated_at() {
                let mut updated = target.clone();
                updated.adopt_value(guest);
                Resolution::AdoptGuest {
                    updated,
                    discard: guest.id(),
                }
            } else {
                Resolution::KeepTarget {
                    discard: guest.id(),
                }
            }
        }
    }
}

fn reassigned<R: OwnedRow>(guest: &R, into: UserId) -> Resolution<R> {
    let mut row = guest.clone();
    row.set_user_id(into);
    Resolution::Reassign(row)
}
