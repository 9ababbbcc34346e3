//! Per-guest merge locks

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::models::UserId;

/// Registry of guests currently being merged.
///
/// Cloning shares the registry. A second `try_acquire` for a guest whose
/// guard is still alive fails with [`Error::MergeInProgress`].
#[derive(Debug, Clone, Default)]
pub struct GuestLocks {
    held: Arc<Mutex<HashSet<UserId>>>,
}

impl GuestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `guest`, released when the returned guard drops
    pub fn try_acquire(&self, guest: UserId) -> Result<GuestLockGuard> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if !held.insert(guest) {
            return Err(Error::MergeInProgress(guest));
        }
        Ok(GuestLockGuard {
            locks: self.clone(),
            guest,
        })
    }

    /// Whether a merge currently holds `guest`
    pub fn is_locked(&self, guest: UserId) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&guest)
    }
}

/// Releases the guest's lock on drop
#[derive(Debug)]
pub struct GuestLockGuard {
    locks: GuestLocks,
    guest: UserId,
}

impl GuestLockGuard {
    pub const fn guest(&self) -> UserId {
        self.guest
    }
}

impl Drop for GuestLockGuard {
    fn drop(&mut self) {
        self.locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.guest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_refused_until_release() {
        let locks = GuestLocks::new();
        let guest = UserId::new(5);

        let guard = locks.try_acquire(guest).unwrap();
        assert_eq!(guard.guest(), guest);
        assert!(locks.is_locked(guest));
        assert!(matches!(
            locks.clone().try_acquire(guest),
            Err(Error::MergeInProgress(id)) if id == guest
        ));

        drop(guard);
        assert!(!locks.is_locked(guest));
        assert!(locks.try_acquire(guest).is_ok());
    }

    #[test]
    fn test_locks_are_per_guest() {
        let locks = GuestLocks::new();
        let _a = locks.try_acquire(UserId::new(1)).unwrap();
        assert!(locks.try_acquire(UserId::new(2)).is_ok());
    }
}
