// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! In-process storage collaborator.
//!
//! Wallet rows live in a [`DashMap`] keyed by id; a second map enforces the
//! (owner, label, currency) uniqueness invariant. The dashmap entry API
//! gives atomic insert-or-reconcile, so concurrent first-time resolution of
//! the same wallet key yields exactly one row and uniqueness conflicts never
//! surface to callers. Transfer idempotency keys are reserved the same way,
//! which is the commit-time unique constraint behind the duplicate check.

use crate::base::{EntryId, OwnerRef, TransferId, WalletId};
use crate::currency::Currency;
use crate::error::LedgerError;
use crate::transfer::Transfer;
use crate::wallet::Wallet;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Wallet uniqueness key: at most one wallet per owner/label/currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct WalletKey {
    pub(crate) owner: OwnerRef,
    pub(crate) label: String,
    pub(crate) currency: Currency,
}

#[derive(Debug)]
pub(crate) struct Store {
    /// Wallet rows indexed by id.
    wallets: DashMap<WalletId, Arc<Wallet>>,
    /// Uniqueness index over (owner, label, currency).
    index: DashMap<WalletKey, WalletId>,
    /// Completed transfer rows.
    transfers: DashMap<TransferId, Arc<Transfer>>,
    /// Globally unique transfer idempotency keys.
    transfer_keys: DashMap<String, TransferId>,
    next_wallet_id: AtomicU64,
    next_entry_id: AtomicU64,
    next_transfer_id: AtomicU64,
}

impl Store {
    pub(crate) fn new() -> Self {
        Self {
            wallets: DashMap::new(),
            index: DashMap::new(),
            transfers: DashMap::new(),
            transfer_keys: DashMap::new(),
            next_wallet_id: AtomicU64::new(0),
            next_entry_id: AtomicU64::new(0),
            next_transfer_id: AtomicU64::new(0),
        }
    }

    /// Returns the wallet for `key`, creating it with a zero balance on
    /// first use.
    ///
    /// The index entry guard serializes concurrent creators of the same
    /// key: the loser of the race observes the winner's row instead of
    /// inserting a duplicate.
    pub(crate) fn find_or_create(&self, key: &WalletKey, precision: u32) -> Arc<Wallet> {
        match self.index.entry(key.clone()) {
            Entry::Occupied(slot) => {
                let id = *slot.get();
                let row = self.wallets.get(&id).expect("indexed wallet row exists");
                Arc::clone(row.value())
            }
            Entry::Vacant(slot) => {
                let id = WalletId(self.next_wallet_id.fetch_add(1, Ordering::Relaxed) + 1);
                let wallet = Arc::new(Wallet::new(
                    id,
                    key.owner.clone(),
                    &key.label,
                    key.currency.clone(),
                    precision,
                ));
                // The row must be visible before the key is published.
                self.wallets.insert(id, Arc::clone(&wallet));
                slot.insert(id);
                wallet
            }
        }
    }

    /// All wallets belonging to `owner`, ordered by label then currency.
    pub(crate) fn wallets_of(&self, owner: &OwnerRef) -> Vec<Arc<Wallet>> {
        let mut wallets: Vec<Arc<Wallet>> = self
            .wallets
            .iter()
            .filter(|row| row.value().owner() == owner)
            .map(|row| Arc::clone(row.value()))
            .collect();
        wallets.sort_by(|a, b| {
            a.label()
                .cmp(b.label())
                .then_with(|| a.currency().as_str().cmp(b.currency().as_str()))
        });
        wallets
    }

    /// Every wallet in the store, ordered by id. Used for reporting.
    pub(crate) fn all_wallets(&self) -> Vec<Arc<Wallet>> {
        let mut wallets: Vec<Arc<Wallet>> =
            self.wallets.iter().map(|row| Arc::clone(row.value())).collect();
        wallets.sort_by_key(|wallet| wallet.id());
        wallets
    }

    pub(crate) fn next_entry_id(&self) -> EntryId {
        EntryId(self.next_entry_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub(crate) fn next_transfer_id(&self) -> TransferId {
        TransferId(self.next_transfer_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub(crate) fn transfer_key_exists(&self, key: &str) -> bool {
        self.transfer_keys.contains_key(key)
    }

    /// Atomically reserves a transfer idempotency key.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateOperation`] if the key is already
    /// taken, covering the window between the duplicate pre-check and the
    /// transfer insert.
    pub(crate) fn reserve_transfer_key(
        &self,
        key: &str,
        transfer_id: TransferId,
    ) -> Result<(), LedgerError> {
        match self.transfer_keys.entry(key.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateOperation),
            Entry::Vacant(slot) => {
                slot.insert(transfer_id);
                Ok(())
            }
        }
    }

    pub(crate) fn insert_transfer(&self, transfer: Arc<Transfer>) {
        self.transfers.insert(transfer.id, transfer);
    }

    pub(crate) fn transfer_count(&self) -> usize {
        self.transfers.len()
    }
}
