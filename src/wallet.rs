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

//! Wallet rows and their lock-guarded mutable state.
//!
//! A wallet's identity (owner, label, currency) is immutable; its balance
//! and entry log live behind a [`Mutex`] that plays the role of the row
//! lock. Only the engine, while holding that lock, mutates them.

use crate::base::{EntryId, OwnerRef, WalletId};
use crate::currency::Currency;
use crate::entry::Entry;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Mutable wallet state, guarded by the wallet's row lock.
#[derive(Debug)]
pub(crate) struct WalletData {
    pub(crate) balance: Decimal,
    /// Append-only entry log in application order (ascending entry id).
    pub(crate) entries: Vec<Arc<Entry>>,
    /// Idempotency keys already recorded for this wallet.
    pub(crate) idempotency: HashMap<String, EntryId>,
}

impl WalletData {
    fn new(precision: u32) -> Self {
        let mut balance = Decimal::ZERO;
        balance.rescale(precision);
        Self {
            balance,
            entries: Vec::new(),
            idempotency: HashMap::new(),
        }
    }

    fn assert_invariants(&self) {
        if let Some(last) = self.entries.last() {
            debug_assert_eq!(
                self.balance, last.balance_after,
                "balance diverged from the latest entry's balance_after"
            );
        }
    }

    pub(crate) fn has_key(&self, key: &str) -> bool {
        self.idempotency.contains_key(key)
    }

    /// Appends an entry and moves the balance to its `balance_after`.
    pub(crate) fn push_entry(&mut self, entry: Arc<Entry>) {
        if let Some(key) = &entry.idempotency_key {
            self.idempotency.insert(key.clone(), entry.id);
        }
        self.balance = entry.balance_after;
        self.entries.push(entry);
        self.assert_invariants();
    }
}

/// A named, currency-scoped balance belonging to an owner entity.
///
/// At most one wallet exists per (owner, label, currency); the store's
/// uniqueness index enforces this even under concurrent first use. Wallets
/// are created lazily with a zero balance and never deleted by the engine.
#[derive(Debug)]
pub struct Wallet {
    id: WalletId,
    uuid: Uuid,
    owner: OwnerRef,
    label: String,
    currency: Currency,
    created_at: DateTime<Utc>,
    inner: Mutex<WalletData>,
}

impl Wallet {
    pub(crate) fn new(
        id: WalletId,
        owner: OwnerRef,
        label: &str,
        currency: Currency,
        precision: u32,
    ) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            owner,
            label: label.to_string(),
            currency,
            created_at: Utc::now(),
            inner: Mutex::new(WalletData::new(precision)),
        }
    }

    pub fn id(&self) -> WalletId {
        self.id
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    pub fn entry_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Acquires the wallet's row lock.
    pub(crate) fn lock(&self) -> MutexGuard<'_, WalletData> {
        self.inner.lock()
    }
}

impl Serialize for Wallet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("Wallet", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("owner", &self.owner)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("currency", &self.currency)?;
        state.serialize_field("balance", &data.balance)?;
        state.end()
    }
}
