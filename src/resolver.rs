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

//! Wallet resolution with per-operation memoization.
//!
//! A resolver is constructed fresh for every engine call and dropped when
//! the call finishes; its cache never outlives one logical operation and is
//! never shared, so stale wallet references cannot leak across unrelated
//! operations.

use crate::base::OwnerRef;
use crate::currency::Currency;
use crate::store::{Store, WalletKey};
use crate::wallet::Wallet;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) struct WalletResolver<'a> {
    store: &'a Store,
    precision: u32,
    cache: HashMap<WalletKey, Arc<Wallet>>,
}

impl<'a> WalletResolver<'a> {
    pub(crate) fn new(store: &'a Store, precision: u32) -> Self {
        Self {
            store,
            precision,
            cache: HashMap::new(),
        }
    }

    /// Finds or lazily creates the owner's wallet for (label, currency).
    ///
    /// Repeated resolution of the same key within this resolver's lifetime
    /// returns the memoized row without touching the store again.
    pub(crate) fn resolve(
        &mut self,
        owner: &OwnerRef,
        label: &str,
        currency: &Currency,
    ) -> Arc<Wallet> {
        let key = WalletKey {
            owner: owner.clone(),
            label: label.to_string(),
            currency: currency.clone(),
        };
        if let Some(hit) = self.cache.get(&key) {
            return Arc::clone(hit);
        }
        let wallet = self.store.find_or_create(&key, self.precision);
        self.cache.insert(key, Arc::clone(&wallet));
        wallet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_resolution_is_memoized() {
        let store = Store::new();
        let mut resolver = WalletResolver::new(&store, 8);
        let owner = OwnerRef::new("User", 1);
        let eur = Currency::new("EUR");

        let first = resolver.resolve(&owner, "main", &eur);
        let second = resolver.resolve(&owner, "main", &eur);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn separate_resolvers_share_the_store_row() {
        let store = Store::new();
        let owner = OwnerRef::new("User", 1);
        let eur = Currency::new("EUR");

        let first = WalletResolver::new(&store, 8).resolve(&owner, "main", &eur);
        let second = WalletResolver::new(&store, 8).resolve(&owner, "main", &eur);
        assert_eq!(first.id(), second.id());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn different_keys_resolve_different_wallets() {
        let store = Store::new();
        let mut resolver = WalletResolver::new(&store, 8);
        let owner = OwnerRef::new("User", 1);

        let eur = resolver.resolve(&owner, "main", &Currency::new("EUR"));
        let usd = resolver.resolve(&owner, "main", &Currency::new("USD"));
        assert_ne!(eur.id(), usd.id());
    }
}
