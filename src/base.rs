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

//! Core identifier types for wallets, entries, transfers, and owners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a wallet row.
///
/// Wallet ids are allocated monotonically by the store. Transfers lock the
/// two involved wallets in ascending id order, so this type doubles as the
/// total order used for deadlock avoidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct WalletId(pub u64);

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, monotonically increasing identifier for a ledger entry.
///
/// Entries are ordered newest-first by this sequence (not by timestamp) so
/// history stays stable under same-millisecond writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a transfer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TransferId(pub u64);

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Polymorphic reference to an owning entity (model name plus id).
///
/// Any entity kind can hold wallets; the ledger never inspects the model
/// name beyond using it as part of the wallet uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct OwnerRef {
    pub model: String,
    pub id: u64,
}

impl OwnerRef {
    pub fn new(model: impl Into<String>, id: u64) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model, self.id)
    }
}

/// Polymorphic reference from an entry to an external business object,
/// e.g. the order or invoice that caused the balance change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Reference {
    pub model: String,
    pub id: u64,
}

impl Reference {
    pub fn new(model: impl Into<String>, id: u64) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }
}

/// Arbitrary metadata attached to wallets, entries, and transfers.
pub type Meta = serde_json::Map<String, serde_json::Value>;
