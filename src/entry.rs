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

//! Ledger entries: immutable, signed balance-changing records.

use crate::base::{EntryId, Meta, Reference, WalletId};
use crate::currency::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Credit,
    Debit,
}

/// Entry lifecycle status.
///
/// The engine only ever writes `Completed`; `Pending` and `Reversed` are
/// reserved for future reversal flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    Completed,
    Reversed,
}

/// One immutable balance-changing record against a wallet.
///
/// The `amount` is signed: positive for credits, negative for debits, so the
/// algebraic sum of a wallet's entries always equals its balance.
/// `balance_after` snapshots the wallet balance immediately following this
/// entry's application. Entries are shared as `Arc<Entry>` and have no
/// interior mutability: once written, they never change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub uuid: Uuid,
    pub wallet_id: WalletId,
    pub entry_type: EntryType,
    pub status: EntryStatus,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub currency: Currency,
    pub reference: Option<Reference>,
    pub idempotency_key: Option<String>,
    pub meta: Option<Meta>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn is_credit(&self) -> bool {
        self.entry_type == EntryType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.entry_type == EntryType::Debit
    }
}
