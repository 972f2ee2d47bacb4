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

//! Transfers: atomic debit/credit pairs between two wallets.

use crate::base::{Meta, TransferId, WalletId};
use crate::currency::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transfer lifecycle status.
///
/// The engine only persists `Completed` transfers; a failed transfer aborts
/// without writing any row, so `Pending` and `Failed` are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Completed,
    Failed,
}

/// A completed movement of funds between two wallets.
///
/// Always backed by exactly two entries (a debit on the source and a credit
/// on the destination) created within the same atomic operation. Immutable
/// once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub id: TransferId,
    pub uuid: Uuid,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: TransferStatus,
    pub idempotency_key: Option<String>,
    pub meta: Option<Meta>,
    pub created_at: DateTime<Utc>,
}
