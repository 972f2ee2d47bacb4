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

//! Error types for ledger operations.

use thiserror::Error;

/// Ledger operation errors.
///
/// All variants are terminal for the failing call: the engine never retries
/// internally, and a failed operation leaves no entries, no balance change,
/// and no transfer row behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount is non-numeric, zero, or negative
    #[error("invalid amount (must be numeric and positive)")]
    InvalidAmount,

    /// Operation currency differs from the wallet or transfer currency
    #[error("currency mismatch")]
    CurrencyMismatch,

    /// Debit would drive the balance below zero with negative balances disallowed
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Idempotency key already recorded for this wallet (or globally, for transfers)
    #[error("duplicate operation")]
    DuplicateOperation,
}
