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

//! Ledger configuration surface.

use crate::currency::Currency;
use serde::Deserialize;

/// Configuration read by the ledger engine.
///
/// Deserializable so the embedding application can load it from whatever
/// configuration format it already uses; missing fields fall back to the
/// defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Permits debits to drive a balance below zero.
    pub allow_negative: bool,
    /// Currency used when an operation does not specify one.
    pub default_currency: Currency,
    /// Decimal scale for all amounts and balances.
    pub precision: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            allow_negative: false,
            default_currency: Currency::new("EUR"),
            precision: 8,
        }
    }
}
