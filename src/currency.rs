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

//! Currency codes and the cross-currency guard.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency code, stored uppercase.
///
/// Construction normalizes the code so comparisons are effectively
/// case-insensitive: `Currency::new("eur") == Currency::new("EUR")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Self {
        Self(code.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asserts two currency codes match, case-insensitively.
///
/// # Errors
///
/// Returns [`LedgerError::CurrencyMismatch`] if the codes differ.
pub fn assert_match(left: &Currency, right: &Currency) -> Result<(), LedgerError> {
    if left.as_str().eq_ignore_ascii_case(right.as_str()) {
        Ok(())
    } else {
        Err(LedgerError::CurrencyMismatch)
    }
}
