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

//! Amount parsing and normalization.
//!
//! Every amount entering the engine passes through [`normalize`], so all
//! downstream arithmetic happens on exact decimals at the configured scale.
//! Binary floats never touch balance math.

use crate::error::LedgerError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parses a textual amount and normalizes it to the configured precision.
///
/// Excess fractional digits are rounded half-away-from-zero; the result is
/// rescaled so it always carries exactly `precision` fractional digits.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidAmount`] for non-numeric input and for
/// values that are zero or negative after rounding.
pub fn normalize(amount: &str, precision: u32) -> Result<Decimal, LedgerError> {
    let text = amount.trim();
    let parsed = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| LedgerError::InvalidAmount)?;

    let mut normalized =
        parsed.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    if normalized <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    normalized.rescale(precision);

    Ok(normalized)
}
