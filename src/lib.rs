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

//! # Virtual Wallet
//!
//! This library provides a multi-owner, multi-currency balance ledger.
//! Owners hold named wallets; each wallet accrues an append-only sequence of
//! signed entries, and funds move atomically between wallets via transfers.
//!
//! ## Core Components
//!
//! - [`Ledger`]: The engine — resolves and locks wallets, validates
//!   operations, appends entries, and emits post-commit notifications
//! - [`Wallet`]: A named, currency-scoped balance belonging to an owner
//! - [`Entry`]: One immutable, signed balance-changing record
//! - [`Transfer`]: An atomic debit/credit pair between two wallets
//! - [`LedgerError`]: Caller-visible operation failures
//!
//! ## Example
//!
//! ```
//! use virtual_wallet_rs::{Ledger, Options, OwnerRef};
//! use rust_decimal_macros::dec;
//!
//! let ledger = Ledger::new();
//! let alice = OwnerRef::new("User", 1);
//! let bob = OwnerRef::new("User", 2);
//!
//! ledger.holder(&alice).credit("100.00", Options::default(), None, None).unwrap();
//! ledger
//!     .holder(&alice)
//!     .transfer(&bob, "40.00", Options::default(), None, None, None)
//!     .unwrap();
//!
//! assert_eq!(ledger.holder(&alice).balance(None, None), dec!(60.00));
//! assert_eq!(ledger.holder(&bob).balance(None, None), dec!(40.00));
//! ```
//!
//! ## Thread Safety
//!
//! Operations targeting different wallets run in parallel; operations on
//! the same wallet serialize on its row lock. Transfers take both row locks
//! in ascending wallet-id order, so opposing concurrent transfers cannot
//! deadlock.

pub mod amount;
mod base;
mod config;
pub mod currency;
mod engine;
mod entry;
pub mod error;
mod events;
mod resolver;
mod store;
mod transfer;
mod wallet;

pub use base::{EntryId, Meta, OwnerRef, Reference, TransferId, WalletId};
pub use config::LedgerConfig;
pub use currency::Currency;
pub use engine::{CursorPage, Ledger, LedgerHandle, Options, Page};
pub use entry::{Entry, EntryStatus, EntryType};
pub use error::LedgerError;
pub use events::LedgerEvent;
pub use transfer::{Transfer, TransferStatus};
pub use wallet::Wallet;
