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

//! The ledger engine.
//!
//! Every operation follows the same shape: resolve the wallet(s), take the
//! row lock(s), validate, mutate, release, notify. All validation happens
//! before the first mutation, so a failing operation leaves no entries, no
//! balance change, and no transfer row — the all-or-nothing guarantee falls
//! out of the ordering rather than an explicit rollback.
//!
//! # Locking
//!
//! Single-wallet operations hold one row lock for the full validate-mutate
//! span, so entries on a wallet form a total order consistent with
//! `balance_after` chaining. Transfers lock both rows in ascending
//! [`WalletId`](crate::WalletId) order regardless of which side is the
//! source; opposing concurrent transfers between the same pair therefore
//! agree on acquisition order and cannot deadlock.

use crate::amount;
use crate::base::{EntryId, Meta, OwnerRef, Reference};
use crate::config::LedgerConfig;
use crate::currency::{self, Currency};
use crate::entry::{Entry, EntryStatus, EntryType};
use crate::error::LedgerError;
use crate::events::{EventBus, LedgerEvent};
use crate::resolver::WalletResolver;
use crate::store::Store;
use crate::transfer::{Transfer, TransferStatus};
use crate::wallet::{Wallet, WalletData};
use chrono::{DateTime, Utc};
use crossbeam::channel::Receiver;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Per-call options carried through to the written records.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Polymorphic reference to the business object behind the operation.
    pub reference: Option<Reference>,
    /// Caller-supplied deduplication token.
    pub idempotency_key: Option<String>,
    /// Arbitrary metadata stored with the entry or transfer.
    pub meta: Option<Meta>,
    /// Stated operation currency, asserted against the wallet's currency.
    pub currency: Option<Currency>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(mut self, model: &str, id: u64) -> Self {
        self.reference = Some(Reference::new(model, id));
        self
    }

    pub fn idempotency_key(mut self, key: &str) -> Self {
        self.idempotency_key = Some(key.to_string());
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn currency(mut self, code: &str) -> Self {
        self.currency = Some(Currency::new(code));
        self
    }
}

/// One page of an offset-paginated history query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// One page of a cursor-paginated history query.
///
/// `next_cursor` is `None` once the log is exhausted; otherwise feed it back
/// to continue from where this page stopped.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<EntryId>,
}

/// The ledger engine: sole writer of wallet balances, entries, and
/// transfers.
///
/// Callers bind a handle to an owner via [`Ledger::holder`] and operate
/// through it. The engine itself is `Sync`; concurrent operations on
/// different wallets proceed in parallel, while operations on the same
/// wallet serialize on its row lock.
#[derive(Debug)]
pub struct Ledger {
    store: Store,
    config: LedgerConfig,
    events: EventBus,
}

impl Ledger {
    /// Creates a ledger with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            store: Store::new(),
            config,
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Registers a notification subscriber.
    ///
    /// Events arrive strictly after the operation that caused them has
    /// committed; delivery is fire-and-forget.
    pub fn subscribe(&self) -> Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    /// Binds an operation handle to `owner` with label `"main"` and the
    /// configured default currency.
    pub fn holder(&self, owner: &OwnerRef) -> LedgerHandle<'_> {
        LedgerHandle {
            ledger: self,
            owner: owner.clone(),
            label: "main".to_string(),
            currency: self.config.default_currency.clone(),
        }
    }

    /// Every wallet in the ledger, ordered by id. Intended for reports.
    pub fn all_wallets(&self) -> Vec<Arc<Wallet>> {
        self.store.all_wallets()
    }

    /// Number of committed transfer rows.
    pub fn transfer_count(&self) -> usize {
        self.store.transfer_count()
    }

    /// Moves funds between two already-resolved wallets.
    ///
    /// This is the transfer core: currency guard, amount normalization,
    /// global idempotency check, ordered locking, debit + credit + transfer
    /// row in one atomic step, post-commit notification.
    ///
    /// # Errors
    ///
    /// [`LedgerError::CurrencyMismatch`] if the wallets disagree on
    /// currency, [`LedgerError::InvalidAmount`], [`LedgerError::InsufficientFunds`],
    /// or [`LedgerError::DuplicateOperation`]; in every case neither wallet
    /// is touched and no row is written.
    pub fn transfer_between(
        &self,
        from: &Arc<Wallet>,
        to: &Arc<Wallet>,
        amount: &str,
        options: Options,
    ) -> Result<Arc<Transfer>, LedgerError> {
        currency::assert_match(from.currency(), to.currency())?;
        let amount = amount::normalize(amount, self.config.precision)?;

        if let Some(key) = options.idempotency_key.as_deref() {
            if self.store.transfer_key_exists(key) {
                return Err(LedgerError::DuplicateOperation);
            }
        }

        let mut events = Vec::with_capacity(3);
        let transfer = if from.id() == to.id() {
            // Self-transfer: one lock, debit then credit on the same row.
            let mut data = from.lock();
            self.apply_transfer(from, to, &mut data, None, amount, &options, &mut events)?
        } else {
            // Lock the lower wallet id first. Opposing transfers between
            // the same pair then agree on acquisition order.
            let (low, high) = if from.id() < to.id() {
                (from, to)
            } else {
                (to, from)
            };
            let mut low_data = low.lock();
            let mut high_data = high.lock();
            if from.id() < to.id() {
                self.apply_transfer(
                    from,
                    to,
                    &mut low_data,
                    Some(&mut *high_data),
                    amount,
                    &options,
                    &mut events,
                )?
            } else {
                self.apply_transfer(
                    from,
                    to,
                    &mut high_data,
                    Some(&mut *low_data),
                    amount,
                    &options,
                    &mut events,
                )?
            }
        };

        debug!(
            transfer = %transfer.id,
            from = %from.id(),
            to = %to.id(),
            amount = %amount,
            "transfer committed"
        );
        self.events.publish(events);
        Ok(transfer)
    }

    /// Applies the two entries and the transfer row while both row locks
    /// are held. `to_data` is `None` for a self-transfer.
    ///
    /// Everything that can fail happens before the first mutation.
    #[allow(clippy::too_many_arguments)]
    fn apply_transfer(
        &self,
        from: &Arc<Wallet>,
        to: &Arc<Wallet>,
        from_data: &mut WalletData,
        mut to_data: Option<&mut WalletData>,
        amount: Decimal,
        options: &Options,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<Arc<Transfer>, LedgerError> {
        let debit_balance = from_data.balance - amount;
        if !self.config.allow_negative && debit_balance < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds);
        }

        let out_key = options.idempotency_key.as_ref().map(|key| format!("{key}-out"));
        let in_key = options.idempotency_key.as_ref().map(|key| format!("{key}-in"));
        if let Some(key) = out_key.as_deref() {
            if from_data.has_key(key) {
                return Err(LedgerError::DuplicateOperation);
            }
        }
        if let Some(key) = in_key.as_deref() {
            let to_view: &WalletData = match to_data.as_deref() {
                Some(data) => data,
                None => from_data,
            };
            if to_view.has_key(key) {
                return Err(LedgerError::DuplicateOperation);
            }
        }

        let transfer_id = self.store.next_transfer_id();
        if let Some(key) = options.idempotency_key.as_deref() {
            // The reservation is the commit-time unique constraint: two
            // racing transfers with the same fresh key cannot both pass.
            self.store.reserve_transfer_key(key, transfer_id)?;
        }

        // Mutation starts here; nothing below can fail.
        let debit = self.record_entry(
            from,
            from_data,
            EntryType::Debit,
            amount,
            debit_balance,
            options.reference.clone(),
            out_key,
            Some(direction_meta("out", options.meta.as_ref())),
        );
        let credit = {
            let to_state: &mut WalletData = match to_data.as_deref_mut() {
                Some(data) => data,
                None => from_data,
            };
            let credit_balance = to_state.balance + amount;
            self.record_entry(
                to,
                to_state,
                EntryType::Credit,
                amount,
                credit_balance,
                options.reference.clone(),
                in_key,
                Some(direction_meta("in", options.meta.as_ref())),
            )
        };

        let transfer = Arc::new(Transfer {
            id: transfer_id,
            uuid: Uuid::new_v4(),
            from_wallet_id: from.id(),
            to_wallet_id: to.id(),
            amount,
            currency: from.currency().clone(),
            status: TransferStatus::Completed,
            idempotency_key: options.idempotency_key.clone(),
            meta: options.meta.clone(),
            created_at: Utc::now(),
        });
        self.store.insert_transfer(Arc::clone(&transfer));

        events.push(LedgerEvent::EntryRecorded(debit));
        events.push(LedgerEvent::EntryRecorded(credit));
        events.push(LedgerEvent::TransferCompleted(Arc::clone(&transfer)));
        Ok(transfer)
    }

    /// Writes one entry against a locked wallet and moves its balance.
    #[allow(clippy::too_many_arguments)]
    fn record_entry(
        &self,
        wallet: &Wallet,
        data: &mut WalletData,
        entry_type: EntryType,
        amount: Decimal,
        balance_after: Decimal,
        reference: Option<Reference>,
        idempotency_key: Option<String>,
        meta: Option<Meta>,
    ) -> Arc<Entry> {
        let signed = match entry_type {
            EntryType::Credit => amount,
            EntryType::Debit => -amount,
        };
        let entry = Arc::new(Entry {
            id: self.store.next_entry_id(),
            uuid: Uuid::new_v4(),
            wallet_id: wallet.id(),
            entry_type,
            status: EntryStatus::Completed,
            amount: signed,
            balance_after,
            currency: wallet.currency().clone(),
            reference,
            idempotency_key,
            meta,
            created_at: Utc::now(),
        });
        data.push_entry(Arc::clone(&entry));
        entry
    }

    fn resolver(&self) -> WalletResolver<'_> {
        WalletResolver::new(&self.store, self.config.precision)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// An operation handle bound to one owner.
///
/// Carries the default label and currency for the owner's wallet; both can
/// be overridden per call or rebound with the builder methods.
#[derive(Debug, Clone)]
pub struct LedgerHandle<'a> {
    ledger: &'a Ledger,
    owner: OwnerRef,
    label: String,
    currency: Currency,
}

impl LedgerHandle<'_> {
    /// Rebinds the handle to another wallet label.
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Rebinds the handle to another currency.
    pub fn currency(mut self, code: &str) -> Self {
        self.currency = Currency::new(code);
        self
    }

    fn target_currency(&self, currency: Option<&str>) -> Currency {
        currency.map(Currency::new).unwrap_or_else(|| self.currency.clone())
    }

    fn resolve(
        &self,
        resolver: &mut WalletResolver<'_>,
        label: Option<&str>,
        currency: Option<&str>,
    ) -> Arc<Wallet> {
        resolver.resolve(
            &self.owner,
            label.unwrap_or(&self.label),
            &self.target_currency(currency),
        )
    }

    /// Credits the wallet, appending one COMPLETED entry.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidAmount`], [`LedgerError::CurrencyMismatch`]
    /// (stated vs wallet currency), or [`LedgerError::DuplicateOperation`]
    /// when `options.idempotency_key` was already recorded for this wallet.
    pub fn credit(
        &self,
        amount: &str,
        options: Options,
        label: Option<&str>,
        currency: Option<&str>,
    ) -> Result<Arc<Entry>, LedgerError> {
        let ledger = self.ledger;
        // Validation precedes resolution: a failed call must not leave a
        // lazily created wallet row behind.
        let amount = amount::normalize(amount, ledger.config.precision)?;
        let target = self.target_currency(currency);
        if let Some(stated) = &options.currency {
            currency::assert_match(stated, &target)?;
        }
        let wallet = ledger
            .resolver()
            .resolve(&self.owner, label.unwrap_or(&self.label), &target);

        let entry = {
            let mut data = wallet.lock();
            if let Some(key) = options.idempotency_key.as_deref() {
                if data.has_key(key) {
                    return Err(LedgerError::DuplicateOperation);
                }
            }

            let new_balance = data.balance + amount;
            ledger.record_entry(
                &wallet,
                &mut data,
                EntryType::Credit,
                amount,
                new_balance,
                options.reference,
                options.idempotency_key,
                options.meta,
            )
        };

        debug!(wallet = %wallet.id(), entry = %entry.id, amount = %amount, "credit committed");
        ledger.events.publish(vec![LedgerEvent::EntryRecorded(Arc::clone(&entry))]);
        Ok(entry)
    }

    /// Debits the wallet, appending one COMPLETED entry with a negative
    /// signed amount.
    ///
    /// # Errors
    ///
    /// As [`credit`](Self::credit), plus [`LedgerError::InsufficientFunds`]
    /// when the debit would breach zero and negative balances are
    /// disallowed. The check runs before any row is written.
    pub fn debit(
        &self,
        amount: &str,
        options: Options,
        label: Option<&str>,
        currency: Option<&str>,
    ) -> Result<Arc<Entry>, LedgerError> {
        let ledger = self.ledger;
        let amount = amount::normalize(amount, ledger.config.precision)?;
        let target = self.target_currency(currency);
        if let Some(stated) = &options.currency {
            currency::assert_match(stated, &target)?;
        }
        let wallet = ledger
            .resolver()
            .resolve(&self.owner, label.unwrap_or(&self.label), &target);

        let entry = {
            let mut data = wallet.lock();
            let new_balance = data.balance - amount;
            if !ledger.config.allow_negative && new_balance < Decimal::ZERO {
                return Err(LedgerError::InsufficientFunds);
            }

            if let Some(key) = options.idempotency_key.as_deref() {
                if data.has_key(key) {
                    return Err(LedgerError::DuplicateOperation);
                }
            }

            ledger.record_entry(
                &wallet,
                &mut data,
                EntryType::Debit,
                amount,
                new_balance,
                options.reference,
                options.idempotency_key,
                options.meta,
            )
        };

        debug!(wallet = %wallet.id(), entry = %entry.id, amount = %amount, "debit committed");
        ledger.events.publish(vec![LedgerEvent::EntryRecorded(Arc::clone(&entry))]);
        Ok(entry)
    }

    /// Moves funds to `to_owner`'s wallet atomically.
    ///
    /// The source is this handle's wallet (or `from_label`); the destination
    /// is `to_owner`'s wallet for `to_label`, defaulting to `"main"`. Both
    /// sides share the handle currency unless `currency` overrides it. On
    /// success exactly two entries (debit tagged `-out`, credit tagged
    /// `-in`) and one COMPLETED transfer row exist; on any failure, none do.
    pub fn transfer(
        &self,
        to_owner: &OwnerRef,
        amount: &str,
        options: Options,
        from_label: Option<&str>,
        to_label: Option<&str>,
        currency: Option<&str>,
    ) -> Result<Arc<Transfer>, LedgerError> {
        let ledger = self.ledger;
        // Reject bad amounts before resolution creates either wallet row.
        amount::normalize(amount, ledger.config.precision)?;
        let mut resolver = ledger.resolver();
        let target = self.target_currency(currency);
        let from = resolver.resolve(&self.owner, from_label.unwrap_or(&self.label), &target);
        let to = resolver.resolve(to_owner, to_label.unwrap_or("main"), &target);
        ledger.transfer_between(&from, &to, amount, options)
    }

    /// Current balance of the wallet, creating it lazily at zero.
    pub fn balance(&self, label: Option<&str>, currency: Option<&str>) -> Decimal {
        self.resolve(&mut self.ledger.resolver(), label, currency).balance()
    }

    /// Up to `limit` entries, newest first by sequence.
    pub fn history(
        &self,
        limit: usize,
        label: Option<&str>,
        currency: Option<&str>,
    ) -> Vec<Arc<Entry>> {
        let wallet = self.resolve(&mut self.ledger.resolver(), label, currency);
        let data = wallet.lock();
        data.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Entries created within `[from, to]`, newest first.
    pub fn history_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        label: Option<&str>,
        currency: Option<&str>,
    ) -> Vec<Arc<Entry>> {
        let wallet = self.resolve(&mut self.ledger.resolver(), label, currency);
        let data = wallet.lock();
        data.entries
            .iter()
            .rev()
            .filter(|entry| entry.created_at >= from && entry.created_at <= to)
            .cloned()
            .collect()
    }

    /// Offset-paginated history, newest first. Pages are 1-based.
    pub fn paginate_history(
        &self,
        per_page: usize,
        page: usize,
        label: Option<&str>,
        currency: Option<&str>,
    ) -> Page<Arc<Entry>> {
        let wallet = self.resolve(&mut self.ledger.resolver(), label, currency);
        let data = wallet.lock();
        let page = page.max(1);
        let items = data
            .entries
            .iter()
            .rev()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        Page {
            items,
            total: data.entries.len(),
            page,
            per_page,
        }
    }

    /// Cursor-paginated history, newest first. Pass the previous page's
    /// `next_cursor` to continue.
    pub fn cursor_history(
        &self,
        per_page: usize,
        cursor: Option<EntryId>,
        label: Option<&str>,
        currency: Option<&str>,
    ) -> CursorPage<Arc<Entry>> {
        let wallet = self.resolve(&mut self.ledger.resolver(), label, currency);
        let data = wallet.lock();
        let mut iter = data
            .entries
            .iter()
            .rev()
            .filter(|entry| cursor.is_none_or(|after| entry.id < after));
        let items: Vec<Arc<Entry>> = iter.by_ref().take(per_page).cloned().collect();
        let next_cursor = if iter.next().is_some() {
            items.last().map(|entry| entry.id)
        } else {
            None
        };
        CursorPage { items, next_cursor }
    }

    /// All of the owner's wallets, ordered by label then currency.
    pub fn wallets(&self) -> Vec<Arc<Wallet>> {
        self.ledger.store.wallets_of(&self.owner)
    }

    /// Balance snapshot per wallet (label, currency, balance), ordered by
    /// label then currency.
    pub fn balances(&self) -> Vec<(String, Currency, Decimal)> {
        self.ledger
            .store
            .wallets_of(&self.owner)
            .into_iter()
            .map(|wallet| {
                (
                    wallet.label().to_string(),
                    wallet.currency().clone(),
                    wallet.balance(),
                )
            })
            .collect()
    }

    /// Sum of the owner's balances grouped by currency.
    pub fn total_balance_by_currency(&self) -> Vec<(Currency, Decimal)> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for wallet in self.ledger.store.wallets_of(&self.owner) {
            *totals
                .entry(wallet.currency().as_str().to_string())
                .or_insert(Decimal::ZERO) += wallet.balance();
        }
        totals
            .into_iter()
            .map(|(code, total)| (Currency::new(&code), total))
            .collect()
    }

    /// Finds or creates the owner's wallet for (label, currency).
    pub fn ensure_wallet(&self, label: &str, currency: &str) -> Arc<Wallet> {
        self.ledger
            .resolver()
            .resolve(&self.owner, label, &Currency::new(currency))
    }
}

/// Meta map for a transfer entry: the caller's meta plus the direction tag.
fn direction_meta(direction: &str, meta: Option<&Meta>) -> Meta {
    let mut merged = meta.cloned().unwrap_or_default();
    merged.insert(
        "direction".to_string(),
        serde_json::Value::String(direction.to_string()),
    );
    merged
}
