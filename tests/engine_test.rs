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

//! Ledger public API integration tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use virtual_wallet_rs::{
    EntryType, Ledger, LedgerConfig, LedgerError, LedgerEvent, Meta, Options, OwnerRef,
};

fn owner(id: u64) -> OwnerRef {
    OwnerRef::new("User", id)
}

// === Credit / Debit ===

#[test]
fn credit_creates_wallet_and_updates_balance() {
    let ledger = Ledger::new();
    let alice = owner(1);

    let entry = ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();

    assert!(entry.is_credit());
    assert_eq!(entry.amount, dec!(50.00));
    assert_eq!(entry.balance_after, dec!(50.00));
    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(50.00));
}

#[test]
fn balances_carry_the_configured_scale() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.5", Options::default(), None, None)
        .unwrap();

    assert_eq!(
        ledger.holder(&alice).balance(None, None).to_string(),
        "10.50000000"
    );
}

#[test]
fn credit_rounds_excess_precision() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.123456789", Options::default(), None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(10.12345679));
}

#[test]
fn invalid_amounts_are_rejected_without_side_effects() {
    let ledger = Ledger::new();
    let alice = owner(1);

    for bad in ["abc", "", "0", "0.00", "-5.00"] {
        let result = ledger.holder(&alice).credit(bad, Options::default(), None, None);
        assert_eq!(result.unwrap_err(), LedgerError::InvalidAmount, "input: {bad:?}");
    }

    assert_eq!(ledger.holder(&alice).balance(None, None), Decimal::ZERO);
    assert!(ledger.holder(&alice).history(10, None, None).is_empty());
}

#[test]
fn failed_validation_creates_no_wallet() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    let _ = ledger.holder(&alice).credit("abc", Options::default(), None, None);
    let _ = ledger.holder(&alice).debit("-1.00", Options::default(), None, None);
    let _ = ledger
        .holder(&alice)
        .credit("10.00", Options::new().currency("USD"), None, None);
    let _ = ledger
        .holder(&alice)
        .transfer(&bob, "nope", Options::default(), None, None, None);

    assert!(ledger.holder(&alice).wallets().is_empty());
    assert!(ledger.holder(&bob).wallets().is_empty());
    assert!(ledger.all_wallets().is_empty());
}

#[test]
fn debit_after_credit() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("100.00", Options::default(), None, None)
        .unwrap();
    let entry = ledger
        .holder(&alice)
        .debit("30.00", Options::default(), None, None)
        .unwrap();

    assert!(entry.is_debit());
    assert_eq!(entry.amount, dec!(-30.00));
    assert_eq!(entry.balance_after, dec!(70.00));
    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(70.00));
}

#[test]
fn debit_to_exactly_zero_is_allowed() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("5.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .debit("5.00", Options::default(), None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), Decimal::ZERO);
}

#[test]
fn debit_insufficient_funds_at_full_precision() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("5.00000000", Options::default(), None, None)
        .unwrap();

    let result = ledger
        .holder(&alice)
        .debit("5.00000001", Options::default(), None, None);
    assert_eq!(result.unwrap_err(), LedgerError::InsufficientFunds);

    // Balance and entry count unchanged.
    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(5.00000000));
    assert_eq!(ledger.holder(&alice).history(10, None, None).len(), 1);
}

#[test]
fn allow_negative_permits_overdraft() {
    let config = LedgerConfig {
        allow_negative: true,
        ..LedgerConfig::default()
    };
    let ledger = Ledger::with_config(config);
    let alice = owner(1);

    ledger
        .holder(&alice)
        .debit("25.00", Options::default(), None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(-25.00));
}

// === Currency guard ===

#[test]
fn stated_currency_mismatch_writes_nothing() {
    let ledger = Ledger::new();
    let alice = owner(1);

    let result = ledger
        .holder(&alice)
        .credit("10.00", Options::new().currency("USD"), None, None);
    assert_eq!(result.unwrap_err(), LedgerError::CurrencyMismatch);

    assert_eq!(ledger.holder(&alice).balance(None, None), Decimal::ZERO);
    assert!(ledger.holder(&alice).history(10, None, None).is_empty());
}

#[test]
fn currency_guard_is_case_insensitive() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::new().currency("eur"), None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(10.00));
}

#[test]
fn default_currency_is_configurable() {
    let config = LedgerConfig {
        default_currency: "usd".into(),
        ..LedgerConfig::default()
    };
    let ledger = Ledger::with_config(config);
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();

    let wallets = ledger.holder(&alice).wallets();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].currency().as_str(), "USD");
}

// === Idempotency ===

#[test]
fn duplicate_idempotency_key_is_rejected() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::new().idempotency_key("k1"), None, None)
        .unwrap();
    let result = ledger
        .holder(&alice)
        .credit("10.00", Options::new().idempotency_key("k1"), None, None);

    assert_eq!(result.unwrap_err(), LedgerError::DuplicateOperation);
    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(10.00));
    assert_eq!(ledger.holder(&alice).history(10, None, None).len(), 1);
}

#[test]
fn idempotency_keys_are_scoped_per_wallet() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .credit("10.00", Options::new().idempotency_key("k1"), None, None)
        .unwrap();
    ledger
        .holder(&bob)
        .credit("10.00", Options::new().idempotency_key("k1"), None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(10.00));
    assert_eq!(ledger.holder(&bob).balance(None, None), dec!(10.00));
}

#[test]
fn debit_and_credit_share_the_wallet_key_space() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::new().idempotency_key("k1"), None, None)
        .unwrap();
    let result = ledger
        .holder(&alice)
        .debit("10.00", Options::new().idempotency_key("k1"), None, None);

    assert_eq!(result.unwrap_err(), LedgerError::DuplicateOperation);
}

#[test]
fn absent_key_means_no_deduplication() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(20.00));
    assert_eq!(ledger.holder(&alice).history(10, None, None).len(), 2);
}

// === Balance consistency ===

#[test]
fn balance_equals_signed_sum_of_entries() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let handle = ledger.holder(&alice);

    handle.credit("100.00", Options::default(), None, None).unwrap();
    handle.debit("30.00", Options::default(), None, None).unwrap();
    handle.credit("7.50", Options::default(), None, None).unwrap();
    handle.debit("0.50", Options::default(), None, None).unwrap();

    let entries = handle.history(100, None, None);
    let sum: Decimal = entries.iter().map(|entry| entry.amount).sum();
    assert_eq!(handle.balance(None, None), sum);
    assert_eq!(sum, dec!(77.00));
}

#[test]
fn entries_chain_balance_after() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let handle = ledger.holder(&alice);

    handle.credit("10.00", Options::default(), None, None).unwrap();
    handle.credit("5.00", Options::default(), None, None).unwrap();
    handle.debit("3.00", Options::default(), None, None).unwrap();

    // Oldest first.
    let mut entries = handle.history(100, None, None);
    entries.reverse();

    let mut running = Decimal::ZERO;
    for entry in &entries {
        running += entry.amount;
        assert_eq!(entry.balance_after, running);
    }
}

// === Wallet labels ===

#[test]
fn labels_create_separate_wallets() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .label("savings")
        .credit("90.00", Options::default(), None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(10.00));
    assert_eq!(ledger.holder(&alice).balance(Some("savings"), None), dec!(90.00));
    assert_eq!(ledger.holder(&alice).wallets().len(), 2);
}

#[test]
fn per_call_label_overrides_the_handle() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), Some("bonus"), None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(Some("bonus"), None), dec!(10.00));
    assert_eq!(ledger.holder(&alice).balance(None, None), Decimal::ZERO);
}

// === Transfers ===

#[test]
fn transfer_moves_funds_atomically() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();

    let transfer = ledger
        .holder(&alice)
        .transfer(&bob, "20.00", Options::default(), None, None, None)
        .unwrap();

    assert_eq!(transfer.amount, dec!(20.00));
    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(30.00));
    assert_eq!(ledger.holder(&bob).balance(None, None), dec!(20.00));
    assert_eq!(ledger.transfer_count(), 1);

    let debit = &ledger.holder(&alice).history(1, None, None)[0];
    let credit = &ledger.holder(&bob).history(1, None, None)[0];
    assert_eq!(debit.entry_type, EntryType::Debit);
    assert_eq!(debit.amount, dec!(-20.00));
    assert_eq!(credit.entry_type, EntryType::Credit);
    assert_eq!(credit.amount, dec!(20.00));
}

#[test]
fn transfer_entries_carry_direction_meta_and_key_suffixes() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();

    let mut meta = Meta::new();
    meta.insert("order".to_string(), serde_json::json!(77));
    let transfer = ledger
        .holder(&alice)
        .transfer(
            &bob,
            "20.00",
            Options::new().idempotency_key("t1").meta(meta),
            None,
            None,
            None,
        )
        .unwrap();

    assert_eq!(transfer.idempotency_key.as_deref(), Some("t1"));

    let debit = &ledger.holder(&alice).history(1, None, None)[0];
    let credit = &ledger.holder(&bob).history(1, None, None)[0];

    assert_eq!(debit.idempotency_key.as_deref(), Some("t1-out"));
    assert_eq!(credit.idempotency_key.as_deref(), Some("t1-in"));

    let debit_meta = debit.meta.as_ref().unwrap();
    assert_eq!(debit_meta["direction"], "out");
    assert_eq!(debit_meta["order"], 77);
    let credit_meta = credit.meta.as_ref().unwrap();
    assert_eq!(credit_meta["direction"], "in");
}

#[test]
fn transfer_currency_mismatch_changes_nothing() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();
    let from = ledger.holder(&alice).ensure_wallet("main", "EUR");
    let to = ledger.holder(&bob).ensure_wallet("main", "USD");

    let result = ledger.transfer_between(&from, &to, "20.00", Options::default());
    assert_eq!(result.unwrap_err(), LedgerError::CurrencyMismatch);

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(50.00));
    assert_eq!(ledger.holder(&bob).balance(None, Some("USD")), Decimal::ZERO);
    assert_eq!(ledger.transfer_count(), 0);
}

#[test]
fn transfer_insufficient_funds_writes_nothing() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();

    let result = ledger
        .holder(&alice)
        .transfer(&bob, "20.00", Options::default(), None, None, None);
    assert_eq!(result.unwrap_err(), LedgerError::InsufficientFunds);

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(10.00));
    assert_eq!(ledger.holder(&bob).balance(None, None), Decimal::ZERO);
    assert_eq!(ledger.holder(&alice).history(10, None, None).len(), 1);
    assert!(ledger.holder(&bob).history(10, None, None).is_empty());
    assert_eq!(ledger.transfer_count(), 0);
}

#[test]
fn transfer_duplicate_key_is_rejected_globally() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();

    ledger
        .holder(&alice)
        .transfer(&bob, "20.00", Options::new().idempotency_key("t1"), None, None, None)
        .unwrap();
    let result = ledger
        .holder(&alice)
        .transfer(&bob, "20.00", Options::new().idempotency_key("t1"), None, None, None);

    assert_eq!(result.unwrap_err(), LedgerError::DuplicateOperation);
    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(30.00));
    assert_eq!(ledger.holder(&bob).balance(None, None), dec!(20.00));
    assert_eq!(ledger.transfer_count(), 1);
}

#[test]
fn transfer_duplicate_key_applies_even_between_different_pairs() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);
    let carol = owner(3);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();

    ledger
        .holder(&alice)
        .transfer(&bob, "10.00", Options::new().idempotency_key("t1"), None, None, None)
        .unwrap();
    // Transfer keys are global, not scoped to the wallet pair.
    let result = ledger
        .holder(&alice)
        .transfer(&carol, "10.00", Options::new().idempotency_key("t1"), None, None, None);

    assert_eq!(result.unwrap_err(), LedgerError::DuplicateOperation);
}

#[test]
fn transfer_to_self_nets_to_zero() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .transfer(&alice, "20.00", Options::default(), None, None, None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(50.00));
    assert_eq!(ledger.holder(&alice).history(10, None, None).len(), 3);
}

#[test]
fn transfer_between_labels_of_one_owner() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .transfer(&alice, "20.00", Options::default(), None, Some("savings"), None)
        .unwrap();

    assert_eq!(ledger.holder(&alice).balance(None, None), dec!(30.00));
    assert_eq!(ledger.holder(&alice).balance(Some("savings"), None), dec!(20.00));
}

#[test]
fn transfer_destination_label_defaults_to_main() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .label("payroll")
        .credit("50.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .label("payroll")
        .transfer(&bob, "20.00", Options::default(), None, None, None)
        .unwrap();

    assert_eq!(ledger.holder(&bob).balance(None, None), dec!(20.00));
    assert_eq!(ledger.holder(&alice).balance(Some("payroll"), None), dec!(30.00));
}

// === History / queries ===

#[test]
fn history_is_newest_first_with_limit() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let handle = ledger.holder(&alice);

    for i in 1..=5 {
        handle
            .credit(&format!("{i}.00"), Options::default(), None, None)
            .unwrap();
    }

    let entries = handle.history(3, None, None);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].amount, dec!(5.00));
    assert_eq!(entries[1].amount, dec!(4.00));
    assert_eq!(entries[2].amount, dec!(3.00));
    assert!(entries[0].id > entries[1].id);
}

#[test]
fn paginate_history_reports_totals() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let handle = ledger.holder(&alice);

    for i in 1..=7 {
        handle
            .credit(&format!("{i}.00"), Options::default(), None, None)
            .unwrap();
    }

    let first = handle.paginate_history(3, 1, None, None);
    assert_eq!(first.total, 7);
    assert_eq!(first.items.len(), 3);
    assert_eq!(first.items[0].amount, dec!(7.00));

    let third = handle.paginate_history(3, 3, None, None);
    assert_eq!(third.items.len(), 1);
    assert_eq!(third.items[0].amount, dec!(1.00));
}

#[test]
fn cursor_history_pages_through_the_log() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let handle = ledger.holder(&alice);

    for i in 1..=5 {
        handle
            .credit(&format!("{i}.00"), Options::default(), None, None)
            .unwrap();
    }

    let first = handle.cursor_history(2, None, None, None);
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].amount, dec!(5.00));
    let cursor = first.next_cursor.expect("more pages remain");

    let second = handle.cursor_history(2, Some(cursor), None, None);
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].amount, dec!(3.00));

    let last = handle.cursor_history(2, second.next_cursor, None, None);
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].amount, dec!(1.00));
    assert!(last.next_cursor.is_none());
}

#[test]
fn history_between_filters_by_timestamp() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let handle = ledger.holder(&alice);

    let before = chrono::Utc::now();
    handle.credit("10.00", Options::default(), None, None).unwrap();
    handle.credit("20.00", Options::default(), None, None).unwrap();
    let after = chrono::Utc::now();

    let entries = handle.history_between(before, after, None, None);
    assert_eq!(entries.len(), 2);

    let none = handle.history_between(after, after, None, None);
    assert!(none.len() <= 2); // Upper bound only; both writes may share the instant.
}

#[test]
fn totals_group_by_currency() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .credit("5.00", Options::default(), Some("savings"), None)
        .unwrap();
    ledger
        .holder(&alice)
        .currency("USD")
        .credit("3.00", Options::default(), None, None)
        .unwrap();

    let totals = ledger.holder(&alice).total_balance_by_currency();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].0.as_str(), "EUR");
    assert_eq!(totals[0].1, dec!(15.00));
    assert_eq!(totals[1].0.as_str(), "USD");
    assert_eq!(totals[1].1, dec!(3.00));
}

#[test]
fn balances_snapshot_every_wallet_by_label() {
    let ledger = Ledger::new();
    let alice = owner(1);

    ledger
        .holder(&alice)
        .credit("5.00", Options::default(), Some("savings"), None)
        .unwrap();
    ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();
    ledger
        .holder(&alice)
        .currency("USD")
        .credit("3.00", Options::default(), None, None)
        .unwrap();

    let balances = ledger.holder(&alice).balances();
    assert_eq!(balances.len(), 3);
    assert_eq!(balances[0].0, "main");
    assert_eq!(balances[0].1.as_str(), "EUR");
    assert_eq!(balances[0].2, dec!(10.00));
    assert_eq!(balances[1].0, "main");
    assert_eq!(balances[1].1.as_str(), "USD");
    assert_eq!(balances[1].2, dec!(3.00));
    assert_eq!(balances[2].0, "savings");
    assert_eq!(balances[2].2, dec!(5.00));
}

#[test]
fn ensure_wallet_is_idempotent() {
    let ledger = Ledger::new();
    let alice = owner(1);

    let first = ledger.holder(&alice).ensure_wallet("savings", "usd");
    let second = ledger.holder(&alice).ensure_wallet("savings", "USD");
    assert_eq!(first.id(), second.id());
    assert_eq!(first.currency().as_str(), "USD");
    assert_eq!(first.balance(), Decimal::ZERO);
}

// === Notifications ===

#[test]
fn credit_publishes_entry_recorded_after_commit() {
    let ledger = Ledger::new();
    let receiver = ledger.subscribe();
    let alice = owner(1);

    let entry = ledger
        .holder(&alice)
        .credit("10.00", Options::default(), None, None)
        .unwrap();

    match receiver.try_recv().unwrap() {
        LedgerEvent::EntryRecorded(event_entry) => assert_eq!(event_entry.id, entry.id),
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(receiver.try_recv().is_err());
}

#[test]
fn transfer_publishes_both_entries_and_the_transfer() {
    let ledger = Ledger::new();
    let alice = owner(1);
    let bob = owner(2);

    ledger
        .holder(&alice)
        .credit("50.00", Options::default(), None, None)
        .unwrap();

    let receiver = ledger.subscribe();
    let transfer = ledger
        .holder(&alice)
        .transfer(&bob, "20.00", Options::default(), None, None, None)
        .unwrap();

    let events: Vec<LedgerEvent> = receiver.try_iter().collect();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], LedgerEvent::EntryRecorded(entry) if entry.is_debit()));
    assert!(matches!(&events[1], LedgerEvent::EntryRecorded(entry) if entry.is_credit()));
    assert!(
        matches!(&events[2], LedgerEvent::TransferCompleted(event) if event.id == transfer.id)
    );
}

#[test]
fn failed_operations_publish_nothing() {
    let ledger = Ledger::new();
    let receiver = ledger.subscribe();
    let alice = owner(1);

    let _ = ledger.holder(&alice).debit("10.00", Options::default(), None, None);
    let _ = ledger.holder(&alice).credit("nope", Options::default(), None, None);

    assert!(receiver.try_recv().is_err());
}
