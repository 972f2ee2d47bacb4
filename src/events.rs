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

//! Post-commit notification delivery.
//!
//! Operations queue events while holding row locks and flush them through
//! the bus only after every mutation has been applied and the locks
//! released. A failed or rolled-back operation publishes nothing. Delivery
//! is fire-and-forget: subscriber failures never affect the committed
//! mutation.

use crate::entry::Entry;
use crate::transfer::Transfer;
use crossbeam::channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::sync::Arc;

/// Events emitted by the ledger after a successful operation.
#[derive(Debug, Clone)]
pub enum LedgerEvent {
    /// A credit or debit entry was committed (including each side of a transfer).
    EntryRecorded(Arc<Entry>),
    /// A transfer was committed.
    TransferCompleted(Arc<Transfer>),
}

#[derive(Debug)]
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<Sender<LedgerEvent>>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new subscriber and returns its receiving end.
    pub(crate) fn subscribe(&self) -> Receiver<LedgerEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Fans events out to all subscribers, pruning disconnected ones.
    pub(crate) fn publish(&self, events: Vec<LedgerEvent>) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| events.iter().all(|event| sender.send(event.clone()).is_ok()));
    }
}
