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

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use virtual_wallet_rs::{Ledger, Options, OwnerRef};

/// Virtual Wallet - Process ledger operation CSV files
///
/// Reads credit/debit/transfer operations from a CSV file and outputs the
/// resulting wallet balances to stdout.
#[derive(Parser, Debug)]
#[command(name = "virtual-wallet-rs")]
#[command(about = "A wallet ledger that processes operation CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: op,owner,counterparty,amount,currency,label,key
    /// Example: cargo run -- operations.csv > wallets.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let ledger = match process_operations(BufReader::new(file)) {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("Error processing operations: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_wallets(&ledger, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, owner, counterparty, amount, currency, label, key`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    owner: u64,
    #[serde(deserialize_with = "csv::invalid_option")]
    counterparty: Option<u64>,
    amount: String,
    currency: Option<String>,
    label: Option<String>,
    key: Option<String>,
}

fn non_empty(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|value| !value.is_empty())
}

/// Process ledger operations from a CSV reader.
///
/// Uses streaming parsing so arbitrarily large files never load into memory
/// at once. Malformed rows and failed operations are skipped; failures are
/// reported to stderr but do not stop processing.
///
/// # CSV Format
///
/// Expected columns: `op, owner, counterparty, amount, currency, label, key`
/// - `op`: Operation (credit, debit, transfer)
/// - `owner`: Owner id (u64)
/// - `counterparty`: Destination owner id, transfers only
/// - `amount`: Decimal amount
/// - `currency`, `label`, `key`: Optional overrides (empty = default)
///
/// # Example
///
/// ```csv
/// op,owner,counterparty,amount,currency,label,key
/// credit,1,,100.00,,,
/// transfer,1,2,40.00,,,order-77
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_operations<R: Read>(reader: R) -> Result<Ledger, csv::Error> {
    let ledger = Ledger::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (row, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Skipping malformed row {}: {}", row + 1, e);
                continue;
            }
        };

        let owner = OwnerRef::new("owner", record.owner);
        let handle = ledger.holder(&owner);
        let mut options = Options::default();
        if let Some(key) = non_empty(record.key.as_ref()) {
            options = options.idempotency_key(key);
        }
        let label = non_empty(record.label.as_ref());
        let currency = non_empty(record.currency.as_ref());

        let outcome = match record.op.to_lowercase().as_str() {
            "credit" => handle
                .credit(&record.amount, options, label, currency)
                .map(|_| ()),
            "debit" => handle
                .debit(&record.amount, options, label, currency)
                .map(|_| ()),
            "transfer" => {
                let Some(counterparty) = record.counterparty else {
                    eprintln!("Skipping transfer without counterparty at row {}", row + 1);
                    continue;
                };
                let to = OwnerRef::new("owner", counterparty);
                handle
                    .transfer(&to, &record.amount, options, label, None, currency)
                    .map(|_| ())
            }
            other => {
                eprintln!("Skipping unknown operation '{}' at row {}", other, row + 1);
                continue;
            }
        };

        if let Err(e) = outcome {
            eprintln!("Skipping row {}: {}", row + 1, e);
        }
    }

    Ok(ledger)
}

/// Flat output row for one wallet.
#[derive(Debug, Serialize)]
struct WalletRow {
    wallet: u64,
    owner: String,
    label: String,
    currency: String,
    balance: Decimal,
}

/// Write wallet balances to a CSV writer.
///
/// # CSV Format
///
/// Columns: `wallet, owner, label, currency, balance`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_wallets<W: Write>(ledger: &Ledger, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for wallet in ledger.all_wallets() {
        wtr.serialize(WalletRow {
            wallet: wallet.id().0,
            owner: wallet.owner().to_string(),
            label: wallet.label().to_string(),
            currency: wallet.currency().to_string(),
            balance: wallet.balance(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
