use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::model::ProductError;
use crate::{Amount, Coin, Command, Product, VendingMachine};

/// Errors that can occur when reading a command script
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized command type '{kind}'")]
    UnrecognizedType { line: usize, kind: String },

    #[error("line {line}: {kind} missing {field}")]
    MissingField {
        line: usize,
        kind: &'static str,
        field: &'static str,
    },

    #[error("line {line}: unknown coin '{coin}'")]
    UnknownCoin { line: usize, coin: String },

    #[error("line {line}: {source}")]
    InvalidProduct { line: usize, source: ProductError },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    r#type: String,
    shelf: Option<String>,
    product: Option<String>,
    name: Option<String>,
    price: Option<u64>,
    coin: Option<String>,
    count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    kind: &'static str,
    code: &'a str,
    name: &'a str,
    price: String,
    quantity: u32,
}

/// Pulls required fields out of a row, tagging errors with the line and command kind
struct Fields {
    line: usize,
    kind: &'static str,
}

impl Fields {
    fn require<T>(&self, value: Option<T>, field: &'static str) -> Result<T, CsvError> {
        value.ok_or(CsvError::MissingField {
            line: self.line,
            kind: self.kind,
            field,
        })
    }

    fn coin(&self, value: Option<String>) -> Result<Coin, CsvError> {
        let name = self.require(value, "coin")?;
        Coin::from_name(&name).ok_or(CsvError::UnknownCoin {
            line: self.line,
            coin: name,
        })
    }
}

/// Read commands from a csv script
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_row(line, row)
        }))
}

fn parse_row(line: usize, row: InputRow) -> Result<Command, CsvError> {
    let fields = |kind| Fields { line, kind };

    match row.r#type.to_ascii_lowercase().as_str() {
        "add_shelf" => Ok(Command::AddShelf {
            shelf: fields("add_shelf").require(row.shelf, "shelf")?,
        }),
        "stock" => {
            let fields = fields("stock");
            let shelf = fields.require(row.shelf, "shelf")?;
            let id = fields.require(row.product, "product")?;
            let name = fields.require(row.name, "name")?;
            let price = fields.require(row.price, "price")?;
            let quantity = fields.require(row.count, "count")?;
            let product = Product::new(id, name, Amount::from_cents(price))
                .map_err(|source| CsvError::InvalidProduct { line, source })?;
            Ok(Command::Stock {
                shelf,
                product,
                quantity,
            })
        }
        "restock" => {
            let fields = fields("restock");
            Ok(Command::Restock {
                shelf: fields.require(row.shelf, "shelf")?,
                amount: fields.require(row.count, "count")?,
            })
        }
        "load" => {
            let fields = fields("load");
            Ok(Command::LoadCoins {
                coin: fields.coin(row.coin)?,
                count: fields.require(row.count, "count")?,
            })
        }
        "insert" => Ok(Command::InsertCoin(fields("insert").coin(row.coin)?)),
        "select" => Ok(Command::Select(fields("select").require(row.shelf, "shelf")?)),
        "dispense" => Ok(Command::Dispense),
        "cancel" => Ok(Command::Cancel),
        _ => Err(CsvError::UnrecognizedType {
            line,
            kind: row.r#type,
        }),
    }
}

/// Write the machine's shelves and coin counts in csv format
pub fn write_report(machine: &VendingMachine, writer: impl io::Write) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    for shelf in machine.shelves().shelves() {
        let product = shelf.product();
        writer.serialize(OutputRow {
            kind: "shelf",
            code: shelf.code(),
            name: product.map(Product::name).unwrap_or_default(),
            price: product
                .map(|p| p.price().to_string())
                .unwrap_or_default(),
            quantity: shelf.quantity(),
        })?;
    }

    for (coin, count) in machine.ledger().counts() {
        writer.serialize(OutputRow {
            kind: "coin",
            code: coin.name(),
            name: "",
            price: coin.value().to_string(),
            quantity: count,
        })?;
    }

    writer.flush()?;
    Ok(())
}
