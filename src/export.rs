//! Writes expenses out as CSV.

use std::io::Write;

use serde::Serialize;

use crate::{Error, Expense};

#[derive(Serialize)]
struct ExpenseRecord<'a> {
    description: &'a str,
    amount: f64,
    category: &'a str,
}

/// Write `expenses` to `writer` as CSV with the header
/// `description,amount,category`.
///
/// # Errors
///
/// Returns an [Error::ExportError] if a record could not be written.
pub fn export_expenses<W: Write>(expenses: &[Expense], writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if expenses.is_empty() {
        csv_writer
            .write_record(["description", "amount", "category"])
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    for expense in expenses {
        csv_writer
            .serialize(ExpenseRecord {
                description: &expense.description,
                amount: expense.amount,
                category: &expense.category,
            })
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|error| Error::ExportError(error.to_string()))
}
