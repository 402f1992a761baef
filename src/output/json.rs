//! JSON output and the raw field list input

use super::create_parent_dirs;
use crate::contacts::ContactRecord;
use crate::error::{ContactsError, Result};
use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write any serializable value as pretty JSON, replacing the file
fn write_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<()> {
    create_parent_dirs(path)?;

    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    debug!("Wrote JSON to {}", path.display());
    Ok(())
}

/// Write contacts as an array of `[email, [names...]]`
pub fn write_contacts(contacts: &[ContactRecord], path: &Path) -> Result<()> {
    write_json(contacts, path)
}

/// Write the bare emails of `contacts`, keeping their order
pub fn write_emails(contacts: &[ContactRecord], path: &Path) -> Result<()> {
    let emails: Vec<&str> = contacts.iter().map(|c| c.email.as_str()).collect();
    write_json(&emails, path)
}

/// Write raw header strings so a later run can skip the mailbox
pub fn write_fields(fields: &[String], path: &Path) -> Result<()> {
    write_json(fields, path)
}

/// Read a flat JSON array of raw header strings
///
/// # Errors
/// Returns an error if the file cannot be read or is not an array of strings.
pub fn read_fields(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let fields: Vec<String> = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        ContactsError::Config(format!(
            "Expected a JSON array of header strings in {}: {e}",
            path.display()
        ))
    })?;

    debug!("Loaded {} fields from {}", fields.len(), path.display());
    Ok(fields)
}
