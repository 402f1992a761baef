//! Output files: contacts JSON, emails-only JSON, vCards and raw field dumps

mod json;
mod vcard;

pub use json::{read_fields, write_contacts, write_emails, write_fields};
pub use vcard::{render_vcard, valid_names, write_vcards};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// File name of the vCard output, placed next to the contacts JSON
pub const VCARD_FILE_NAME: &str = "contacts.vcf";

/// Prefix of the emails-only JSON file name
pub const EMAILS_ONLY_PREFIX: &str = "emails only - ";

/// The three files written for every run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `[email, [names...]]` pairs
    pub contacts: PathBuf,
    /// Bare emails, same order
    pub emails_only: PathBuf,
    /// vCard 3.0 records
    pub vcard: PathBuf,
}

impl OutputPaths {
    /// Derive the sibling output paths from the contacts JSON path
    #[must_use]
    pub fn from_contacts_path(contacts: &Path) -> Self {
        let stem = contacts
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut emails_only_name = format!("{EMAILS_ONLY_PREFIX}{stem}");
        if let Some(extension) = contacts.extension() {
            emails_only_name.push('.');
            emails_only_name.push_str(&extension.to_string_lossy());
        }

        Self {
            contacts: contacts.to_path_buf(),
            emails_only: contacts.with_file_name(emails_only_name),
            vcard: contacts.with_file_name(VCARD_FILE_NAME),
        }
    }

    /// All output paths, contacts first
    #[must_use]
    pub fn all(&self) -> [&Path; 3] {
        [&self.contacts, &self.emails_only, &self.vcard]
    }
}

/// Path of the raw field dump: `<mbox dir>/<mbox stem> - <From To> fields.json`
#[must_use]
pub fn fields_dump_path(mbox_path: &Path, field_types: &[&str]) -> PathBuf {
    let stem = mbox_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem} - {} fields.json", field_types.join(" "));
    mbox_path.with_file_name(name)
}

/// Create the parent directory of an output file if needed
fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
