//! Run configuration and input/output path validation

use crate::cli::Args;
use crate::error::{ContactsError, Result};
use crate::mbox::MboxExtractor;
use crate::output::{fields_dump_path, OutputPaths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of input file, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A mailbox to read `From`/`To` headers from
    Mbox,
    /// A JSON array of previously dumped header strings
    Json,
}

impl InputKind {
    /// Extension (without the dot) expected for this kind
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mbox => "mbox",
            Self::Json => "json",
        }
    }
}

/// Main configuration for a contact extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Path to the .mbox or .json input
    pub input_path: PathBuf,

    /// Path to the contacts JSON output
    pub output_path: PathBuf,

    /// Path to the log file
    pub log_path: PathBuf,

    /// Dump the extracted header fields next to the mbox
    pub dump_fields: bool,

    /// Skip `From` headers
    pub omit_from: bool,

    /// Skip `To` headers
    pub omit_to: bool,

    /// Merge emails differing only by case into one lower-cased contact
    pub merge_case_variants: bool,

    /// Show the mailbox progress spinner
    pub show_progress: bool,

    /// Enable debug console output
    pub debug_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_path: PathBuf::from("contacts.json"),
            log_path: PathBuf::from("log.txt"),
            dump_fields: false,
            omit_from: false,
            omit_to: false,
            merge_case_variants: false,
            show_progress: true,
            debug_mode: false,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input_path: args.input,
            output_path: args.output,
            log_path: args.log_file,
            dump_fields: args.dump_fields,
            omit_from: args.omit_from,
            omit_to: args.omit_to,
            merge_case_variants: args.merge_case_variants,
            show_progress: !args.no_progress,
            debug_mode: args.debug,
        }
    }
}

impl Config {
    /// Decide the input kind from the input path extension
    ///
    /// # Errors
    /// Returns a configuration error for anything but `.mbox` or `.json`.
    pub fn input_kind(&self) -> Result<InputKind> {
        let has_extension = |kind: InputKind| {
            self.input_path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(kind.extension()))
        };

        if has_extension(InputKind::Mbox) {
            Ok(InputKind::Mbox)
        } else if has_extension(InputKind::Json) {
            Ok(InputKind::Json)
        } else {
            Err(ContactsError::Config(format!(
                "Input must be a .mbox file or a .json file of header fields: {}",
                display_absolute(&self.input_path)
            )))
        }
    }

    /// Paths of the files this run writes
    #[must_use]
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::from_contacts_path(&self.output_path)
    }

    /// Whether both `From` and `To` headers are omitted
    #[must_use]
    pub const fn omits_all_fields(&self) -> bool {
        self.omit_from && self.omit_to
    }

    /// Extractor for the requested header kinds
    #[must_use]
    pub fn extractor(&self) -> MboxExtractor {
        MboxExtractor::new()
            .with_from(!self.omit_from)
            .with_to(!self.omit_to)
    }

    /// Where the extracted header fields are dumped, if they are
    #[must_use]
    pub fn fields_dump_path(&self) -> Option<PathBuf> {
        (self.dump_fields && !self.omits_all_fields())
            .then(|| fields_dump_path(&self.input_path, &self.extractor().field_types()))
    }

    /// Check every path before any parsing starts
    ///
    /// # Errors
    /// Returns a configuration error for a missing, non-file or wrongly
    /// typed input, or for an output or fields dump path that is an
    /// existing non-file.
    pub fn validate(&self) -> Result<InputKind> {
        for output in self.output_paths().all() {
            ensure_is_file(output, false)?;
        }

        let kind = self.input_kind()?;
        if kind == InputKind::Mbox {
            if let Some(dump_path) = self.fields_dump_path() {
                ensure_is_file(&dump_path, false)?;
            }
        }

        ensure_existing_file(&self.input_path, kind.extension())?;
        Ok(kind)
    }
}

fn display_absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Ensure `path` is a file, or (unless `must_exist`) does not exist yet
///
/// # Errors
/// Returns a configuration error naming the absolute path.
pub fn ensure_is_file(path: &Path, must_exist: bool) -> Result<()> {
    let exists = path.exists();

    if must_exist && !exists {
        return Err(ContactsError::Config(format!(
            "Path does not exist but must exist: {}",
            display_absolute(path)
        )));
    }

    if exists && !path.is_file() {
        return Err(ContactsError::Config(format!(
            "Path exists but is to a non-file: {}",
            display_absolute(path)
        )));
    }

    Ok(())
}

/// Ensure an existing file with the given extension (without dot) is at `path`
///
/// # Errors
/// Returns a configuration error if the file is missing or has another extension.
pub fn ensure_existing_file(path: &Path, extension: &str) -> Result<()> {
    ensure_is_file(path, true)?;

    let matches = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    if !matches {
        return Err(ContactsError::Config(format!(
            "Path to file exists but is not to a .{extension} file: {}",
            display_absolute(path)
        )));
    }

    Ok(())
}
