//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// Extract contact emails and names from a Gmail mbox export
#[derive(Parser, Debug)]
#[command(name = "mbox_contacts")]
#[command(version)]
#[command(about = "Extract contact emails and names from Gmail mbox exports into JSON and vCard files")]
#[command(long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Path to a .mbox file, or to a .json file of previously dumped header fields
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to the contacts JSON file; the emails-only JSON and contacts.vcf are written next to it
    #[arg(short, long, default_value = "contacts.json")]
    pub output: PathBuf,

    /// Path to the log file (overwritten on every run)
    #[arg(long, default_value = "log.txt")]
    pub log_file: PathBuf,

    /// Write the extracted header fields to "<mbox stem> - <From To> fields.json"
    #[arg(long)]
    pub dump_fields: bool,

    /// Ignore "From" headers
    #[arg(long)]
    pub omit_from: bool,

    /// Ignore "To" headers
    #[arg(long)]
    pub omit_to: bool,

    /// Merge emails that differ only by letter case into one lower-cased contact
    #[arg(long)]
    pub merge_case_variants: bool,

    /// Hide the progress spinner while reading the mailbox
    #[arg(long)]
    pub no_progress: bool,

    /// Show debug messages on the console
    #[arg(long)]
    pub debug: bool,
}
