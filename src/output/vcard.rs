//! vCard 3.0 output

use super::create_parent_dirs;
use crate::contacts::ContactRecord;
use crate::error::Result;
use log::debug;
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

/// Characters that disqualify a name from the FN/N/NOTE properties
static INVALID_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.;:\n\r]").expect("Invalid INVALID_NAME_REGEX pattern"));

/// Full name used when a contact has no usable name
pub const NO_NAME: &str = "No name";

/// Maximum line length in octets before folding
const LINE_LIMIT: usize = 75;

const QUOTES: &[char] = &['"', '\''];

/// Names usable in a vCard, in record order, with quotes stripped
#[must_use]
pub fn valid_names(contact: &ContactRecord) -> Vec<&str> {
    contact
        .names
        .iter()
        .filter(|name| !INVALID_NAME_REGEX.is_match(name))
        .map(|name| name.trim_matches(QUOTES))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Render one contact as a vCard 3.0 record with CRLF line endings
#[must_use]
pub fn render_vcard(contact: &ContactRecord) -> String {
    let names = valid_names(contact);
    let full_name = escape_text(names.first().copied().unwrap_or(NO_NAME));

    let mut card = String::new();
    push_line(&mut card, "BEGIN:VCARD");
    push_line(&mut card, "VERSION:3.0");
    push_line(
        &mut card,
        &format!("EMAIL:{}", escape_text(contact.email.trim_matches(QUOTES))),
    );
    push_line(&mut card, &format!("FN:{full_name}"));
    push_line(&mut card, &format!("N:{full_name};;;;"));

    let note = names.join(", ");
    if !note.is_empty() {
        push_line(&mut card, &format!("NOTE:{}", escape_text(&note)));
    }

    push_line(&mut card, "END:VCARD");
    card
}

/// Write every contact as a vCard, replacing the file. Returns the number of cards.
pub fn write_vcards(contacts: &[ContactRecord], path: &Path) -> Result<u64> {
    create_parent_dirs(path)?;

    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, file);
    let mut count = 0;

    for contact in contacts {
        writer.write_all(render_vcard(contact).as_bytes())?;
        count += 1;
    }
    writer.flush()?;

    debug!("Wrote {count} vCards to {}", path.display());
    Ok(count)
}

/// Escape a TEXT value
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Append a content line, folded at [`LINE_LIMIT`] octets without splitting characters
fn push_line(card: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = LINE_LIMIT;

    while rest.len() > limit {
        let mut split = limit;
        while !rest.is_char_boundary(split) {
            split -= 1;
        }
        card.push_str(&rest[..split]);
        card.push_str("\r\n ");
        rest = &rest[split..];
        // continuation lines start with a space
        limit = LINE_LIMIT - 1;
    }

    card.push_str(rest);
    card.push_str("\r\n");
}
