//! Contact accumulation from raw header strings

mod sort;

pub use sort::{canonical_address, derive_sort_key, sort_contacts, SortKey};

use crate::address::{match_field, NameEmailMatch};
use crate::report::{RunReport, Skip};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// A contact ready for output
///
/// Serializes as `[email, [names...]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    /// Email address
    pub email: String,
    /// Every non-empty display name seen for the address
    pub names: BTreeSet<String>,
}

impl ContactRecord {
    /// Create a new contact, trimming the email and dropping blank names
    pub fn new<I, S>(email: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            email: email.into().trim().to_string(),
            names: names
                .into_iter()
                .map(|name| name.into().trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

impl Serialize for ContactRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.email, &self.names).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContactRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (email, names) = <(String, BTreeSet<String>)>::deserialize(deserializer)?;
        Ok(Self::new(email, names))
    }
}

/// Mapping from the exact matched email string to its display names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailNames {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl EmailNames {
    /// Create an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `email` has an entry and return its name set
    pub fn ensure(&mut self, email: &str) -> &mut BTreeSet<String> {
        self.entries.entry(email.to_string()).or_default()
    }

    /// Record one match. The email is kept even when the match has no name.
    pub fn record(&mut self, matched: NameEmailMatch) {
        let names = self.ensure(&matched.email);
        if let Some(name) = matched.name {
            names.insert(name);
        }
    }

    /// Names recorded for an exact email string
    #[must_use]
    pub fn get(&self, email: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(email)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for EmailNames {
    type Item = (String, BTreeSet<String>);
    type IntoIter = std::collections::btree_map::IntoIter<String, BTreeSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Parse every raw header string into the email to names mapping
///
/// A string without any address is logged, counted in `report`, and skipped.
pub fn collect_contacts<I, S>(fields: I, report: &mut RunReport) -> EmailNames
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut email_names = EmailNames::new();

    for field in fields {
        let field = field.as_ref();
        let matches = match_field(field);

        if matches.is_empty() {
            report.warn(
                Skip::NoEmail,
                format_args!("Skipping - No email(s) found in field: {field}"),
            );
            continue;
        }

        for matched in matches {
            email_names.record(matched);
        }
    }

    debug!("Collected {} distinct emails", email_names.len());
    email_names
}
