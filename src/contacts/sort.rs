//! Sort-key derivation and deterministic ordering of contacts

use super::{ContactRecord, EmailNames};
use crate::address::salvage_address;
use crate::error::InvalidEmail;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Separator between domain labels
static NON_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("Invalid NON_WORD_REGEX pattern"));

/// Ordering key: reversed domain labels followed by the lower-cased email
///
/// Compared component by component, so `com, example, ...` sorts before
/// `com, google, mail, ...`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(Vec<String>);

impl SortKey {
    /// Normalized email
    #[must_use]
    pub fn email(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }
}

/// Trim an email and reduce it to a single address, keeping its case
///
/// # Errors
/// Fails when there is no `@`, when several `@` leave no single address
/// to extract, or when nothing follows the `@`.
pub fn canonical_address(raw: &str) -> Result<String, InvalidEmail> {
    let email = raw.trim();

    let email = match email.matches('@').count() {
        0 => return Err(InvalidEmail::MissingAt(email.to_string())),
        1 => email,
        _ => salvage_address(email).ok_or_else(|| InvalidEmail::AmbiguousAt(email.to_string()))?,
    };

    let domain = email.split_once('@').map_or("", |(_, domain)| domain);
    if domain.is_empty() {
        return Err(InvalidEmail::MissingDomain(email.to_string()));
    }

    Ok(email.to_string())
}

/// Derive the ordering key for an email
///
/// # Errors
/// See [`canonical_address`].
pub fn derive_sort_key(email: &str) -> Result<SortKey, InvalidEmail> {
    let email = canonical_address(email)?.to_lowercase();
    let domain = email.split_once('@').map_or("", |(_, domain)| domain);

    let mut components: Vec<String> = NON_WORD_REGEX
        .split(domain)
        .map(str::to_string)
        .collect();
    components.reverse();
    components.push(email);

    Ok(SortKey(components))
}

/// Turn the accumulated mapping into an ordered list of contacts
///
/// Every raw email stays a separate record with its case preserved. Records
/// sharing a sort key are ordered by their email. With `merge_case_variants`
/// emails that normalize to the same address become one record, emitted
/// lower-cased, with the names of all variants.
///
/// # Errors
/// Any email without a valid sort key aborts the whole sort.
pub fn sort_contacts(
    email_names: EmailNames,
    merge_case_variants: bool,
) -> Result<Vec<ContactRecord>, InvalidEmail> {
    if merge_case_variants {
        let mut merged: BTreeMap<SortKey, BTreeSet<String>> = BTreeMap::new();
        for (raw, names) in email_names {
            let key = derive_sort_key(&raw)?;
            merged.entry(key).or_default().extend(names);
        }

        return Ok(merged
            .into_iter()
            .map(|(key, names)| ContactRecord {
                email: key.email().to_string(),
                names,
            })
            .collect());
    }

    let mut keyed = email_names
        .into_iter()
        .map(|(raw, names)| {
            let email = canonical_address(&raw)?;
            let key = derive_sort_key(&email)?;
            Ok((key, ContactRecord { email, names }))
        })
        .collect::<Result<Vec<_>, InvalidEmail>>()?;

    keyed.sort_by(|(a_key, a), (b_key, b)| a_key.cmp(b_key).then_with(|| a.email.cmp(&b.email)));
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}
