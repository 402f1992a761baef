//! `From`/`To` header extraction from mbox files using the mail-parser crate
//!
//! Header values are taken raw (no RFC 2047 decoding) so the address
//! matcher sees exactly what the message carried.

use crate::error::{ContactsError, Result};
use crate::report::{RunReport, Skip};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace};
use mail_parser::mailbox::mbox::MessageIterator;
use mail_parser::{HeaderName, Message, MessageParser};
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

/// Line folding inside a header value
static FOLDING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]+").expect("Invalid FOLDING_REGEX pattern"));

const GMAIL_LABELS_HEADER: &str = "X-Gmail-Labels";

/// Extracts raw `From` and `To` header strings from a mailbox
pub struct MboxExtractor {
    /// Extract `From` headers
    include_from: bool,
    /// Extract `To` headers
    include_to: bool,
    /// Message counter shown while reading
    progress: ProgressBar,
}

impl Default for MboxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MboxExtractor {
    /// Create an extractor for both `From` and `To` headers
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_from: true,
            include_to: true,
            progress: ProgressBar::hidden(),
        }
    }

    /// Whether to extract `From` headers
    #[must_use]
    pub const fn with_from(mut self, include: bool) -> Self {
        self.include_from = include;
        self
    }

    /// Whether to extract `To` headers
    #[must_use]
    pub const fn with_to(mut self, include: bool) -> Self {
        self.include_to = include;
        self
    }

    /// Show a spinner with the number of messages read
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.progress = if show {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} messages {msg}")
            {
                spinner.set_style(style);
            }
            spinner
        } else {
            ProgressBar::hidden()
        };
        self
    }

    /// Header kinds requested, as used in the fields dump file name
    #[must_use]
    pub fn field_types(&self) -> Vec<&'static str> {
        let mut types = Vec::new();
        if self.include_from {
            types.push("From");
        }
        if self.include_to {
            types.push("To");
        }
        if types.is_empty() {
            types.push("No");
        }
        types
    }

    /// Extract header strings from an mbox file, in message order
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the mailbox cannot be read.
    pub fn extract_fields(&self, mbox_path: &Path, report: &mut RunReport) -> Result<Vec<String>> {
        debug!("Opening mbox file: {}", mbox_path.display());

        let file = File::open(mbox_path)?;
        self.extract_fields_from_reader(file, &mbox_path.display().to_string(), report)
    }

    /// Extract header strings from any mbox-formatted reader
    ///
    /// `label` names the source in the summary log line.
    ///
    /// # Errors
    /// Returns an error if the mailbox cannot be read.
    pub fn extract_fields_from_reader<R: Read>(
        &self,
        reader: R,
        label: &str,
        report: &mut RunReport,
    ) -> Result<Vec<String>> {
        let mut fields = Vec::new();
        let parser = MessageParser::default();
        let mut message_count: u64 = 0;

        for raw_message in MessageIterator::new(BufReader::new(reader)) {
            let raw_message = raw_message.map_err(|e| {
                self.progress.abandon();
                ContactsError::Mbox(format!("Failed to read message from '{label}': {e:?}"))
            })?;

            message_count += 1;
            self.progress.inc(1);

            let message = parser.parse(raw_message.contents());
            let headers = MessageHeaders::new(message.as_ref());
            trace!("Message {message_count}: {headers}");

            if self.include_from {
                Self::push_header(&mut fields, headers.from.as_deref(), "From", &headers, report);
            }

            if self.include_to {
                Self::push_header(&mut fields, headers.to.as_deref(), "To", &headers, report);
            }
        }

        self.progress.finish_and_clear();

        report.messages_read += message_count;
        report.fields_extracted += fields.len() as u64;
        info!("entries in '{label}': {message_count}");

        Ok(fields)
    }

    fn push_header(
        fields: &mut Vec<String>,
        value: Option<&str>,
        header: &str,
        headers: &MessageHeaders,
        report: &mut RunReport,
    ) {
        match value {
            Some(value) => fields.push(value.to_string()),
            None => report.warn(
                Skip::EmptyHeader,
                format_args!("skipping mbox message - empty '{header}:': {headers}"),
            ),
        }
    }
}

/// The headers of one message that matter for extraction and diagnostics
#[derive(Debug, Default)]
struct MessageHeaders {
    labels: Option<String>,
    date: Option<String>,
    from: Option<String>,
    to: Option<String>,
    subject: Option<String>,
}

impl MessageHeaders {
    fn new(message: Option<&Message<'_>>) -> Self {
        let Some(message) = message else {
            return Self::default();
        };

        Self {
            labels: header_value(
                message,
                HeaderName::Other(Cow::Borrowed(GMAIL_LABELS_HEADER)),
            ),
            date: header_value(message, HeaderName::Date),
            from: header_value(message, HeaderName::From),
            to: header_value(message, HeaderName::To),
            subject: header_value(message, HeaderName::Subject),
        }
    }
}

impl fmt::Display for MessageHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: &Option<String>| value.as_deref().unwrap_or("None").to_string();
        write!(
            f,
            "{GMAIL_LABELS_HEADER}: {}, Date: {}, From: {}, To: {}, Subject: {}.",
            show(&self.labels),
            show(&self.date),
            show(&self.from),
            show(&self.to),
            show(&self.subject)
        )
    }
}

/// Raw header text, unfolded and trimmed. Empty values count as absent.
fn header_value<'x>(message: &Message<'x>, name: HeaderName<'x>) -> Option<String> {
    let raw = message.header_raw(name)?;
    let value = unfold(raw);
    (!value.is_empty()).then_some(value)
}

fn unfold(raw: &str) -> String {
    FOLDING_REGEX.replace_all(raw, " ").trim().to_string()
}
