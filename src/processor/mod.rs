//! Pipeline orchestration: extract, parse, sort, write

use crate::config::{Config, InputKind};
use crate::contacts::{collect_contacts, sort_contacts, ContactRecord};
use crate::error::Result;
use crate::output::{read_fields, write_contacts, write_emails, write_fields, write_vcards};
use crate::report::{RunReport, Skip};
use log::{debug, info};
use std::path::Path;

/// Runs one extraction from input file to output files
pub struct Processor {
    config: Config,
    input_kind: InputKind,
}

impl Processor {
    /// Create a new processor, validating every path first
    ///
    /// # Errors
    /// Returns a configuration error if the input or an output path is unusable.
    pub fn new(config: Config) -> Result<Self> {
        let input_kind = config.validate()?;

        debug!(
            "Processor initialized. Input: {:?}, merge case variants: {}",
            input_kind, config.merge_case_variants
        );

        Ok(Self { config, input_kind })
    }

    /// Run the whole pipeline, returning the sorted contacts
    ///
    /// Soft failures are counted in `report`. A malformed email aborts the
    /// run before any contacts file is written.
    ///
    /// # Errors
    /// Returns an error if reading the input, sorting, or writing an output fails.
    pub fn process(&self, report: &mut RunReport) -> Result<Vec<ContactRecord>> {
        let fields = match self.input_kind {
            InputKind::Mbox => {
                if self.config.omits_all_fields() {
                    report.warn(
                        Skip::NothingRequested,
                        "'From' and 'To' fields have both been omitted from the results.",
                    );
                    return Ok(Vec::new());
                }

                let extractor = self.config.extractor().with_progress(self.config.show_progress);
                let fields = extractor.extract_fields(&self.config.input_path, report)?;
                if let Some(dump_path) = self.config.fields_dump_path() {
                    write_fields(&fields, &dump_path)?;
                    info!("mbox fields written to '{}'", absolute(&dump_path));
                }
                fields
            }
            InputKind::Json => {
                let fields = read_fields(&self.config.input_path)?;
                report.fields_extracted += fields.len() as u64;
                fields
            }
        };

        let email_names = collect_contacts(&fields, report);
        let contacts = sort_contacts(email_names, self.config.merge_case_variants)?;

        self.write_outputs(&contacts, report)?;
        Ok(contacts)
    }

    /// Write the contacts JSON, the emails-only JSON and the vCards
    fn write_outputs(&self, contacts: &[ContactRecord], report: &mut RunReport) -> Result<()> {
        let paths = self.config.output_paths();

        write_contacts(contacts, &paths.contacts)?;
        info!(
            "contact email addresses with their names written to '{}'",
            absolute(&paths.contacts)
        );

        write_emails(contacts, &paths.emails_only)?;
        info!(
            "contact email addresses written to '{}'",
            absolute(&paths.emails_only)
        );

        let cards = write_vcards(contacts, &paths.vcard)?;
        info!("{cards} contact vCards written to '{}'", absolute(&paths.vcard));

        report.contacts_written = contacts.len() as u64;
        Ok(())
    }
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ContactsError, InvalidEmail};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    const MBOX: &str = "From 1@xxx Mon Jan 01 00:00:00 +0000 2024\n\
From: \"Zed Zulu\" <zzz@mail.google.com>\n\
To: Ann <aaa@example.com>, <bob@example.com>\n\
Subject: One\n\
\n\
Hello\n\
\n\
From 2@xxx Mon Jan 01 00:00:01 +0000 2024\n\
From: Ann Smith <AAA@example.com>\n\
To: undisclosed-recipients:;\n\
Subject: Two\n\
\n\
Hi\n";

    fn mbox_config(dir: &TempDir) -> Config {
        let input = dir.path().join("mail.mbox");
        std::fs::write(&input, MBOX).unwrap();
        Config {
            input_path: input,
            output_path: dir.path().join("out").join("contacts.json"),
            show_progress: false,
            ..Default::default()
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_processor_creation() {
        let dir = tempdir().unwrap();
        assert!(Processor::new(mbox_config(&dir)).is_ok());

        let missing = Config {
            input_path: dir.path().join("missing.mbox"),
            ..mbox_config(&dir)
        };
        assert!(matches!(
            Processor::new(missing),
            Err(ContactsError::Config(_))
        ));
    }

    #[test]
    fn test_process_mbox() {
        let dir = tempdir().unwrap();
        let config = mbox_config(&dir);
        let paths = config.output_paths();
        let mut report = RunReport::new();

        let contacts = Processor::new(config).unwrap().process(&mut report).unwrap();

        let emails: Vec<&str> = contacts.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(
            emails,
            [
                "AAA@example.com",
                "aaa@example.com",
                "bob@example.com",
                "zzz@mail.google.com"
            ]
        );
        assert_eq!(
            contacts[0].names.iter().collect::<Vec<_>>(),
            ["Ann Smith"]
        );
        assert_eq!(contacts[1].names.iter().collect::<Vec<_>>(), ["Ann"]);
        assert!(contacts[2].names.is_empty());

        assert_eq!(report.messages_read, 2);
        assert_eq!(report.fields_extracted, 4);
        assert_eq!(report.fields_skipped, 1);
        assert_eq!(report.contacts_written, 4);

        let written: Vec<ContactRecord> = serde_json::from_str(&read(&paths.contacts)).unwrap();
        assert_eq!(written, contacts);
        let emails_only: Vec<String> = serde_json::from_str(&read(&paths.emails_only)).unwrap();
        assert_eq!(emails_only, emails);
        let vcards = read(&paths.vcard);
        assert_eq!(vcards.matches("BEGIN:VCARD").count(), 4);
        assert!(vcards.contains("FN:Zed Zulu\r\n"));
        assert!(vcards.contains("EMAIL:bob@example.com\r\nFN:No name\r\n"));
    }

    #[test]
    fn test_merge_case_variants() {
        let dir = tempdir().unwrap();
        let config = Config {
            merge_case_variants: true,
            ..mbox_config(&dir)
        };

        let contacts = Processor::new(config)
            .unwrap()
            .process(&mut RunReport::new())
            .unwrap();

        assert_eq!(contacts[0].email, "aaa@example.com");
        assert_eq!(
            contacts[0].names.iter().collect::<Vec<_>>(),
            ["Ann", "Ann Smith"]
        );
        assert_eq!(contacts.len(), 3);
    }

    #[test]
    fn test_dump_target_checked_before_reading() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("mail - From To fields.json")).unwrap();
        let config = Config {
            dump_fields: true,
            ..mbox_config(&dir)
        };
        let paths = config.output_paths();

        assert!(matches!(
            Processor::new(config),
            Err(ContactsError::Config(_))
        ));
        assert!(!paths.contacts.exists());
    }

    #[test]
    fn test_dumped_fields_round_trip() {
        let dir = tempdir().unwrap();
        let config = Config {
            dump_fields: true,
            ..mbox_config(&dir)
        };
        let direct = Processor::new(config)
            .unwrap()
            .process(&mut RunReport::new())
            .unwrap();

        let dump = dir.path().join("mail - From To fields.json");
        assert!(dump.exists());

        let from_json = Config {
            input_path: dump,
            output_path: dir.path().join("again").join("contacts.json"),
            ..Default::default()
        };
        let mut report = RunReport::new();
        let reparsed = Processor::new(from_json)
            .unwrap()
            .process(&mut report)
            .unwrap();

        assert_eq!(reparsed, direct);
        assert_eq!(report.fields_extracted, 4);
    }

    #[test]
    fn test_runs_are_idempotent() {
        let dir = tempdir().unwrap();
        let config = mbox_config(&dir);
        let paths = config.output_paths();

        Processor::new(config.clone())
            .unwrap()
            .process(&mut RunReport::new())
            .unwrap();
        let first: Vec<String> = paths.all().iter().map(|p| read(p)).collect();

        Processor::new(config)
            .unwrap()
            .process(&mut RunReport::new())
            .unwrap();
        let second: Vec<String> = paths.all().iter().map(|p| read(p)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_omitting_everything_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = Config {
            omit_from: true,
            omit_to: true,
            dump_fields: true,
            ..mbox_config(&dir)
        };
        let paths = config.output_paths();
        let mut report = RunReport::new();

        let contacts = Processor::new(config).unwrap().process(&mut report).unwrap();

        assert!(contacts.is_empty());
        assert_eq!(report.other_warnings, 1);
        assert_eq!(report.messages_read, 0);
        assert!(!paths.contacts.exists());
        assert!(!dir.path().join("mail - No fields.json").exists());
    }

    #[test]
    fn test_ambiguous_email_aborts_without_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("fields.json");
        std::fs::write(
            &input,
            r#"["Ann <aaa@example.com>", "Odd <\"a@b c@d\"@e.com>"]"#,
        )
        .unwrap();
        let output_path: PathBuf = dir.path().join("contacts.json");
        let config = Config {
            input_path: input,
            output_path: output_path.clone(),
            ..Default::default()
        };

        let err = Processor::new(config)
            .unwrap()
            .process(&mut RunReport::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ContactsError::Validation(InvalidEmail::AmbiguousAt(ref email)) if email == "\"a@b c@d\"@e.com"
        ));
        assert!(!output_path.exists());
    }
}
