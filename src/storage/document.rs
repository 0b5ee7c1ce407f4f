use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{Catalogue, CatalogueError, Procedure};

/// Errors that can occur when loading a catalogue document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read catalogue file")]
    Io(#[from] io::Error),

    /// The TOML is malformed or does not describe procedures.
    #[error("failed to parse catalogue file")]
    Toml(#[from] toml::de::Error),

    /// The procedures do not form a valid catalogue.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

/// The serialized versions of a catalogue document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Document {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        procedures: Vec<Procedure>,
    },
}

/// Parses a catalogue from TOML text.
///
/// # Errors
///
/// Returns [`LoadError::Toml`] if the text is not a valid document, or
/// [`LoadError::Catalogue`] if two procedures share an identifier.
pub fn parse(text: &str) -> Result<Catalogue, LoadError> {
    let Document::V1 { procedures } = toml::from_str(text)?;
    Ok(Catalogue::new(procedures)?)
}

/// Loads a catalogue from a TOML file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, otherwise as
/// [`parse`].
#[instrument]
pub fn load(path: &Path) -> Result<Catalogue, LoadError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Renders a catalogue as a TOML document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_toml(catalogue: &Catalogue) -> Result<String, toml::ser::Error> {
    let document = Document::V1 {
        procedures: catalogue.iter().cloned().collect(),
    };
    toml::to_string_pretty(&document)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{catalogue, Category, IntegrityIssue, Step};

    const DOCUMENT: &str = r#"
_version = "1"

[[procedures]]
id = "C1"
title = "Loss of C2 Link"
short_title = "Lost Link"
category = "contingency"
description = "The command and control link is lost."

[[procedures.actions]]
role = "remote_pilot"
steps = ["Call Out: \"Lost link\"", "Check antennas"]

[[procedures.conditionals]]
condition = "Aircraft does not return"
action = "Treat as a fly-away."
reference_id = "E1"

[[procedures]]
id = "E1"
title = "Fly-Away"
short_title = "Fly-Away"
category = "emergency"
"#;

    #[test]
    fn parses_document() {
        let catalogue = parse(DOCUMENT).unwrap();

        assert_eq!(catalogue.len(), 2);
        let lost_link = catalogue.get("C1").unwrap();
        assert_eq!(lost_link.category(), Category::Contingency);
        assert_eq!(
            lost_link.actions()[0].steps,
            vec![
                Step::CallOut("\"Lost link\"".to_string()),
                Step::Plain("Check antennas".to_string()),
            ]
        );
        assert_eq!(lost_link.conditionals()[0].reference_id().unwrap(), "E1");
        assert!(catalogue.check_integrity().is_empty());
    }

    #[test]
    fn dangling_references_load_and_are_reported() {
        let text = DOCUMENT.replace("reference_id = \"E1\"", "reference_id = \"E7\"");
        let catalogue = parse(&text).unwrap();

        assert!(matches!(
            catalogue.check_integrity().as_slice(),
            [IntegrityIssue::DanglingReference { .. }]
        ));
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let text = DOCUMENT.replace("id = \"E1\"", "id = \"C1\"");
        let err = parse(&text).unwrap_err();

        assert!(matches!(err, LoadError::Catalogue(_)));
    }

    #[test]
    fn malformed_identifiers_are_rejected() {
        let text = DOCUMENT.replace("id = \"E1\"", "id = \"E 1\"");
        let err = parse(&text).unwrap_err();

        assert!(matches!(err, LoadError::Toml(_)));
    }

    #[test]
    fn missing_version_is_rejected() {
        let text = DOCUMENT.replace("_version = \"1\"", "");
        assert!(matches!(parse(&text).unwrap_err(), LoadError::Toml(_)));
    }

    #[test]
    fn load_missing_file_returns_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load(&tmp.path().join("missing.toml")).unwrap_err();

        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn builtin_catalogue_survives_export() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(to_toml(catalogue()).unwrap().as_bytes())
            .unwrap();

        let reloaded = load(file.path()).unwrap();

        let original: Vec<_> = catalogue().iter().collect();
        let reloaded: Vec<_> = reloaded.iter().collect();
        assert_eq!(original, reloaded);
    }
}
