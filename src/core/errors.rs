use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiDiffError {
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    #[error("Missing <{element}> element under <{parent}>")]
    MissingElement { parent: String, element: String },

    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute { element: String, attribute: String },

    #[error("Unknown diff type `{value}` on type `{type_name}`")]
    UnknownDiffType { type_name: String, value: String },

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiDiffError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiDiffError::XmlError(_)
            | ApiDiffError::MissingElement { .. }
            | ApiDiffError::MissingAttribute { .. } => 2,
            ApiDiffError::UnknownDiffType { .. } => 3,
            ApiDiffError::UnknownFormat(_)
            | ApiDiffError::ConfigError(_)
            | ApiDiffError::IoError(_) => 4,
        }
    }
}

impl From<quick_xml::Error> for ApiDiffError {
    fn from(err: quick_xml::Error) -> Self {
        ApiDiffError::XmlError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let abort = ApiDiffError::UnknownDiffType {
            type_name: "Foo".to_string(),
            value: "Renamed".to_string(),
        };
        assert_eq!(abort.exit_code(), 3);
        assert_eq!(ApiDiffError::XmlError("eof".to_string()).exit_code(), 2);
        assert_eq!(ApiDiffError::UnknownFormat("pdf".to_string()).exit_code(), 4);
    }

    #[test]
    fn test_display_names_offending_value() {
        let err = ApiDiffError::UnknownDiffType {
            type_name: "Game.Player".to_string(),
            value: "Renamed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown diff type `Renamed` on type `Game.Player`"
        );
    }
}
