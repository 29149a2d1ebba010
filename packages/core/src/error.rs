//! Error types for feature registration and lookup.
//!
//! There are exactly two kinds of failure: a configuration error raised while
//! building a [`Registrar`](crate::Registrar), and a lookup error raised by
//! [`getfeature`](crate::getfeature) when a name is absent.

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A type passed to `addfeatures` is not a usable feature type.
    Config,
    /// A requested feature does not exist on an object.
    Lookup,
}

/// Errors raised by the feature mechanism.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The class is not a Feature subtype.
    #[error("{class} is not a Feature subclass")]
    NotAFeature { class: String },

    /// The class is a Feature subtype but declares an empty name.
    #[error("feature class {class} declares no name")]
    MissingName { class: String },

    /// The object carries no feature under this name.
    #[error("'{object}' object has no feature '{name}'")]
    NoSuchFeature { object: String, name: String },

    /// The feature exists but is not of the requested concrete type.
    #[error("feature '{name}' on '{object}' is not a {expected}")]
    WrongFeatureType {
        object: String,
        name: String,
        expected: &'static str,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotAFeature { .. } | Error::MissingName { .. } => ErrorKind::Config,
            Error::NoSuchFeature { .. } | Error::WrongFeatureType { .. } => ErrorKind::Lookup,
        }
    }

    /// True for errors raised while building a registrar.
    pub fn is_config(&self) -> bool {
        self.kind() == ErrorKind::Config
    }

    /// True for errors raised by a failed lookup.
    pub fn is_lookup(&self) -> bool {
        self.kind() == ErrorKind::Lookup
    }

    pub(crate) fn no_such_feature(object: &str, name: &str) -> Self {
        Error::NoSuchFeature {
            object: object.to_string(),
            name: name.to_string(),
        }
    }
}

/// Result type alias for feature operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_feature_display() {
        let e = Error::NotAFeature {
            class: "Dummy".to_string(),
        };
        assert_eq!(format!("{}", e), "Dummy is not a Feature subclass");
        assert!(e.is_config());
        assert!(!e.is_lookup());
    }

    #[test]
    fn missing_name_is_config() {
        let e = Error::MissingName {
            class: "Anonymous".to_string(),
        };
        assert_eq!(e.kind(), ErrorKind::Config);
        assert!(format!("{}", e).contains("Anonymous"));
    }

    #[test]
    fn no_such_feature_display() {
        let e = Error::no_such_feature("Dummy", "dummy");
        assert_eq!(format!("{}", e), "'Dummy' object has no feature 'dummy'");
        assert!(e.is_lookup());
    }

    #[test]
    fn wrong_feature_type_is_lookup() {
        let e = Error::WrongFeatureType {
            object: "Dummy".to_string(),
            name: "dummy".to_string(),
            expected: "Other",
        };
        assert_eq!(e.kind(), ErrorKind::Lookup);
        let display = format!("{}", e);
        assert!(display.contains("dummy"));
        assert!(display.contains("Other"));
    }
}
