use crate::query::ErrorList;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    ConfigParse(String),
    IoError(std::io::Error),
    InvalidData(String),
    /// The content index answered a query with errors.
    ContentQuery {
        collection: String,
        errors: ErrorList,
    },
    /// A document that needs a route has no usable `slug`.
    MissingSlug { file_path: PathBuf },
    /// A slug contains characters that cannot appear in a URL path.
    InvalidSlug { file_path: PathBuf, slug: String },
    /// Two routes resolve to the same URL path. `first` and `second`
    /// describe where each route came from.
    DuplicateRoute {
        url_path: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigParse(msg) => write!(f, "Configuration parse error: {}", msg),
            Error::IoError(err) => write!(f, "IO error: {}", err),
            Error::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            Error::ContentQuery { collection, errors } => write!(
                f,
                "There was an error loading the '{}' collection:\n{}",
                collection, errors
            ),
            Error::MissingSlug { file_path } => write!(
                f,
                "Missing slug: '{}' has no 'slug' in its front matter, or it is empty",
                file_path.display()
            ),
            Error::InvalidSlug { file_path, slug } => write!(
                f,
                "Invalid slug '{}' in '{}': only ASCII letters, digits and -_./~ are allowed",
                slug,
                file_path.display()
            ),
            Error::DuplicateRoute {
                url_path,
                first,
                second,
            } => write!(
                f,
                "Duplicate route '{}': produced by both {} and {}",
                url_path, first, second
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::ConfigParse(format!("Invalid collection pattern: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
