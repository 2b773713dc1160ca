use crate::scope::ControllerId;
use html::DomError;
use std::fmt;
use value_store::StoreError;

/// Failure to work out which model path an element is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No binding attribute on the element and no qualifying wildcard form.
    MissingModel { element: String, attribute: String },
    /// The model attribute could not be parsed (unbalanced parentheses, empty action).
    MalformedDirective { attribute: String, value: String },
    /// `data-model="name(arg)"`: models take no arguments.
    ArgumentsNotSupported { attribute: String, value: String },
    UnknownModifier { name: String, directive: String },
    InvalidModifierValue { name: String, value: Option<String> },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::MissingModel { element, attribute } => write!(
                f,
                "Cannot determine the model name for \"{element}\": the element must either have a \"{attribute}\" attribute or a \"name\" attribute living inside a <form {attribute}=\"*\">."
            ),
            ResolutionError::MalformedDirective { attribute, value } => {
                write!(f, "The {attribute}=\"{value}\" format is invalid.")
            }
            ResolutionError::ArgumentsNotSupported { attribute, value } => write!(
                f,
                "The {attribute}=\"{value}\" format is invalid: it does not support passing arguments to the model."
            ),
            ResolutionError::UnknownModifier { name, directive } => {
                write!(f, "Unknown modifier \"{name}\" in \"{directive}\".")
            }
            ResolutionError::InvalidModifierValue { name, value } => match value {
                Some(value) => write!(f, "Invalid value \"{value}\" for modifier \"{name}\"."),
                None => write!(f, "The \"{name}\" modifier requires a value."),
            },
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Failure while moving values between elements and their component's store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    Resolution(ResolutionError),
    Store(StoreError),
    Dom(DomError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Resolution(err) => err.fmt(f),
            SyncError::Store(err) => err.fmt(f),
            SyncError::Dom(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Resolution(err) => Some(err),
            SyncError::Store(err) => Some(err),
            SyncError::Dom(err) => Some(err),
        }
    }
}

impl From<ResolutionError> for SyncError {
    fn from(err: ResolutionError) -> Self {
        SyncError::Resolution(err)
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        SyncError::Store(err)
    }
}

impl From<DomError> for SyncError {
    fn from(err: DomError) -> Self {
        SyncError::Dom(err)
    }
}

/// Failure while maintaining the controller registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    UnknownController(ControllerId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownController(id) => write!(f, "unknown controller {id:?}"),
        }
    }
}

impl std::error::Error for RegistryError {}
