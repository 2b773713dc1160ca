use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    EmptyPath,
    /// Store props must be a mapping at the top level.
    NotAMapping,
    /// An intermediate segment of `path` holds a scalar or sequence. `parent` is the dotted
    /// prefix that was hit (empty for the root).
    ParentNotMapping { path: String, parent: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::EmptyPath => write!(f, "model path is empty"),
            StoreError::NotAMapping => write!(f, "store props must be a mapping"),
            StoreError::ParentNotMapping { path, parent } if parent.is_empty() => {
                write!(f, "cannot set \"{path}\": the root is not a mapping")
            }
            StoreError::ParentNotMapping { path, parent } => {
                write!(f, "cannot set \"{path}\": \"{parent}\" is not a mapping")
            }
        }
    }
}

impl std::error::Error for StoreError {}
