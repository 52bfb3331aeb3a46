use crate::tasks::schema::{TaskList, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum TaskError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl TaskError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            TaskError::Io { .. } => self,
            TaskError::Json { path: None, source } => TaskError::Json {
                path: Some(path),
                source,
            },
            TaskError::Validation { path: None, source } => TaskError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Io { path, source } => {
                write!(
                    f,
                    "failed to read task list from {}: {}",
                    path.display(),
                    source
                )
            }
            TaskError::Json { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse task list JSON ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse task list JSON: {}", source),
            },
            TaskError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid task list ({}): {}", path.display(), source),
                None => write!(f, "invalid task list: {}", source),
            },
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Io { source, .. } => Some(source),
            TaskError::Json { source, .. } => Some(source),
            TaskError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<TaskList, TaskError> {
    let list: TaskList =
        serde_json::from_str(input).map_err(|source| TaskError::Json { path: None, source })?;
    list.validate()
        .map_err(|source| TaskError::Validation { path: None, source })?;
    Ok(list)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<TaskList, TaskError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| TaskError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}
