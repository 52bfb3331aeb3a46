use crate::target::CodeRangeTask;
use serde::Deserialize;
use std::fmt;

/// The on-disk task list: a bare JSON array of code-range tasks, as emitted
/// by upstream tooling.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(transparent)]
pub struct TaskList {
    pub tasks: Vec<CodeRangeTask>,
}

impl TaskList {
    /// Structural validation beyond what deserialization enforces. An empty
    /// list is valid; "nothing to analyze" is not an error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        for (index, task) in self.tasks.iter().enumerate() {
            for (field, value) in [
                ("beginLine", task.begin_line),
                ("beginCol", task.begin_col),
                ("endLine", task.end_line),
                ("endCol", task.end_col),
            ] {
                if value == 0 {
                    issues.push(ValidationIssue::NonPositiveCoordinate {
                        index,
                        name: task.name.clone(),
                        field,
                    });
                }
            }

            let begin = (task.begin_line, task.begin_col);
            let end = (task.end_line, task.end_col);
            if begin > end {
                issues.push(ValidationIssue::ReversedInterval {
                    index,
                    name: task.name.clone(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    NonPositiveCoordinate {
        index: usize,
        name: String,
        field: &'static str,
    },
    ReversedInterval {
        index: usize,
        name: String,
    },
}

impl ValidationIssue {
    fn label(index: usize, name: &str) -> String {
        if name.is_empty() {
            format!("#{index}")
        } else {
            format!("'{name}'")
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NonPositiveCoordinate { index, name, field } => {
                write!(
                    f,
                    "task {} has non-positive '{field}' (lines and columns are 1-based)",
                    Self::label(*index, name)
                )
            }
            ValidationIssue::ReversedInterval { index, name } => {
                write!(
                    f,
                    "task {} has a reversed interval: begin is after end",
                    Self::label(*index, name)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(bl: u32, bc: u32, el: u32, ec: u32) -> CodeRangeTask {
        CodeRangeTask {
            name: String::new(),
            begin_line: bl,
            begin_col: bc,
            end_line: el,
            end_col: ec,
            extra_info: serde_json::Value::Null,
        }
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(TaskList::default().validate().is_ok());
    }

    #[test]
    fn zero_coordinates_are_rejected() {
        let list = TaskList {
            tasks: vec![task(0, 1, 1, 1)],
        };
        let err = list.validate().unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert!(err.to_string().contains("beginLine"));
    }

    #[test]
    fn reversed_interval_is_rejected() {
        let list = TaskList {
            tasks: vec![task(3, 5, 2, 9)],
        };
        let err = list.validate().unwrap_err();
        assert!(err.to_string().contains("reversed"));
    }

    #[test]
    fn one_task_can_carry_several_issues() {
        let list = TaskList {
            tasks: vec![task(2, 0, 1, 0)],
        };
        let err = list.validate().unwrap_err();
        assert_eq!(err.issues.len(), 3);
    }
}
