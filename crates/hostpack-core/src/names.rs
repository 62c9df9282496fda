use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("{kind} name must not be empty")]
    Empty { kind: &'static str },
    #[error("{kind} name '{name}' is longer than {max} characters")]
    TooLong {
        kind: &'static str,
        name: String,
        max: usize,
    },
    #[error("{kind} name '{name}' contains invalid character '{ch}'")]
    InvalidCharacter {
        kind: &'static str,
        name: String,
        ch: char,
    },
    #[error("{kind} name '{name}' is reserved")]
    Reserved { kind: &'static str, name: String },
}

const MAX_NAME_LEN: usize = 128;

/// Package names double as directory names under the repos and store roots.
pub fn validate_package_name(name: &str) -> Result<(), NameError> {
    validate_path_segment("package", name)
}

/// User names are joined into `/home/<user>/.profile`, so they must stay a
/// single path segment.
pub fn validate_user_name(name: &str) -> Result<(), NameError> {
    validate_path_segment("user", name)
}

fn validate_path_segment(kind: &'static str, name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty { kind });
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong {
            kind,
            name: name.to_string(),
            max: MAX_NAME_LEN,
        });
    }
    if name == "." || name == ".." {
        return Err(NameError::Reserved {
            kind,
            name: name.to_string(),
        });
    }
    if let Some(ch) = name
        .chars()
        .find(|ch| *ch == '/' || *ch == '\\' || *ch == '\0' || ch.is_whitespace())
    {
        return Err(NameError::InvalidCharacter {
            kind,
            name: name.to_string(),
            ch,
        });
    }
    Ok(())
}
