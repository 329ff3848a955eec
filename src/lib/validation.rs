//! Input validation utilities
//!
//! This module provides common validation functions for command-line parameters,
//! configuration values and file paths with consistent error messages.
//!
//! All validation functions use structured error types from [`crate::errors`] to provide
//! rich contextual information when validation fails.

use crate::errors::{ConcordError, Result};
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Call set", "Reference")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use fgconcord_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/calls.vcf", "Call set");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(ConcordError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that multiple files exist
///
/// # Errors
/// Returns an error for the first file that doesn't exist
///
/// # Example
/// ```no_run
/// use fgconcord_lib::validation::validate_files_exist;
/// use std::path::PathBuf;
///
/// let files = vec![
///     (PathBuf::from("x.vcf"), "Call set"),
///     (PathBuf::from("ref.fa"), "Reference"),
/// ];
/// validate_files_exist(&files).unwrap();
/// ```
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Validate that a name can be embedded in an output file name.
///
/// Sample and call-set names become part of output paths, so they must be non-empty and
/// free of path separators.
///
/// # Errors
/// Returns an error if the name is empty, `.`/`..`, or contains a path separator
///
/// # Example
/// ```
/// use fgconcord_lib::validation::validate_name;
///
/// validate_name("callerX", "call set name").unwrap();
/// assert!(validate_name("a/b", "call set name").is_err());
/// ```
pub fn validate_name(name: &str, parameter: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty".to_string())
    } else if name == "." || name == ".." {
        Some(format!("'{name}' is not a usable file name component"))
    } else if name.contains(['/', '\\']) {
        Some(format!("'{name}' must not contain a path separator"))
    } else {
        None
    };

    match reason {
        Some(reason) => {
            Err(ConcordError::InvalidParameter { parameter: parameter.to_string(), reason })
        }
        None => Ok(()),
    }
}

/// Validate that a directory exists or can be created
///
/// # Errors
/// Returns an error if the path exists and is not a directory, or creation fails
pub fn ensure_output_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path_ref = path.as_ref();
    if path_ref.exists() && !path_ref.is_dir() {
        return Err(ConcordError::InvalidParameter {
            parameter: "output".to_string(),
            reason: format!("'{}' exists and is not a directory", path_ref.display()),
        });
    }
    std::fs::create_dir_all(path_ref).map_err(|e| ConcordError::InvalidParameter {
        parameter: "output".to_string(),
        reason: format!("cannot create '{}': {e}", path_ref.display()),
    })
}
