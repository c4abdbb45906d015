use std::path::PathBuf;

/// Application-level error carried to the binary boundary.
///
/// `exit_code` follows the same convention everywhere:
/// - 2: input/user problem (missing file, missing columns, bad flag value)
/// - 3: scenario input outside the domain of the log transform
/// - 4: internal contract violation or I/O failure
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures raised by the dashboard components.
///
/// A non-positive or non-numeric input to the log transform is deliberately
/// absent: it resolves to an unknown cell, not an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashError {
    #[error("No dataset loaded: {reason}")]
    DataUnavailable { reason: String },

    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Row {row}: `year` must be an integer (got '{value}')")]
    InvalidYear { row: usize, value: String },

    #[error("Duplicate year {year}: `year` must be unique")]
    DuplicateYear { year: i32 },

    #[error("Shock on {driver} of {pct}% is undefined: 1 + pct/100 must be > 0")]
    UndefinedInput { driver: String, pct: f64 },

    #[error("Equation `{table}` has no coefficient for `{variable}`")]
    MissingCoefficient { table: String, variable: String },

    #[error("No result table named `{name}`")]
    TableNotFound { name: String },

    #[error("Shock on {driver} = {value} is outside [{min}, {max}]")]
    ShockOutOfRange {
        driver: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Cannot style `{table}` column `{column}` row {row}: '{value}' is not numeric")]
    Style {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Failed to read '{}': {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Export failed: {message}")]
    Export { message: String },
}

impl From<DashError> for AppError {
    fn from(err: DashError) -> Self {
        let exit_code = match &err {
            DashError::DataUnavailable { .. }
            | DashError::MissingColumns { .. }
            | DashError::InvalidYear { .. }
            | DashError::DuplicateYear { .. }
            | DashError::TableNotFound { .. }
            | DashError::ShockOutOfRange { .. }
            | DashError::Read { .. } => 2,
            DashError::UndefinedInput { .. } => 3,
            DashError::MissingCoefficient { .. } | DashError::Style { .. } | DashError::Export { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_every_column() {
        let err = DashError::MissingColumns {
            columns: vec!["INF".to_string(), "HOSTGDP".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required columns: INF, HOSTGDP");
    }

    #[test]
    fn exit_codes_follow_category() {
        let user: AppError = DashError::TableNotFound { name: "x".to_string() }.into();
        assert_eq!(user.exit_code(), 2);

        let undefined: AppError = DashError::UndefinedInput {
            driver: "REM".to_string(),
            pct: -100.0,
        }
        .into();
        assert_eq!(undefined.exit_code(), 3);

        let contract: AppError = DashError::MissingCoefficient {
            table: "3SLS_eq1".to_string(),
            variable: "OPEN".to_string(),
        }
        .into();
        assert_eq!(contract.exit_code(), 4);
    }
}
