//! Output formatting module
//!
//! Provides table and JSON output formatting for CLI commands.

use serde::Serialize;
use std::fmt::Display;
use tabled::{Table, Tabled};

use dahlia_core::AuthPayload;

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use 'table' or 'json'", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Key/value row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl FieldRow {
    fn new(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Flatten an auth payload into table rows, skipping absent fields
pub fn payload_rows(payload: &AuthPayload) -> Vec<FieldRow> {
    let mut rows = Vec::new();

    if let Some(user) = &payload.user {
        rows.push(FieldRow::new("id", user.id.clone()));
        rows.push(FieldRow::new("username", user.username.clone()));
    }
    if let Some(token) = &payload.access_token {
        rows.push(FieldRow::new("accessToken", token.clone()));
    }
    if let Some(token) = &payload.refresh_token {
        rows.push(FieldRow::new("refreshToken", token.clone()));
    }

    rows
}

/// Print an auth payload in the specified format
pub fn print_payload(payload: &AuthPayload, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_output(&payload_rows(payload), format),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(payload)?);
            Ok(())
        }
    }
}

/// Print data in the specified format
pub fn print_output<T>(data: &[T], format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("No items found.");
            } else {
                let table = Table::new(data).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Print a single item in the specified format
pub fn print_single<T>(data: &T, format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    match format {
        OutputFormat::Table => {
            let table = Table::new([data]).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Print a success message (respects quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", colored::Colorize::green(message));
    }
}
