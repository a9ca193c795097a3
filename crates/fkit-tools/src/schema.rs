//! Table descriptors and their SQL / JSON renderings

use crate::error::{Result, ToolsError};
use fkit_core::constant::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
use fkit_core::{ensure_directory, open_file, OpenFlags};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Bigint,
}

impl ColumnType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::Bigint => "BIGINT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub columns: &'static [Column],
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        column_type: ColumnType::Text,
    }
}

const fn bigint(name: &'static str) -> Column {
    Column {
        name,
        column_type: ColumnType::Bigint,
    }
}

const TABLES: &[TableDescriptor] = &[
    TableDescriptor {
        name: "cis_audit",
        columns: &[text("item"), text("value")],
    },
    TableDescriptor {
        name: "mdm_bridge",
        columns: &[
            text("enrollment_status"),
            text("enrolled_user"),
            text("mdm_command_input"),
            text("mdm_command_output"),
            text("raw_mdm_command_output"),
        ],
    },
    TableDescriptor {
        name: "sntp_request",
        columns: &[
            text("server"),
            bigint("timestamp_ms"),
            bigint("clock_offset_ms"),
        ],
    },
];

/// The extension tables the agent registers
pub fn tables() -> &'static [TableDescriptor] {
    TABLES
}

/// Output rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Sql,
    Json,
}

impl std::str::FromStr for SchemaFormat {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sql" => Ok(Self::Sql),
            "json" => Ok(Self::Json),
            other => Err(ToolsError::BadRequest(format!(
                "Unknown schema format {}, expected sql or json",
                other
            ))),
        }
    }
}

/// One `CREATE TABLE` statement per table, in list order
pub fn to_sql(tables: &[TableDescriptor]) -> String {
    let mut out = String::new();
    for table in tables {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("    `{}` {}", c.name, c.column_type.as_sql()))
            .collect();
        out.push_str(&format!(
            "CREATE TABLE `{}` (\n{}\n);\n",
            table.name,
            columns.join(",\n")
        ));
    }
    out
}

/// A single JSON document describing every table
pub fn to_json(tables: &[TableDescriptor]) -> Result<String> {
    let mut doc = serde_json::to_string_pretty(tables)?;
    doc.push('\n');
    Ok(doc)
}

pub fn render(tables: &[TableDescriptor], format: SchemaFormat) -> Result<String> {
    match format {
        SchemaFormat::Sql => Ok(to_sql(tables)),
        SchemaFormat::Json => to_json(tables),
    }
}

/// Write `contents` to `path` with the default file mode
///
/// A missing parent directory is created with the default directory mode.
/// An existing output whose mode differs is refused rather than overwritten.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            ensure_directory(parent, DEFAULT_DIR_MODE)?;
        }
    }

    let mut file = open_file(
        path,
        OpenFlags::CREATE | OpenFlags::WRITE | OpenFlags::TRUNCATE,
        DEFAULT_FILE_MODE,
    )?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_statements() {
        let sql = to_sql(tables());

        assert_eq!(sql.matches("CREATE TABLE").count(), tables().len());
        assert!(sql.starts_with("CREATE TABLE `cis_audit` (\n    `item` TEXT,\n    `value` TEXT\n);\n"));
        assert!(sql.contains("`timestamp_ms` BIGINT"));
    }

    #[test]
    fn test_sql_keeps_column_order() {
        let sql = to_sql(tables());
        let user = sql.find("enrolled_user").unwrap();
        let input = sql.find("mdm_command_input").unwrap();
        assert!(user < input);
    }

    #[test]
    fn test_json_document() {
        let json = to_json(tables()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["cis_audit", "mdm_bridge", "sntp_request"]);
        assert_eq!(value[2]["columns"][1]["type"], "bigint");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("SQL".parse::<SchemaFormat>().unwrap(), SchemaFormat::Sql);
        assert_eq!("json".parse::<SchemaFormat>().unwrap(), SchemaFormat::Json);
        assert!("yaml".parse::<SchemaFormat>().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_uses_default_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gen").join("schema.sql");

        write_output(&out, &to_sql(tables())).unwrap();

        let file_mode = std::fs::metadata(&out).unwrap().permissions().mode() & 0o7777;
        let dir_mode = std::fs::metadata(out.parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o7777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode, 0o755);

        // Same mode: overwritten in place
        write_output(&out, "-- empty\n").unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "-- empty\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_refuses_foreign_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("schema.json");
        std::fs::write(&out, "keep").unwrap();
        std::fs::set_permissions(&out, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = write_output(&out, "{}").unwrap_err();
        assert!(matches!(err, ToolsError::Gate(ref e) if e.is_mode_mismatch()));
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "keep");
    }
}
