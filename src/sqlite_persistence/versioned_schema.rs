//! Declarative SQLite schema definitions.
//!
//! Tables are described as const data, created on first open and validated
//! against the live database on every subsequent open. The schema version is
//! tracked in SQLite's `user_version` pragma.

use anyhow::{bail, Result};
use rusqlite::{params, types::Type, Connection};

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Allow unused_mut because the variable is only mutated when optional
            // field assignments are passed to the macro (e.g., `is_primary_key = true`)
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                default_value: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
    Blob,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Blob => "BLOB",
        }
    }

    fn from_sql(s: &str) -> Option<&'static SqlType> {
        match s {
            "TEXT" => Some(&SqlType::Text),
            "INTEGER" => Some(&SqlType::Integer),
            "REAL" => Some(&SqlType::Real),
            "BLOB" => Some(&SqlType::Blob),
            _ => None,
        }
    }
}

pub enum ForeignKeyOnChange {
    NoAction,
    Restrict,
    SetNull,
    SetDefault,
    Cascade,
}

impl ForeignKeyOnChange {
    fn as_sql(&self) -> &'static str {
        match self {
            ForeignKeyOnChange::NoAction => "NO ACTION",
            ForeignKeyOnChange::Restrict => "RESTRICT",
            ForeignKeyOnChange::SetNull => "SET NULL",
            ForeignKeyOnChange::SetDefault => "SET DEFAULT",
            ForeignKeyOnChange::Cascade => "CASCADE",
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
    pub on_delete: ForeignKeyOnChange,
}

pub struct Column<'a, S: AsRef<str>> {
    pub name: S,
    pub sql_type: &'a SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub default_value: Option<S>,
    pub foreign_key: Option<&'a ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column<'static, &'static str>],
    pub indices: &'static [(&'static str, &'static str)],
    pub unique_constraints: &'static [&'static [&'static str]],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let mut column_defs = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            let mut def = format!("{} {}", column.name, column.sql_type.as_sql());
            if column.is_primary_key {
                def.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                def.push_str(" NOT NULL");
            }
            if let Some(default_value) = column.default_value {
                def.push_str(&format!(" DEFAULT {}", default_value));
            }
            if let Some(fk) = column.foreign_key {
                def.push_str(&format!(
                    " REFERENCES {}({}) ON DELETE {}",
                    fk.foreign_table,
                    fk.foreign_column,
                    fk.on_delete.as_sql()
                ));
            }
            column_defs.push(def);
        }
        for unique_columns in self.unique_constraints {
            column_defs.push(format!("UNIQUE ({})", unique_columns.join(", ")));
        }

        conn.execute(
            &format!("CREATE TABLE {} ({});", self.name, column_defs.join(", ")),
            params![],
        )?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;
        for table in self.tables {
            table.create(conn)?;
        }
        conn.execute(&format!("PRAGMA user_version = {}", self.version), [])?;
        Ok(())
    }

    /// Check that the live database matches this schema: columns, indices,
    /// unique constraints and foreign keys. Fails with a description of the
    /// first mismatch found.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            validate_columns(conn, table)?;
            validate_indices(conn, table)?;
            validate_unique_constraints(conn, table)?;
            validate_foreign_keys(conn, table)?;
        }
        Ok(())
    }
}

fn validate_columns(conn: &Connection, table: &Table) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", table.name))?;
    let actual_columns: Vec<Column<'_, String>> = stmt
        .query_map(params![], |row| {
            let sql_type_name: String = row.get(2)?;
            let sql_type = SqlType::from_sql(&sql_type_name).ok_or(
                rusqlite::Error::InvalidColumnType(2, sql_type_name, Type::Text),
            )?;
            Ok(Column {
                name: row.get::<_, String>(1)?,
                sql_type,
                non_null: row.get::<_, i32>(3)? == 1,
                default_value: row.get::<_, Option<String>>(4)?,
                is_primary_key: row.get::<_, i32>(5)? == 1,
                foreign_key: None,
            })
        })?
        .collect::<Result<_, _>>()?;

    if actual_columns.len() != table.columns.len() {
        bail!(
            "Table {} has columns [{}], expected [{}]",
            table.name,
            actual_columns
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            table
                .columns
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    for (actual, expected) in actual_columns.iter().zip(table.columns.iter()) {
        if actual.name != expected.name {
            bail!(
                "Table {} column name mismatch: expected {}, got {}",
                table.name,
                expected.name,
                actual.name
            );
        }
        if actual.sql_type != expected.sql_type {
            bail!(
                "Table {} column {} type mismatch: expected {:?}, got {:?}",
                table.name,
                expected.name,
                expected.sql_type,
                actual.sql_type
            );
        }
        if actual.non_null != expected.non_null {
            bail!(
                "Table {} column {} non-null mismatch: expected {}, got {}",
                table.name,
                expected.name,
                expected.non_null,
                actual.non_null
            );
        }
        if actual.is_primary_key != expected.is_primary_key {
            bail!(
                "Table {} column {} primary key mismatch: expected {}, got {}",
                table.name,
                expected.name,
                expected.is_primary_key,
                actual.is_primary_key
            );
        }
        // SQLite may report stored defaults wrapped in parentheses
        let actual_default = actual.default_value.as_deref().map(strip_parens);
        if actual_default != expected.default_value.map(strip_parens) {
            bail!(
                "Table {} column {} default value mismatch: expected {:?}, got {:?}",
                table.name,
                expected.name,
                expected.default_value,
                actual.default_value
            );
        }
    }
    Ok(())
}

fn validate_indices(conn: &Connection, table: &Table) -> Result<()> {
    for (index_name, _) in table.indices {
        let index_exists: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1 AND tbl_name=?2",
                params![index_name, table.name],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if !index_exists {
            bail!("Table {} is missing index '{}'", table.name, index_name);
        }
    }
    Ok(())
}

fn validate_unique_constraints(conn: &Connection, table: &Table) -> Result<()> {
    if table.unique_constraints.is_empty() {
        return Ok(());
    }

    // SQLite materializes unique constraints as unique indices; collect the
    // column set of each and compare order-independently.
    let mut stmt = conn.prepare(&format!("PRAGMA index_list({})", table.name))?;
    let unique_indices: Vec<String> = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(1)?, row.get::<_, i32>(2)?))
        })?
        .filter_map(|r| r.ok())
        .filter(|(_, is_unique)| *is_unique == 1)
        .map(|(name, _)| name)
        .collect();

    let mut unique_index_columns: Vec<Vec<String>> = Vec::new();
    for index_name in &unique_indices {
        let mut idx_stmt = conn.prepare(&format!("PRAGMA index_info({})", index_name))?;
        let mut cols: Vec<String> = idx_stmt
            .query_map([], |row| row.get::<_, String>(2))?
            .filter_map(|r| r.ok())
            .collect();
        cols.sort();
        unique_index_columns.push(cols);
    }

    for expected_columns in table.unique_constraints {
        let mut expected_sorted: Vec<&str> = expected_columns.to_vec();
        expected_sorted.sort_unstable();

        let found = unique_index_columns
            .iter()
            .any(|actual| actual.iter().map(String::as_str).collect::<Vec<_>>() == expected_sorted);
        if !found {
            bail!(
                "Table {} is missing unique constraint on columns ({})",
                table.name,
                expected_columns.join(", ")
            );
        }
    }
    Ok(())
}

fn validate_foreign_keys(conn: &Connection, table: &Table) -> Result<()> {
    // PRAGMA foreign_key_list returns: id, seq, table, from, to, on_update, on_delete, match
    struct ActualFk {
        from_column: String,
        to_table: String,
        to_column: String,
        on_delete: String,
    }

    let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list({})", table.name))?;
    let actual_fks: Vec<ActualFk> = stmt
        .query_map([], |row| {
            Ok(ActualFk {
                from_column: row.get(3)?,
                to_table: row.get(2)?,
                to_column: row.get(4)?,
                on_delete: row.get(6)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    for column in table.columns {
        let Some(expected) = column.foreign_key else {
            continue;
        };
        let matched = actual_fks.iter().any(|actual| {
            actual.from_column == column.name
                && actual.to_table == expected.foreign_table
                && actual.to_column == expected.foreign_column
                && actual.on_delete == expected.on_delete.as_sql()
        });
        if matched {
            continue;
        }

        if let Some(actual) = actual_fks.iter().find(|a| a.from_column == column.name) {
            bail!(
                "Table {} column {} foreign key mismatch: expected REFERENCES {}({}) ON DELETE {}, got REFERENCES {}({}) ON DELETE {}",
                table.name,
                column.name,
                expected.foreign_table,
                expected.foreign_column,
                expected.on_delete.as_sql(),
                actual.to_table,
                actual.to_column,
                actual.on_delete
            );
        }
        bail!(
            "Table {} column {} is missing foreign key: expected REFERENCES {}({}) ON DELETE {}",
            table.name,
            column.name,
            expected.foreign_table,
            expected.foreign_column,
            expected.on_delete.as_sql()
        );
    }
    Ok(())
}

fn strip_parens(s: &str) -> String {
    if s.starts_with('(') && s.ends_with(')') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}
