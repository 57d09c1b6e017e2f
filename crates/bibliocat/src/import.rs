//! Import of SQL dump files.
//!
//! Statements are split by SQLite's own parser rather than on `;`, so string
//! literals and trigger bodies containing semicolons survive intact. The whole
//! file runs in one transaction: either every statement is committed or none.

use crate::db::Catalog;
use crate::models::ImportReport;
use crate::{Error, Result};
use rusqlite::Batch;
use std::path::Path;
use tracing::{debug, info, warn};

const PREVIEW_LEN: usize = 80;

/// Read `path` and import it into the catalog.
pub fn import_sql_file(catalog: &mut Catalog, path: &Path) -> Result<ImportReport> {
    let sql = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = sql.len(), "read SQL file");
    import_sql(catalog, &sql)
}

/// Execute every statement of `sql` in order and commit once at the end.
pub fn import_sql(catalog: &mut Catalog, sql: &str) -> Result<ImportReport> {
    let tx = catalog.conn.transaction()?;
    let mut report = ImportReport::default();

    {
        let mut batch = Batch::new(&tx, sql);
        let mut index = 0;
        loop {
            index += 1;
            let mut stmt = match batch.next() {
                Ok(Some(stmt)) => stmt,
                Ok(None) => break,
                Err(source) => {
                    warn!(index, error = %source, "statement could not be prepared");
                    return Err(Error::Import {
                        index,
                        statement: None,
                        source,
                    });
                }
            };

            let text = stmt.expanded_sql().unwrap_or_default();
            if is_transaction_control(&text) {
                debug!(index, statement = %preview(&text), "skipping transaction control");
                report.skipped += 1;
                continue;
            }

            debug!(index, statement = %preview(&text), "executing");
            let outcome = if stmt.column_count() > 0 {
                // Statements that return rows (PRAGMA, SELECT) are drained and ignored.
                stmt.query([]).and_then(|mut rows| {
                    while rows.next()?.is_some() {}
                    Ok(())
                })
            } else {
                stmt.execute([]).map(|_| ())
            };

            if let Err(source) = outcome {
                warn!(index, statement = %preview(&text), error = %source, "statement failed");
                return Err(Error::Import {
                    index,
                    statement: Some(preview(&text)),
                    source,
                });
            }
            report.statements += 1;
        }
    }

    tx.commit()?;
    info!(
        statements = report.statements,
        skipped = report.skipped,
        "import committed"
    );
    Ok(report)
}

/// `BEGIN`, `COMMIT`, `END` and `ROLLBACK` found in a dump would fight the
/// import's own transaction.
fn is_transaction_control(sql: &str) -> bool {
    let normalized = normalize_sql(strip_leading_comments(sql));
    let keyword = normalized.split(' ').next().unwrap_or("");
    matches!(keyword, "BEGIN" | "COMMIT" | "END" | "ROLLBACK")
}

/// Skip `--` line comments and `/* */` block comments ahead of the first token.
fn strip_leading_comments(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(rest) = sql.strip_prefix("/*") {
            sql = rest.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return sql;
        }
    }
}

/// Normalize SQL for pattern matching
fn normalize_sql(sql: &str) -> String {
    sql.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(';')
        .to_uppercase()
}

/// Single-line, truncated rendering of a statement for messages.
fn preview(sql: &str) -> String {
    let collapsed = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > PREVIEW_LEN {
        let head: String = collapsed.chars().take(PREVIEW_LEN - 3).collect();
        format!("{}...", head)
    } else {
        collapsed
    }
}
