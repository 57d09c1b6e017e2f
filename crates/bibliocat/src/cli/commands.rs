//! One-shot counterparts of the menu entries.
//!
//! Arguments arrive as raw strings and go through the same validation as the
//! interactive prompts.

use crate::cli::output::{OutputWriter, WorkLayout};
use crate::config::WorkDeletion;
use crate::db::Catalog;
use crate::import::import_sql_file;
use crate::models::AuthorId;
use crate::validate;
use crate::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct AuthorName {
    id: AuthorId,
    pen_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct PendingPurge {
    cutoff: String,
    copies: usize,
    loans: usize,
    deleted: bool,
}

pub fn import<W: Write>(
    catalog: &mut Catalog,
    path: &Path,
    writer: &mut OutputWriter<W>,
) -> Result<()> {
    let report = import_sql_file(catalog, path)?;
    writer.write_record(
        &report,
        &format!(
            "Database imported successfully ({} statements).",
            report.statements
        ),
    )
}

pub fn author<W: Write>(catalog: &Catalog, id: &str, writer: &mut OutputWriter<W>) -> Result<()> {
    let id = validate::parse_author_id(id)?;
    let pen_name = catalog.author_pen_name(id)?;
    let text = match &pen_name {
        Some(name) => format!("Author's name: {}", name),
        None => "No author found with that ID.".to_string(),
    };
    writer.write_record(&AuthorName { id, pen_name }, &text)
}

pub fn before<W: Write>(catalog: &Catalog, year: &str, writer: &mut OutputWriter<W>) -> Result<()> {
    let year = validate::parse_year("year", year)?;
    let works = catalog.works_before(year)?;
    writer.write_works(&works, WorkLayout::YearFirst)
}

pub fn filter<W: Write>(
    catalog: &Catalog,
    type_id: &str,
    style_id: &str,
    from: &str,
    to: &str,
    writer: &mut OutputWriter<W>,
) -> Result<()> {
    let type_id = validate::parse_type_id(type_id)?;
    let style_id = validate::parse_style_id(style_id)?;
    let range = validate::parse_year_range(from, to)?;
    let works = catalog.works_by_type_style(type_id, style_id, range)?;
    writer.write_works(&works, WorkLayout::TitleFirst)
}

/// Without `confirmed` only reports what would be deleted.
pub fn purge_copies<W: Write>(
    catalog: &mut Catalog,
    year: &str,
    confirmed: bool,
    writer: &mut OutputWriter<W>,
) -> Result<()> {
    let cutoff = validate::parse_cutoff_year(year)?;

    if !confirmed {
        let pending = PendingPurge {
            cutoff: cutoff.as_sql_date(),
            copies: catalog.count_copies_before(cutoff)?,
            loans: catalog.count_loans_before(cutoff)?,
            deleted: false,
        };
        let text = format!(
            "{} copies bought before {} ({} loan records) would be removed. Re-run with --yes to delete.",
            pending.copies, pending.cutoff, pending.loans
        );
        return writer.write_record(&pending, &text);
    }

    let purge = catalog.delete_copies_before(cutoff)?;
    let done = PendingPurge {
        cutoff: cutoff.as_sql_date(),
        copies: purge.copies_deleted,
        loans: purge.loans_deleted,
        deleted: true,
    };
    writer.write_record(
        &done,
        &format!(
            "Copies bought before {} and related loan records deleted ({} copies, {} loans).",
            cutoff, purge.copies_deleted, purge.loans_deleted
        ),
    )
}

pub fn purge_author<W: Write>(
    catalog: &mut Catalog,
    id: &str,
    mode: WorkDeletion,
    writer: &mut OutputWriter<W>,
) -> Result<()> {
    let author = validate::parse_author_id(id)?;
    let purge = catalog.delete_works_by_author(author, mode)?;
    writer.write_record(
        &purge,
        &format!(
            "Works and related authorship links deleted ({} links, {} works, {} copies, {} loans).",
            purge.links_deleted, purge.works_deleted, purge.copies_deleted, purge.loans_deleted
        ),
    )
}
