//! Catalog queries and cascading deletes.
//!
//! Mutations run in a single transaction that is committed once after every
//! statement succeeded. Returning early drops the transaction, which rolls it
//! back, so a failure never leaves half of a cascade applied.

use crate::config::WorkDeletion;
use crate::db::Catalog;
use crate::models::{
    AuthorId, AuthorPurge, CopyPurge, CutoffYear, StyleId, TypeId, WorkId, WorkSummary, Year,
    YearRange,
};
use crate::Result;
use rusqlite::types::ValueRef;
use rusqlite::{params, OptionalExtension, Row, Transaction};
use tracing::{debug, info};

const DELETE_LOANS_OF_COPIES_BEFORE: &str = "DELETE FROM Emprunter
     WHERE idExemplaire IN (SELECT idExemplaire FROM Exemplaire WHERE dateAchat < ?1)";
const DELETE_COPIES_BEFORE: &str = "DELETE FROM Exemplaire WHERE dateAchat < ?1";

impl Catalog {
    /// Pen name of an author, `None` when no author has that id.
    pub fn author_pen_name(&self, id: AuthorId) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT NomPlume FROM Auteur WHERE idAuteur = ?1")?;
        let name = stmt
            .query_row(params![id.0], |row| text_column(row, 0))
            .optional()?;
        Ok(name)
    }

    /// Works first published strictly before `year`.
    pub fn works_before(&self, year: Year) -> Result<Vec<WorkSummary>> {
        self.list_works(
            "SELECT idOuvrage, TitreVO, AnneePremiereParution
             FROM Ouvrage
             WHERE AnneePremiereParution < ?1
             ORDER BY AnneePremiereParution, idOuvrage",
            params![year.0],
        )
    }

    /// Works matching a type, a style and an inclusive publication-year range.
    pub fn works_by_type_style(
        &self,
        type_id: TypeId,
        style_id: StyleId,
        range: YearRange,
    ) -> Result<Vec<WorkSummary>> {
        self.list_works(
            "SELECT idOuvrage, TitreVO, AnneePremiereParution
             FROM Ouvrage
             WHERE idType = ?1 AND idStyle = ?2
               AND AnneePremiereParution BETWEEN ?3 AND ?4
             ORDER BY AnneePremiereParution, idOuvrage",
            params![type_id.0, style_id.0, range.from.0, range.to.0],
        )
    }

    fn list_works(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<WorkSummary>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let works = stmt
            .query_map(params, |row| {
                Ok(WorkSummary {
                    id: WorkId(row.get(0)?),
                    title: text_column(row, 1)?,
                    year: Year(row.get(2)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(rows = works.len(), "work listing");
        Ok(works)
    }

    /// Copies purchased before the cutoff date.
    pub fn count_copies_before(&self, cutoff: CutoffYear) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM Exemplaire WHERE dateAchat < ?1",
            params![cutoff.as_sql_date()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Loans referencing a copy purchased before the cutoff date.
    pub fn count_loans_before(&self, cutoff: CutoffYear) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM Emprunter
             WHERE idExemplaire IN (SELECT idExemplaire FROM Exemplaire WHERE dateAchat < ?1)",
            params![cutoff.as_sql_date()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Delete every copy bought before January 1st of `cutoff`, loans first.
    pub fn delete_copies_before(&mut self, cutoff: CutoffYear) -> Result<CopyPurge> {
        let date = cutoff.as_sql_date();
        let tx = self.conn.transaction()?;

        // Loans reference copies: they must go first.
        let loans_deleted = tx.execute(DELETE_LOANS_OF_COPIES_BEFORE, params![date])?;
        let copies_deleted = tx.execute(DELETE_COPIES_BEFORE, params![date])?;
        tx.commit()?;

        info!(cutoff = %date, loans_deleted, copies_deleted, "deleted copies");
        Ok(CopyPurge {
            loans_deleted,
            copies_deleted,
        })
    }

    /// Delete the works written by `author`.
    ///
    /// See [`WorkDeletion`] for what each mode removes.
    pub fn delete_works_by_author(
        &mut self,
        author: AuthorId,
        mode: WorkDeletion,
    ) -> Result<AuthorPurge> {
        let tx = self.conn.transaction()?;
        let purge = match mode {
            WorkDeletion::Literal => delete_links_then_works(&tx, author)?,
            WorkDeletion::Capture => delete_captured_works(&tx, author)?,
        };
        tx.commit()?;

        info!(
            %author,
            ?mode,
            links_deleted = purge.links_deleted,
            works_deleted = purge.works_deleted,
            "deleted works by author"
        );
        Ok(purge)
    }
}

fn delete_links_then_works(tx: &Transaction<'_>, author: AuthorId) -> Result<AuthorPurge> {
    let links_deleted = tx.execute("DELETE FROM Ecrire WHERE idAuteur = ?1", params![author.0])?;
    // The subquery reads the links deleted just above, so it matches nothing.
    let works_deleted = tx.execute(
        "DELETE FROM Ouvrage
         WHERE idOuvrage IN (SELECT idOuvrage FROM Ecrire WHERE idAuteur = ?1)",
        params![author.0],
    )?;

    Ok(AuthorPurge {
        links_deleted,
        works_deleted,
        ..AuthorPurge::default()
    })
}

fn delete_captured_works(tx: &Transaction<'_>, author: AuthorId) -> Result<AuthorPurge> {
    let works: Vec<i64> = {
        let mut stmt = tx.prepare("SELECT idOuvrage FROM Ecrire WHERE idAuteur = ?1")?;
        let ids = stmt
            .query_map(params![author.0], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        ids
    };
    debug!(%author, works = ?works, "captured works to delete");

    let mut purge = AuthorPurge::default();
    let mut delete_loans = tx.prepare(
        "DELETE FROM Emprunter
         WHERE idExemplaire IN (SELECT idExemplaire FROM Exemplaire WHERE idOuvrage = ?1)",
    )?;
    let mut delete_copies = tx.prepare("DELETE FROM Exemplaire WHERE idOuvrage = ?1")?;
    let mut delete_links = tx.prepare("DELETE FROM Ecrire WHERE idOuvrage = ?1")?;
    let mut delete_work = tx.prepare("DELETE FROM Ouvrage WHERE idOuvrage = ?1")?;

    for work in works {
        purge.loans_deleted += delete_loans.execute(params![work])?;
        purge.copies_deleted += delete_copies.execute(params![work])?;
        purge.links_deleted += delete_links.execute(params![work])?;
        purge.works_deleted += delete_work.execute(params![work])?;
    }

    Ok(purge)
}

/// Read a column as text. Some dumps store titles and names as blobs.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Null => String::new(),
    })
}
