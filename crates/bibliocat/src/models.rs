//! Domain types shared by the catalog operations and their callers.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// `Auteur.idAuteur`
    AuthorId
);
id_type!(
    /// `Type.idType`
    TypeId
);
id_type!(
    /// `Style.idStyle`
    StyleId
);
id_type!(
    /// `Ouvrage.idOuvrage`
    WorkId
);

/// A first-publication year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Year(pub i32);

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive publication-year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub from: Year,
    pub to: Year,
}

/// A four-digit year whose January 1st is the purchase-date cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffYear {
    year: i32,
    date: NaiveDate,
}

impl CutoffYear {
    pub(crate) fn new(year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(|date| Self { year, date })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Cutoff formatted the way `Exemplaire.dateAchat` is stored.
    pub fn as_sql_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for CutoffYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)
    }
}

/// One row of a work listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkSummary {
    pub id: WorkId,
    pub title: String,
    pub year: Year,
}

/// Rows removed by "delete copies purchased before year".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyPurge {
    pub loans_deleted: usize,
    pub copies_deleted: usize,
}

/// Rows removed by "delete works by author".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorPurge {
    pub links_deleted: usize,
    pub works_deleted: usize,
    pub copies_deleted: usize,
    pub loans_deleted: usize,
}

/// Outcome of a successful SQL import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Statements executed.
    pub statements: usize,
    /// Transaction-control statements ignored because the import runs in its own transaction.
    pub skipped: usize,
}
