//! The interactive numbered menu.
//!
//! Each entry is a failure boundary: a rejected input or a failed statement
//! is reported to the operator and the loop carries on with the same
//! connection. Only a lost console (EOF) or choice `0` ends the session.

use crate::cli::output::{works_table, WorkLayout};
use crate::config::WorkDeletion;
use crate::db::Catalog;
use crate::import::import_sql_file;
use crate::validate;
use crate::{Error, Result};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, warn};

const MENU: &str = "
Menu:
1. Import SQL file
2. Get author's name
3. Get works published before a given year
4. Get works of a given type and style
5. Delete copies bought before a date
6. Delete works written by an author
0. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Import,
    AuthorName,
    WorksBefore,
    WorksByTypeStyle,
    DeleteCopies,
    DeleteWorksByAuthor,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Import),
            "2" => Some(Self::AuthorName),
            "3" => Some(Self::WorksBefore),
            "4" => Some(Self::WorksByTypeStyle),
            "5" => Some(Self::DeleteCopies),
            "6" => Some(Self::DeleteWorksByAuthor),
            "0" => Some(Self::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    /// Input ended in the middle of an operation.
    Quit,
}

pub struct Menu<R, W> {
    input: R,
    output: W,
    work_deletion: WorkDeletion,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, work_deletion: WorkDeletion) -> Self {
        Self {
            input,
            output,
            work_deletion,
        }
    }

    /// Run the menu until `0` is chosen or input ends.
    pub fn run(&mut self, catalog: &mut Catalog) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };
            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.output, "Unrecognized choice '{}'.", line.trim())?;
                continue;
            };
            if choice == MenuChoice::Exit {
                break;
            }

            debug!(?choice, "menu selection");
            match self.dispatch(choice, catalog) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => self.report(choice, &e)?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice, catalog: &mut Catalog) -> Result<Flow> {
        match choice {
            MenuChoice::Import => self.import(catalog),
            MenuChoice::AuthorName => self.author_name(catalog),
            MenuChoice::WorksBefore => self.works_before(catalog),
            MenuChoice::WorksByTypeStyle => self.works_by_type_style(catalog),
            MenuChoice::DeleteCopies => self.delete_copies(catalog),
            MenuChoice::DeleteWorksByAuthor => self.delete_works_by_author(catalog),
            MenuChoice::Exit => Ok(Flow::Quit),
        }
    }

    fn import(&mut self, catalog: &mut Catalog) -> Result<Flow> {
        let Some(path) = self.prompt("Enter the path to the .sql file: ")? else {
            return Ok(Flow::Quit);
        };
        let report = import_sql_file(catalog, Path::new(path.trim()))?;
        writeln!(
            self.output,
            "Database imported successfully ({} statements).",
            report.statements
        )?;
        Ok(Flow::Continue)
    }

    fn author_name(&mut self, catalog: &mut Catalog) -> Result<Flow> {
        let Some(input) = self.prompt("Enter the author ID: ")? else {
            return Ok(Flow::Quit);
        };
        let id = validate::parse_author_id(&input)?;
        match catalog.author_pen_name(id)? {
            Some(name) => writeln!(self.output, "Author's name: {}", name)?,
            None => writeln!(self.output, "No author found with that ID.")?,
        }
        Ok(Flow::Continue)
    }

    fn works_before(&mut self, catalog: &mut Catalog) -> Result<Flow> {
        let Some(input) = self.prompt("Enter the year: ")? else {
            return Ok(Flow::Quit);
        };
        let year = validate::parse_year("year", &input)?;
        let works = catalog.works_before(year)?;
        if works.is_empty() {
            writeln!(self.output, "No works found.")?;
        } else {
            writeln!(self.output, "Works published before {}:", year)?;
            writeln!(self.output, "{}", works_table(&works, WorkLayout::YearFirst))?;
        }
        Ok(Flow::Continue)
    }

    fn works_by_type_style(&mut self, catalog: &mut Catalog) -> Result<Flow> {
        // Each id is checked as soon as it is typed.
        let Some(input) = self.prompt("Enter the type ID: ")? else {
            return Ok(Flow::Quit);
        };
        let type_id = validate::parse_type_id(&input)?;
        let Some(input) = self.prompt("Enter the style ID: ")? else {
            return Ok(Flow::Quit);
        };
        let style_id = validate::parse_style_id(&input)?;
        let Some(from) = self.prompt("Enter year 1: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(to) = self.prompt("Enter year 2: ")? else {
            return Ok(Flow::Quit);
        };
        let range = validate::parse_year_range(&from, &to)?;

        let works = catalog.works_by_type_style(type_id, style_id, range)?;
        if works.is_empty() {
            writeln!(self.output, "No works found.")?;
        } else {
            writeln!(
                self.output,
                "Works of type {} and style {} published between {} and {}:",
                type_id, style_id, range.from, range.to
            )?;
            writeln!(self.output, "{}", works_table(&works, WorkLayout::TitleFirst))?;
        }
        Ok(Flow::Continue)
    }

    fn delete_copies(&mut self, catalog: &mut Catalog) -> Result<Flow> {
        let Some(input) = self.prompt("Enter the year (YYYY): ")? else {
            return Ok(Flow::Quit);
        };
        let cutoff = validate::parse_cutoff_year(&input)?;

        let copies = catalog.count_copies_before(cutoff)?;
        let loans = catalog.count_loans_before(cutoff)?;
        writeln!(
            self.output,
            "{} copies bought before {} ({} loan records) will be removed.",
            copies,
            cutoff.as_sql_date(),
            loans
        )?;

        let question = format!(
            "Are you sure you want to delete copies bought before {}? (yes/no): ",
            cutoff
        );
        let Some(answer) = self.prompt(&question)? else {
            return Ok(Flow::Quit);
        };
        if !validate::is_confirmed(&answer) {
            writeln!(self.output, "Deletion cancelled.")?;
            return Ok(Flow::Continue);
        }

        let purge = catalog.delete_copies_before(cutoff)?;
        writeln!(
            self.output,
            "Copies bought before {} and related loan records deleted ({} copies, {} loans).",
            cutoff, purge.copies_deleted, purge.loans_deleted
        )?;
        Ok(Flow::Continue)
    }

    fn delete_works_by_author(&mut self, catalog: &mut Catalog) -> Result<Flow> {
        let Some(input) = self.prompt("Enter the author ID: ")? else {
            return Ok(Flow::Quit);
        };
        let author = validate::parse_author_id(&input)?;
        let purge = catalog.delete_works_by_author(author, self.work_deletion)?;
        writeln!(
            self.output,
            "Works and related authorship links deleted ({} links, {} works, {} copies, {} loans).",
            purge.links_deleted, purge.works_deleted, purge.copies_deleted, purge.loans_deleted
        )?;
        Ok(Flow::Continue)
    }

    fn report(&mut self, choice: MenuChoice, err: &Error) -> Result<()> {
        warn!(operation = ?choice, error = %err, "operation failed");
        writeln!(self.output, "{} {}", "Error:".red(), err)?;
        if let Error::Import {
            statement: Some(statement),
            ..
        } = err
        {
            writeln!(self.output, "  in: {}", statement)?;
        }
        Ok(())
    }

    /// Print `label` and read one line. `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::import_sql;
    use crate::SAMPLE_SCHEMA;

    fn seeded() -> Catalog {
        let mut catalog = Catalog::open_in_memory().unwrap();
        import_sql(&mut catalog, SAMPLE_SCHEMA).unwrap();
        catalog
    }

    fn run(catalog: &mut Catalog, input: &str) -> String {
        let mut out = Vec::new();
        Menu::new(input.as_bytes(), &mut out, WorkDeletion::Literal)
            .run(catalog)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Import));
        assert_eq!(MenuChoice::parse(" 6 "), Some(MenuChoice::DeleteWorksByAuthor));
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_exit_and_eof_end_the_loop() {
        let mut catalog = seeded();
        let out = run(&mut catalog, "0\n");
        assert_eq!(out.matches("Menu:").count(), 1);

        let out = run(&mut catalog, "");
        assert_eq!(out.matches("Menu:").count(), 1);
    }

    #[test]
    fn test_unrecognized_choice_reprints_menu() {
        let mut catalog = seeded();
        let out = run(&mut catalog, "9\n0\n");
        assert!(out.contains("Unrecognized choice '9'."));
        assert_eq!(out.matches("Menu:").count(), 2);
    }

    #[test]
    fn test_author_lookup() {
        let mut catalog = seeded();
        let out = run(&mut catalog, "2\n1\n2\n99\n0\n");
        assert!(out.contains("Author's name: Isaac Asimov"));
        assert!(out.contains("No author found with that ID."));
    }

    #[test]
    fn test_invalid_input_keeps_menu_running() {
        let mut catalog = seeded();
        let out = run(&mut catalog, "2\nabc\n3\n1900\n0\n");
        assert!(out.contains("Invalid author ID 'abc'"));
        assert!(out.contains("Les Misérables"));
    }

    #[test]
    fn test_type_style_rejects_bad_type_before_asking_style() {
        let mut catalog = seeded();
        let out = run(&mut catalog, "4\nx\n0\n");
        assert!(out.contains("Invalid type ID 'x'"));
        assert!(!out.contains("Enter the style ID"));
    }

    #[test]
    fn test_delete_copies_requires_yes() {
        let mut catalog = seeded();
        let out = run(&mut catalog, "5\n2000\nno\n0\n");
        assert!(out.contains("2 copies bought before 2000-01-01 (2 loan records) will be removed."));
        assert!(out.contains("Deletion cancelled."));
        let cutoff = validate::parse_cutoff_year("2000").unwrap();
        assert_eq!(catalog.count_copies_before(cutoff).unwrap(), 2);

        let out = run(&mut catalog, "5\n2000\nyes\n0\n");
        assert!(out.contains("(2 copies, 2 loans)"));
    }

    #[test]
    fn test_delete_copies_rejects_short_year() {
        let mut catalog = seeded();
        let out = run(&mut catalog, "5\n99\n0\n");
        assert!(out.contains("invalid year format"));
        assert!(!out.contains("Are you sure"));
    }

    #[test]
    fn test_query_error_keeps_connection_open() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let out = run(&mut catalog, "3\n1900\n2\n1\n0\n");
        assert_eq!(out.matches("SQL error").count(), 2);
        assert_eq!(out.matches("Menu:").count(), 3);
    }
}
