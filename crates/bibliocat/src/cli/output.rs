use crate::models::WorkSummary;
use crate::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Jsonl,
    Csv,
}

/// Column order of a work listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkLayout {
    /// ID, Year, Title
    YearFirst,
    /// ID, Title, Year
    TitleFirst,
}

pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn write_works(&mut self, works: &[WorkSummary], layout: WorkLayout) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if works.is_empty() {
                    self.writeln("No works found.")?;
                } else {
                    self.write_table(works_table(works, layout))?;
                    self.writeln(&format!("Total: {} works", works.len()))?;
                }
            }
            OutputFormat::Json => self.write_json(&works)?,
            OutputFormat::Jsonl => {
                for work in works {
                    self.write_json(work)?;
                }
            }
            OutputFormat::Csv => {
                let mut csv = csv::Writer::from_writer(&mut self.writer);
                for work in works {
                    csv.serialize(work)?;
                }
                csv.flush()?;
            }
        }
        Ok(())
    }

    /// Write a single result: `text` in table mode, `value` as JSON otherwise.
    pub fn write_record<T: Serialize>(&mut self, value: &T, text: &str) -> Result<()> {
        match self.format {
            OutputFormat::Table => self.writeln(text),
            OutputFormat::Json | OutputFormat::Jsonl => self.write_json(value),
            OutputFormat::Csv => {
                let mut csv = csv::Writer::from_writer(&mut self.writer);
                csv.serialize(value)?;
                csv.flush()?;
                Ok(())
            }
        }
    }

    pub fn write_json<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<()> {
        let json = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            _ => serde_json::to_string(data)?,
        };
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn write_table(&mut self, table: Table) -> Result<()> {
        writeln!(self.writer, "{}", table)?;
        Ok(())
    }

    pub fn writeln(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }
}

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn works_table(works: &[WorkSummary], layout: WorkLayout) -> Table {
    let mut table = create_table();
    match layout {
        WorkLayout::YearFirst => table.set_header(vec!["ID", "Year", "Title"]),
        WorkLayout::TitleFirst => table.set_header(vec!["ID", "Title", "Year"]),
    };

    for work in works {
        let title = Cell::new(&work.title);
        let row = match layout {
            WorkLayout::YearFirst => vec![Cell::new(work.id), Cell::new(work.year), title],
            WorkLayout::TitleFirst => vec![Cell::new(work.id), title, Cell::new(work.year)],
        };
        table.add_row(row);
    }
    table
}
