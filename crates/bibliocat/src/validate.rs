//! Parsing of operator input.
//!
//! Every value typed at the menu or passed on the command line goes through
//! this module before it reaches a query, so all operations reject malformed
//! input the same way.

use crate::models::{AuthorId, CutoffYear, StyleId, TypeId, Year, YearRange};
use crate::{Error, Result};

fn digits<'a>(field: &'static str, input: &'a str) -> Result<&'a str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, input, "a value is required"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            field,
            input,
            "please enter a valid number",
        ));
    }
    Ok(trimmed)
}

fn parse_i64(field: &'static str, input: &str) -> Result<i64> {
    digits(field, input)?
        .parse::<i64>()
        .map_err(|_| Error::validation(field, input, "number is too large"))
}

pub fn parse_author_id(input: &str) -> Result<AuthorId> {
    parse_i64("author ID", input).map(AuthorId)
}

pub fn parse_type_id(input: &str) -> Result<TypeId> {
    parse_i64("type ID", input).map(TypeId)
}

pub fn parse_style_id(input: &str) -> Result<StyleId> {
    parse_i64("style ID", input).map(StyleId)
}

pub fn parse_year(field: &'static str, input: &str) -> Result<Year> {
    digits(field, input)?
        .parse::<i32>()
        .map(Year)
        .map_err(|_| Error::validation(field, input, "number is too large"))
}

/// Both bounds are inclusive. A reversed range is accepted and matches nothing.
pub fn parse_year_range(from: &str, to: &str) -> Result<YearRange> {
    Ok(YearRange {
        from: parse_year("year 1", from)?,
        to: parse_year("year 2", to)?,
    })
}

/// Exactly four digits, e.g. `1999`.
pub fn parse_cutoff_year(input: &str) -> Result<CutoffYear> {
    const FIELD: &str = "year";
    let value = input.trim();
    if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            FIELD,
            input,
            "invalid year format, please enter a valid year in YYYY format",
        ));
    }
    let year = value
        .parse::<i32>()
        .map_err(|_| Error::validation(FIELD, input, "invalid year format"))?;
    CutoffYear::new(year).ok_or_else(|| Error::validation(FIELD, input, "year out of range"))
}

/// Only an explicit `yes` (any case) confirms a destructive operation.
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_author_id() {
        assert_eq!(parse_author_id("42").unwrap(), AuthorId(42));
        assert_eq!(parse_author_id("  7\n").unwrap(), AuthorId(7));
        assert!(matches!(
            parse_author_id("abc"),
            Err(Error::Validation { field: "author ID", .. })
        ));
        assert!(parse_author_id("").is_err());
        assert!(parse_author_id("-3").is_err());
        assert!(parse_author_id("1.5").is_err());
        assert!(parse_author_id("99999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_year_range() {
        let range = parse_year_range("1900", "1950").unwrap();
        assert_eq!(range.from, Year(1900));
        assert_eq!(range.to, Year(1950));

        assert!(matches!(
            parse_year_range("1900", "19x0"),
            Err(Error::Validation { field: "year 2", .. })
        ));
    }

    #[test]
    fn test_parse_cutoff_year() {
        assert_eq!(parse_cutoff_year("1999").unwrap().year(), 1999);
        assert_eq!(parse_cutoff_year(" 2001 ").unwrap().as_sql_date(), "2001-01-01");
        assert!(parse_cutoff_year("99").is_err());
        assert!(parse_cutoff_year("19a9").is_err());
        assert!(parse_cutoff_year("20000").is_err());
        assert!(parse_cutoff_year("").is_err());
    }

    #[test]
    fn test_is_confirmed() {
        assert!(is_confirmed("yes"));
        assert!(is_confirmed("YES\n"));
        assert!(is_confirmed(" Yes "));
        assert!(!is_confirmed("y"));
        assert!(!is_confirmed("no"));
        assert!(!is_confirmed(""));
    }
}
