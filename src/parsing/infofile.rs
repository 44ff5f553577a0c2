use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

use crate::core::types::BookId;

/// Maximum number of data rows in one info file (DOS protection)
pub const MAX_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum InfofileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid info file format on line {line}: {message}")]
    InvalidFormat { line: usize, message: String },

    #[error("Too many rows: {0} exceeds maximum allowed ({MAX_ROWS})")]
    TooManyRows(usize),
}

/// Parse an info file from disk
///
/// # Errors
///
/// Returns `InfofileError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_infofile(path: &Path) -> Result<Vec<Vec<String>>, InfofileError> {
    let content = std::fs::read_to_string(path)?;
    parse_infofile_text(&content)
}

/// Parse info file text into rows of trimmed fields.
///
/// Columns are separated by `;`, `#` starts a comment, and both can be escaped
/// with a backslash. Blank and comment-only lines are skipped. Every row must
/// have as many columns as the first one.
///
/// # Errors
///
/// Returns `InfofileError::InvalidFormat` if a row's column count differs from
/// the first row's, or `InfofileError::TooManyRows` if the limit is exceeded.
pub fn parse_infofile_text(text: &str) -> Result<Vec<Vec<String>>, InfofileError> {
    let mut rows: Vec<Vec<String>> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let Some(fields) = parse_row(line) else {
            continue;
        };

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if let Some(first) = rows.first() {
            if fields.len() != first.len() {
                return Err(InfofileError::InvalidFormat {
                    line: line_num,
                    message: format!(
                        "mismatched number of columns {} instead of {}",
                        fields.len(),
                        first.len()
                    ),
                });
            }
        }

        if rows.len() >= MAX_ROWS {
            return Err(InfofileError::TooManyRows(rows.len() + 1));
        }

        rows.push(fields);
    }

    Ok(rows)
}

/// Parse a keyed info file from disk, see [`parse_dict_infofile_text`]
///
/// # Errors
///
/// Returns `InfofileError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_dict_infofile(path: &Path) -> Result<Vec<IndexMap<String, String>>, InfofileError> {
    let content = std::fs::read_to_string(path)?;
    parse_dict_infofile_text(&content)
}

/// Parse a keyed info file into one record per data row.
///
/// The file must start with `+`, followed by the header row naming the keys:
///
/// ```text
/// +int; numeral
/// 0; zero
/// 1; one
/// ```
///
/// Records keep the header's key order.
///
/// # Errors
///
/// Returns `InfofileError::InvalidFormat` if the leading `+` or the header row
/// is missing, or any error from [`parse_infofile_text`].
pub fn parse_dict_infofile_text(
    text: &str,
) -> Result<Vec<IndexMap<String, String>>, InfofileError> {
    let Some(body) = text.strip_prefix('+') else {
        return Err(InfofileError::InvalidFormat {
            line: 1,
            message: "not a keyed info file, it must start with '+'".to_string(),
        });
    };

    let mut rows = parse_infofile_text(body)?.into_iter();
    let keys = rows.next().ok_or_else(|| InfofileError::InvalidFormat {
        line: 1,
        message: "missing header row".to_string(),
    })?;

    Ok(rows
        .map(|row| keys.iter().cloned().zip(row).collect())
        .collect())
}

/// Split one line into fields; `None` for blank or comment-only lines
fn parse_row(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek().copied(), Some(';' | '#')) => {
                current.extend(chars.next());
            }
            ';' => fields.push(std::mem::take(&mut current)),
            '#' => break,
            _ => current.push(c),
        }
    }
    fields.push(current);

    let fields: Vec<String> = fields.into_iter().map(|f| f.trim().to_string()).collect();
    if fields.len() == 1 && fields[0].is_empty() {
        return None;
    }
    Some(fields)
}

/// Parse a `.canon` file: one book id per row, in canonical order
///
/// # Errors
///
/// Returns `InfofileError::InvalidFormat` if rows have more than one column,
/// or any error from [`parse_infofile_text`].
pub fn parse_canon_text(text: &str) -> Result<Vec<BookId>, InfofileError> {
    let rows = parse_infofile_text(text)?;
    if let Some(first) = rows.first() {
        if first.len() != 1 {
            return Err(InfofileError::InvalidFormat {
                line: first_data_line(text),
                message: format!("canon files have 1 column, found {}", first.len()),
            });
        }
    }
    Ok(rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .map(BookId::new)
        .collect())
}

/// Parse a `.names` file: rows of `book id; display name`
///
/// # Errors
///
/// Returns `InfofileError::InvalidFormat` if rows do not have exactly two
/// columns, or any error from [`parse_infofile_text`].
pub fn parse_names_text(text: &str) -> Result<Vec<(BookId, String)>, InfofileError> {
    let rows = parse_infofile_text(text)?;
    if let Some(first) = rows.first() {
        if first.len() != 2 {
            return Err(InfofileError::InvalidFormat {
                line: first_data_line(text),
                message: format!("names files have 2 columns, found {}", first.len()),
            });
        }
    }
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let mut fields = row.into_iter();
            Some((BookId::new(fields.next()?), fields.next()?))
        })
        .collect())
}

fn first_data_line(text: &str) -> usize {
    text.lines()
        .position(|line| parse_row(line).is_some())
        .map_or(0, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_infofile_text() {
        let text = "Erstens; Zweitens; Drittens\n2.1;2.2;2.3\n";
        let rows = parse_infofile_text(text).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["Erstens", "Zweitens", "Drittens"],
                vec!["2.1", "2.2", "2.3"],
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = r"# Leading comment

Gn # Genesis
   # indented comment
Ex
";
        let rows = parse_infofile_text(text).unwrap();
        assert_eq!(rows, vec![vec!["Gn"], vec!["Ex"]]);
    }

    #[test]
    fn test_empty_fields() {
        let rows = parse_infofile_text(";\n").unwrap();
        assert_eq!(rows, vec![vec!["", ""]]);
    }

    #[test]
    fn test_quoting() {
        let text = r"Eins; Zwei; Dies \; ist ein Semikolon und \n dies \# ein Nummernkreuz
1; 2; 3
";
        let rows = parse_infofile_text(text).unwrap();
        assert_eq!(
            rows[0][2],
            r"Dies ; ist ein Semikolon und \n dies # ein Nummernkreuz"
        );
        assert_eq!(rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_unicode() {
        let rows = parse_infofile_text("λογός σάρχ ἐγένετο; üäöÜÄÖüäö\n").unwrap();
        assert_eq!(rows, vec![vec!["λογός σάρχ ἐγένετο", "üäöÜÄÖüäö"]]);
    }

    #[test]
    fn test_mismatched_columns() {
        let err = parse_infofile_text("a; b\n\nc\n").unwrap_err();
        match err {
            InfofileError::InvalidFormat { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mapping() {
        let text = r"+int; numeral
# Cardinal numbers
0; zero
1; one
2; two
3; three
4; four
5; five
";
        let records = parse_dict_infofile_text(text).unwrap();
        let numerals = ["zero", "one", "two", "three", "four", "five"];
        assert_eq!(records.len(), numerals.len());
        for (i, (record, numeral)) in records.iter().zip(numerals).enumerate() {
            let expected: IndexMap<String, String> = [
                ("int".to_string(), i.to_string()),
                ("numeral".to_string(), numeral.to_string()),
            ]
            .into_iter()
            .collect();
            assert_eq!(record, &expected);
        }

        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["int", "numeral"]);
    }

    #[test]
    fn test_mapping_requires_plus() {
        assert!(matches!(
            parse_dict_infofile_text("int; numeral\n0; zero\n"),
            Err(InfofileError::InvalidFormat { line: 1, .. })
        ));
        assert!(matches!(
            parse_dict_infofile_text("+"),
            Err(InfofileError::InvalidFormat { line: 1, .. })
        ));
        assert!(parse_dict_infofile_text("+int; numeral\n").unwrap().is_empty());

        // Rows still need the header's column count
        assert!(matches!(
            parse_dict_infofile_text("+int; numeral\n0\n"),
            Err(InfofileError::InvalidFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_dict_infofile_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.info");
        std::fs::write(&path, "+id; name\nGn; Genesis\n").unwrap();

        let records = parse_dict_infofile(&path).unwrap();
        assert_eq!(records[0]["id"], "Gn");
        assert_eq!(records[0]["name"], "Genesis");
    }

    #[test]
    fn test_parse_canon_text() {
        let ids = parse_canon_text("# order\nGn\nEx\nLv\n").unwrap();
        assert_eq!(ids, vec![BookId::new("Gn"), BookId::new("Ex"), BookId::new("Lv")]);

        assert!(matches!(
            parse_canon_text("# order\nGn; Genesis\n"),
            Err(InfofileError::InvalidFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_names_text() {
        let names = parse_names_text("Gn; 1. Mose\n1Cor; 1. Korinther\n").unwrap();
        assert_eq!(names[0], (BookId::new("Gn"), "1. Mose".to_string()));
        assert_eq!(names[1], (BookId::new("1Cor"), "1. Korinther".to_string()));

        assert!(parse_names_text("Gn\n").is_err());
    }

    #[test]
    fn test_parse_infofile_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mini.canon");
        std::fs::write(&path, "Mt\nMk\n").unwrap();

        let rows = parse_infofile(&path).unwrap();
        assert_eq!(rows.len(), 2);

        assert!(matches!(
            parse_infofile(&dir.path().join("missing.canon")),
            Err(InfofileError::Io(_))
        ));
    }
}
