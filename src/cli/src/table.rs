//! Scramble tables: CSV files with a header row followed by `id,scramble`
//! records. The cube size is the first character of the file name, so
//! `3-oll.csv` holds 3x3x3 scrambles.

use color_eyre::eyre::{OptionExt, WrapErr, eyre};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleTable {
    name: String,
    size: usize,
    records: Vec<(String, String)>,
}

impl ScrambleTable {
    pub fn load(path: &Path) -> color_eyre::Result<ScrambleTable> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_eyre("The scramble table needs a file name")?;
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read the scramble table {}", path.display()))?;
        ScrambleTable::parse(name, &text)
    }

    pub fn parse(name: &str, text: &str) -> color_eyre::Result<ScrambleTable> {
        let size = size_from_name(name)?;
        let records = parse_csv(text)?
            .into_iter()
            // Header
            .skip(1)
            .filter_map(|mut record| {
                if record.len() < 2 {
                    return None;
                }
                record.truncate(2);
                let scramble = record.pop()?;
                let id = record.pop()?;
                Some((id, scramble))
            })
            .collect();
        Ok(ScrambleTable {
            name: name.to_owned(),
            size,
            records,
        })
    }

    /// The file stem, which names the output directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The scramble of the first record with the given id.
    #[must_use]
    pub fn scramble(&self, id: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|(record_id, _)| record_id == id)
            .map(|(_, scramble)| scramble.as_str())
    }
}

fn size_from_name(name: &str) -> color_eyre::Result<usize> {
    name.chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .filter(|&size| size > 0)
        .map(|size| size as usize)
        .ok_or_else(|| {
            let message = format!(
                "Cannot read a cube size from the table name `{name}`, \
                 it must start with a digit such as `3-oll`"
            );
            eyre!(message)
        })
}

/// Split CSV text into records. Fields may be quoted, a quote inside a quoted
/// field is written twice, and quoted fields may span lines.
fn parse_csv(text: &str) -> color_eyre::Result<Vec<Vec<String>>> {
    let mut records = vec![];
    let mut record = vec![];
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (quoted, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => quoted = false,
            (true, c) => field.push(c),
            (false, '"') if field.is_empty() => quoted = true,
            (false, ',') => record.push(std::mem::take(&mut field)),
            (false, '\r') => {}
            (false, '\n') => {
                record.push(std::mem::take(&mut field));
                if record.iter().any(|field| !field.is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            (false, c) => field.push(c),
        }
    }

    if quoted {
        return Err(eyre!("Unterminated quoted field in the scramble table"));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
