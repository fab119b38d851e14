//! Comma-separated record reading and field escaping.
//!
//! Double-quoted fields may contain commas, line breaks and `""` escapes,
//! so one record can span several lines. Surrounding whitespace is trimmed
//! from unquoted fields; blank lines produce no record.

/// One parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// One-based line the record starts on.
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split `text` into records.
pub fn read_records(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut start = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() && !quoted => {
                field.clear();
                in_quotes = true;
                quoted = true;
            }
            '\n' if in_quotes => {
                field.push(c);
                line += 1;
            }
            '\n' => {
                fields.push(finish(&mut field, quoted));
                quoted = false;
                push_record(&mut records, start, std::mem::take(&mut fields));
                line += 1;
                start = line;
            }
            '\r' if !in_quotes => {}
            ',' if !in_quotes => {
                fields.push(finish(&mut field, quoted));
                quoted = false;
            }
            _ => field.push(c),
        }
    }
    fields.push(finish(&mut field, quoted));
    push_record(&mut records, start, fields);
    records
}

fn finish(field: &mut String, quoted: bool) -> String {
    let value = std::mem::take(field);
    if quoted {
        value
    } else {
        value.trim().to_string()
    }
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].is_empty();
    if !blank {
        records.push(Record { line, fields });
    }
}

/// Quote a field unless it reads back unchanged as a bare field.
pub fn escape_field(value: &str) -> String {
    let needs_quotes = value.contains([',', '"', '\n', '\r']) || value.trim() != value;
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Join fields into one escaped record (no trailing newline).
pub fn join_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
