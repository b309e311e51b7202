//! Console output of the reports.

use analysis::boxscore::TeamBoxScore;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub(crate) fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) if n.is_f64() => n.as_f64().map(|f| float2(&f)).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Flattens one level of nested objects, their keys become columns of their own.
fn columns(value: serde_json::Value) -> Vec<(String, serde_json::Value)> {
    let object = match value {
        serde_json::Value::Object(object) => object,
        other => return vec![(String::new(), other)],
    };

    let mut columns = Vec::with_capacity(object.len());
    for (key, value) in object {
        match value {
            serde_json::Value::Object(nested) => columns.extend(nested),
            value => columns.push((key, value)),
        }
    }
    columns
}

/// A table with one line per row and one column per serialized field.
///
/// Columns missing in some rows stay empty, floats are shown with two decimals.
pub fn records_table<T: Serialize>(rows: &[T]) -> Result<String, serde_json::Error> {
    let rows: Vec<Vec<(String, serde_json::Value)>> = rows
        .iter()
        .map(|r| serde_json::to_value(r).map(columns))
        .collect::<Result<_, _>>()?;

    let mut header: Vec<String> = Vec::new();
    for (key, _) in rows.iter().flatten() {
        if !header.contains(key) {
            header.push(key.clone());
        }
    }

    let mut builder = Builder::default();
    builder.push_record(header.clone());
    for row in &rows {
        builder.push_record(header.iter().map(|column| {
            row.iter()
                .find(|(key, _)| key == column)
                .map(|(_, value)| cell(value))
                .unwrap_or_default()
        }));
    }

    Ok(builder.build().with(Style::psql()).to_string())
}

/// The transposed team box score, one column per team.
pub fn team_table(score: &TeamBoxScore) -> String {
    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    header.extend(score.team_names().into_iter().map(str::to_owned));
    builder.push_record(header);

    for row in score.stat_rows() {
        let mut record = vec![row.stat];
        record.extend(row.values.iter().map(ToString::to_string));
        builder.push_record(record);
    }

    builder.build().with(Style::psql()).to_string()
}

pub fn table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        kills: usize,
        adr: f64,
        nested: std::collections::BTreeMap<&'static str, usize>,
    }

    #[test]
    fn records() {
        let rows = [
            Row {
                name: "a1",
                kills: 3,
                adr: 81.254,
                nested: [("Full Buy", 2)].into_iter().collect(),
            },
            Row {
                name: "a2",
                kills: 1,
                adr: 12.0,
                nested: Default::default(),
            },
        ];

        let table = records_table(&rows).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(4, lines.len());
        assert!(lines[0].contains("name") && lines[0].contains("Full Buy"));
        assert!(lines[2].contains("81.25"));
        assert!(lines[3].contains("12.00"));
    }
}
