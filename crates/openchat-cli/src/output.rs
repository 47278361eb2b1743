use serde::Serialize;
use serde_json::Value;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// Plain text of a JSON field, empty when absent.
pub fn field(value: &Value, key: &str) -> String {
    match &value[key] {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Print a JSON array of objects as a table of `columns`.
pub fn print_rows(value: &Value, headers: &[&str], columns: &[&str]) {
    let rows = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| columns.iter().map(|c| field(item, c)).collect())
                .collect()
        })
        .unwrap_or_default();
    print_table(headers, rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_renders_strings_numbers_and_missing() {
        let v = json!({ "text": "hi", "likes": 2 });
        assert_eq!(field(&v, "text"), "hi");
        assert_eq!(field(&v, "likes"), "2");
        assert_eq!(field(&v, "missing"), "");
    }
}
