/// Left-aligned text table. Column widths follow the widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().take(columns).enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.to_vec()));
    let separators: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push(line(separators.iter().map(String::as_str).collect()));
    for row in rows {
        let cells: Vec<&str> = (0..columns)
            .map(|index| row.get(index).map(String::as_str).unwrap_or(""))
            .collect();
        out.push(line(cells));
    }
    out.join("\n")
}

/// Cuts `value` to `max` characters, marking the cut with `...`.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let table = render_table(
            &["ID", "NAME"],
            &[
                vec!["1".to_string(), "Acme".to_string()],
                vec!["100".to_string(), "B".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID   NAME");
        assert_eq!(lines[1], "---  ----");
        assert_eq!(lines[2], "1    Acme");
        assert_eq!(lines[3], "100  B");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("https://example.com/long", 10), "https:/...");
        assert_eq!(truncate("short", 10), "short");
    }
}
