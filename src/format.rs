// format.rs

use crate::row::Row;

/// Renders rows as an ASCII box table. Column headers come from the first row.
///
/// ```text
/// +----+-------+-----+
/// | ID | name  | age |
/// +----+-------+-----+
/// | 1  | Alice | 30  |
/// +----+-------+-----+
/// ```
pub fn render_table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&str> = first.columns().collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h).map(|v| v.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let separator = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{separator}+");

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(separator.clone());
    out.push(render_line(&headers, &widths));
    out.push(separator.clone());
    for row in &cells {
        out.push(render_line(row, &widths));
    }
    out.push(separator);
    out.join("\n")
}

fn render_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let inner = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!(" {:<width$} ", c.as_ref(), width = w))
        .collect::<Vec<_>>()
        .join("|");
    format!("|{inner}|")
}
