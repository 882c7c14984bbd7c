use console::{measure_text_width, style};

pub fn heading(text: &str) {
    println!("{}", style(text).bold().cyan());
}

pub fn info(text: &str) {
    println!("{}", text);
}

pub fn success(text: &str) {
    println!("{}", style(text).green());
}

pub fn warn(text: &str) {
    eprintln!("{}", style(text).yellow());
}

pub fn error(text: &str) {
    eprintln!("{}", style(text).red());
}

pub fn list_item(text: &str) {
    println!("  {} {}", style("-").dim(), text);
}

/// Prints rows as left-aligned columns, indented like list items.
pub fn table(rows: &[Vec<String>]) {
    for line in format_table(rows) {
        println!("  {}", line);
    }
}

/// Pads every cell but the last to the widest cell of its column.
///
/// Widths are measured without ANSI escapes, so styled cells line up.
pub fn format_table(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(measure_text_width(cell));
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (idx, cell) in row.iter().enumerate() {
                if idx + 1 == row.len() {
                    line.push_str(cell);
                } else {
                    line.push_str(cell);
                    let pad = widths[idx] - measure_text_width(cell);
                    line.push_str(&" ".repeat(pad + 2));
                }
            }
            line
        })
        .collect()
}
