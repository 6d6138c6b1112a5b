pub const COLUMN_WIDTH: usize = 12;
const SEPARATOR: &str = " | ";

/// Greedy word wrap. Words longer than `width` are split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        if line.is_empty() {
            line = word;
        } else if line.chars().count() + 1 + word.chars().count() <= width {
            line.push(' ');
            line.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut line, word));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn add_thousands_separator(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().rev().collect();
    chars
        .chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Whole-unit amount with thousands separators, e.g. `-1,234,568`.
pub fn format_amount(amount: f64) -> String {
    let s = format!("{:.0}", amount);
    match s.strip_prefix('-') {
        Some(digits) => format!("-{}", add_thousands_separator(digits)),
        None if amount.is_finite() => add_thousands_separator(&s),
        None => s,
    }
}

/// A fraction as a percentage with up to four decimals, e.g. `30.0%`.
pub fn format_percent(fraction: f64) -> String {
    let s = format!("{:.4}", fraction * 100.);
    if !s.contains('.') {
        return format!("{}%", s);
    }
    let trimmed = s.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0%", trimmed)
    } else {
        format!("{}%", trimmed)
    }
}

/// Renders `columns` under `titles` as a fixed-width, pipe-delimited table.
///
/// Titles wrap onto as many header lines as the longest one needs. Rows stop
/// at the shortest column.
pub fn format_table(titles: &[&str], columns: &[Vec<f64>]) -> String {
    let wrapped: Vec<Vec<String>> = titles.iter().map(|t| wrap(t, COLUMN_WIDTH)).collect();
    let header_lines = wrapped.iter().map(Vec::len).max().unwrap_or(0);

    let mut lines: Vec<String> = (0..header_lines)
        .map(|i| {
            wrapped
                .iter()
                .map(|title| {
                    let part = title.get(i).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", part, width = COLUMN_WIDTH)
                })
                .collect::<Vec<String>>()
                .join(SEPARATOR)
        })
        .collect();

    let rule = "=".repeat(lines.last().map(|l| l.chars().count()).unwrap_or(0));
    lines.insert(0, rule.clone());
    lines.push(rule);

    let row_count = columns.iter().map(Vec::len).min().unwrap_or(0);
    for row in 0..row_count {
        lines.push(
            columns
                .iter()
                .map(|column| format!("{:>width$}", format_amount(column[row]), width = COLUMN_WIDTH))
                .collect::<Vec<String>>()
                .join(SEPARATOR),
        );
    }
    lines.join("\n")
}

pub fn format_summary(house_price: f64, downpayment: f64, fraction: f64, payment: f64) -> String {
    format!(
        "House price: {}\nDownpayment: {} ({})\nMonthly payment: {}",
        format_amount(house_price),
        format_amount(downpayment),
        format_percent(fraction),
        format_amount(payment)
    )
}
