use gantt_core::timeline::BarGeometry;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
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

/// Draw a bar `cols` characters wide. Undated rows get an empty track.
pub fn render_bar(geometry: Option<&BarGeometry>, cols: usize) -> String {
    let Some(g) = geometry.filter(|_| cols > 0) else {
        return ".".repeat(cols);
    };
    let scale = cols as f64 / 100.0;
    let start = ((g.left_percent * scale).round() as usize).min(cols.saturating_sub(1));
    let len = ((g.width_percent * scale).round() as usize).clamp(1, cols - start);
    format!(
        "{}{}{}",
        ".".repeat(start),
        "#".repeat(len),
        ".".repeat(cols - start - len)
    )
}

/// `YYYY-MM-DD`, or `-` when absent.
pub fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_covers_its_share_of_track() {
        let g = BarGeometry {
            left_percent: 50.0,
            width_percent: 25.0,
        };
        assert_eq!(render_bar(Some(&g), 8), "....##..");
    }

    #[test]
    fn narrow_bar_is_at_least_one_cell() {
        let g = BarGeometry {
            left_percent: 98.0,
            width_percent: 2.0,
        };
        let bar = render_bar(Some(&g), 10);
        assert_eq!(bar.len(), 10);
        assert!(bar.ends_with('#'));
    }

    #[test]
    fn undated_row_has_empty_track() {
        assert_eq!(render_bar(None, 4), "....");
    }
}
