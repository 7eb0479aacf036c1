use client_core::ClientState;
use shared::protocol::{table_columns, NoticeLevel};

/// Plain-text table with a leading row-index column used by `--row`.
pub fn render_table(state: &ClientState) -> String {
    let mut header = vec!["#".to_string()];
    header.extend(table_columns().into_iter().map(|column| column.name));

    let rows: Vec<Vec<String>> = state
        .rows()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            vec![
                index.to_string(),
                record.id.to_string(),
                record.name.clone(),
                record.year.to_string(),
                record.duration_minutes.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str("(no movies)\n");
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

pub fn notice_line(state: &ClientState) -> Option<String> {
    state.notice().map(|notice| {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        format!("[{tag}] {}", notice.message)
    })
}

#[cfg(test)]
mod tests {
    use shared::{
        domain::{MovieId, MovieRecord},
        protocol::Notice,
    };

    use super::*;

    #[test]
    fn renders_header_and_aligned_rows() {
        let state = ClientState::from_fetch(vec![
            MovieRecord {
                id: MovieId(12),
                name: "Speed".to_string(),
                year: 1994,
                duration_minutes: 116,
            },
            MovieRecord {
                id: MovieId(3),
                name: "Nueva Película".to_string(),
                year: 2025,
                duration_minutes: 100,
            },
        ]);

        let rendered = render_table(&state);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("# | ID | Nombre"));
        assert!(lines[0].ends_with("Duración (min)"));
        assert!(lines[2].starts_with("0 | 12 | Speed          | 1994"));
        assert!(lines[3].starts_with("1 | 3  | Nueva Película | 2025"));
    }

    #[test]
    fn empty_table_says_so() {
        let rendered = render_table(&ClientState::new());
        assert!(rendered.ends_with("(no movies)\n"));
    }

    #[test]
    fn notice_line_tags_level() {
        let state = ClientState::new().with_notice(Notice::warning("not confirmed"));
        assert_eq!(
            notice_line(&state).as_deref(),
            Some("[warning] not confirmed")
        );
        assert_eq!(notice_line(&ClientState::new()), None);
    }
}
