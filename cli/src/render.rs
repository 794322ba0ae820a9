use std::fmt::Write;

use quizboard_core::{BoardFrame, RoundPhase};

const MIN_COLUMN_WIDTH: usize = 6;

/// Draws the frame as a plain text table followed by status lines and the question dialog.
pub(crate) fn render_text(frame: &BoardFrame) -> String {
    let widths: Vec<usize> = frame
        .categories
        .iter()
        .map(|category| {
            let heading = format!("{} {}", category.id, category.name);
            heading.chars().count().max(MIN_COLUMN_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let headings = frame
        .categories
        .iter()
        .zip(&widths)
        .map(|(category, &width)| pad(&format!("{} {}", category.id, category.name), width));
    push_row(&mut out, headings);

    let rule = widths.iter().map(|&width| "-".repeat(width));
    push_row(&mut out, rule);

    for row in &frame.rows {
        let cells = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad(&cell.label(), width));
        push_row(&mut out, cells);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Score: ${}", frame.score);
    if frame.loading {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(error) = &frame.error {
        let _ = writeln!(out, "! {}", error);
    }

    if let Some(modal) = &frame.modal {
        let _ = writeln!(out);
        let _ = writeln!(out, "Value: ${}", modal.value);
        let _ = writeln!(out, "{}", modal.text);
        match (&modal.answer, frame.phase) {
            (Some(answer), _) => {
                let _ = writeln!(out, "Answer: {}", answer);
                let _ = writeln!(out, "[correct] [incorrect]");
            }
            (None, RoundPhase::AwaitingReveal) => {
                let _ = writeln!(out, "[reveal]");
            }
            (None, _) => {}
        }
    }

    out
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let line = cells.collect::<Vec<_>>().join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}
