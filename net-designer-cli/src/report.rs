use itertools::Itertools;
use net_designer::{ArchitectureBuilder, ShapeEntry};
use termion::color;

fn highlight(text: &str, tty: bool) -> String {
    if tty {
        format!(
            "{}{text}{}",
            color::Fg(color::Yellow),
            color::Fg(color::Reset)
        )
    } else {
        text.to_string()
    }
}

/// Shape history, one line per entry, with flagged layers highlighted.
pub fn summary_lines(builder: &ArchitectureBuilder, tty: bool) -> Vec<String> {
    let setters = builder.shapes().len() - builder.layers().len();
    let mut lines = vec!["==> Shapes:".to_string(), "=".repeat(24)];

    for (position, entry) in builder.shapes().entries().iter().enumerate() {
        let line = match position.checked_sub(setters) {
            None => format!("input      {entry}"),
            Some(index) => {
                let layer = &builder.layers()[index];
                let block = &builder.blocks()[layer.block].name;
                format!("{block}[{index}] {:<8} {entry}", layer.kind.name())
            }
        };
        let flagged = matches!(entry, ShapeEntry::Complete(record) if !record.is_integral());
        lines.push(if flagged { highlight(&line, tty) } else { line });
    }

    lines.push("=".repeat(24));
    if !builder.warnings().is_empty() {
        lines.extend(
            builder
                .warnings()
                .iter()
                .map(|warning| highlight(&format!("WARNING: {warning}"), tty)),
        );
    }
    lines
}

pub fn print_summary(builder: &ArchitectureBuilder) {
    let tty = termion::is_tty(&std::io::stdout());
    println!("{}", summary_lines(builder, tty).into_iter().join("\n"));
    println!();
}
