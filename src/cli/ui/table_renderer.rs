use crate::cli::output::current_preferences;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Specifies the configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(mut self) -> Self {
        self.alignment = Alignment::Right;
        self
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Represents a table with column metadata and rows of data to render.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            padding: 1,
        }
    }

    /// Table for a resource listing: the `Cod` column is right-aligned and
    /// free-text columns are capped.
    pub fn for_listing(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        let columns = headers
            .iter()
            .map(|header| match *header {
                "Cod" => TableColumn::new(*header).right(),
                _ => TableColumn::new(*header).max_width(32),
            })
            .collect();
        Self::new(columns, rows)
    }

    /// Content width of each column: the widest of header and cells,
    /// clamped to the column's maximum.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cells = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| visible_width(cell));
                let width = cells.fold(visible_width(&column.header), usize::max);
                match column.max_width {
                    Some(max) => width.min(max),
                    None => width,
                }
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect::<Vec<_>>()
            .join("|")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_row(&header, &widths));
        lines.push(horizontal_rule(&widths, self.padding));
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

pub fn visible_width(text: &str) -> usize {
    text.chars().count()
}

fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let ellipsis = if current_preferences().plain_mode {
        '~'
    } else {
        '…'
    };
    let mut fitted: String = text.chars().take(width - 1).collect();
    fitted.push(ellipsis);
    fitted
}

/// Renders a single cell with padding and alignment applied.
pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));
    let pad = " ".repeat(padding);
    match alignment {
        Alignment::Left => format!("{pad}{fitted}{}{pad}", " ".repeat(remaining)),
        Alignment::Right => format!("{pad}{}{fitted}{pad}", " ".repeat(remaining)),
    }
}

/// Builds a horizontal rule that spans the width of the table.
pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let (line, joint) = if current_preferences().plain_mode {
        ('-', '+')
    } else {
        ('─', '┼')
    };
    widths
        .iter()
        .map(|width| line.to_string().repeat(width + padding * 2))
        .collect::<Vec<_>>()
        .join(&joint.to_string())
}
