//! Table-mode output

use std::iter::once;

use crate::{format_num, Value};

type Grid<T = char> = Vec<Vec<T>>;

pub trait GridFmt {
    fn fmt_grid(&self) -> Grid;
    fn grid_string(&self) -> String {
        self.fmt_grid()
            .into_iter()
            .flat_map(|v| v.into_iter().chain(once('\n')))
            .collect()
    }
}

/// Sequences of depth 1 are rows and sequences of depth 2 are tables with
/// aligned columns. Deeper sequences separate their cells with blank lines.
impl GridFmt for Value {
    fn fmt_grid(&self) -> Grid {
        let mut grid = Grid::new();
        fmt_value(self, None, &mut grid);
        grid
    }
}

fn fmt_value(value: &Value, widths: Option<&[usize]>, grid: &mut Grid) {
    let cells = value.as_seq().unwrap_or_default();
    match value.depth() {
        0 => grid.push(cell_text(value).chars().collect()),
        1 if cells.is_empty() => grid.push("[]".chars().collect()),
        1 => grid.push(fmt_row(cells, widths)),
        depth => {
            let widths_here;
            let widths = if depth == 2 {
                widths_here = column_widths(cells);
                Some(widths_here.as_slice())
            } else {
                widths
            };
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    grid.extend((2..depth).map(|_| Vec::new()));
                }
                fmt_value(cell, widths, grid);
            }
        }
    }
}

/// Cells separated by spaces, except between characters
fn fmt_row(cells: &[Value], widths: Option<&[usize]>) -> Vec<char> {
    let mut row = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        let is_char = matches!(cell, Value::Char(_));
        if i > 0 && !(is_char && matches!(cells[i - 1], Value::Char(_))) {
            row.push(' ');
        }
        let text = cell_text(cell);
        let width = widths.and_then(|w| w.get(i)).copied().unwrap_or(0);
        let pad = width.saturating_sub(text.chars().count());
        if is_char {
            row.extend(text.chars().chain((0..pad).map(|_| ' ')));
        } else {
            row.extend((0..pad).map(|_| ' ').chain(text.chars()));
        }
    }
    row
}

fn column_widths(rows: &[Value]) -> Vec<usize> {
    let columns = rows.iter().map(Value::len).max().unwrap_or(0);
    (0..columns)
        .map(|col| {
            (rows.iter())
                .map(|row| match row.as_seq().and_then(|cells| cells.get(col)) {
                    Some(cell) => cell_text(cell).chars().count(),
                    None => 1,
                })
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Num(n) => format_num(*n),
        Value::Char(c) => c.to_string(),
        Value::Seq(_) => value.to_string(),
    }
}
