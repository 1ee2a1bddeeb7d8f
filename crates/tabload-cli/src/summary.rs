use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabload_model::{Action, DataArray, Warning};

use crate::types::{ImportResult, InferResult, ValidateResult};

/// Longest cell text shown for sample values.
const SAMPLE_WIDTH: usize = 24;

pub fn print_preview(lines: &[(usize, String)]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Line"), header_cell("Text")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (number, text) in lines {
        table.add_row(vec![dim_cell(number), Cell::new(text)]);
    }
    println!("{table}");
}

pub fn print_inferred(result: &InferResult) {
    println!("Sampled rows: {}", result.sampled_rows);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, (header, scalar_type)) in result.headers.iter().zip(&result.types).enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(header),
            type_cell(scalar_type),
        ]);
    }
    println!("{table}");
    let tags: Vec<&str> = result.types.iter().map(|t| t.as_str()).collect();
    println!("--types {}", tags.join(","));
}

pub fn print_plan(result: &ValidateResult) {
    println!("File: {}", result.config.input_file_path.display());
    println!("Group: {}", result.group);
    println!(
        "Rows: {} (lines {}..={})",
        result.preflight.tuple_count(),
        result.config.start_import_row,
        result.config.start_import_row + result.preflight.tuple_count().saturating_sub(1)
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Action"),
        header_cell("Path"),
        header_cell("Type"),
        header_cell("Tuple dims"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for (index, action) in result.preflight.actions.iter().enumerate() {
        let (kind, scalar_type, tuple_dims) = match action {
            Action::CreateGroup { tuple_dims, .. } => ("create group", None, tuple_dims),
            Action::CreateArray {
                scalar_type,
                tuple_dims,
                ..
            } => ("create array", Some(scalar_type), tuple_dims),
        };
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(kind),
            Cell::new(action.path()),
            scalar_type.map_or_else(|| dim_cell("-"), type_cell),
            Cell::new(format!("{tuple_dims:?}")),
        ]);
    }
    println!("{table}");
    print_warnings(&result.preflight.warnings);
}

pub fn print_import_summary(result: &ImportResult) {
    let outcome = &result.report.outcome;
    println!("File: {}", result.config.input_file_path.display());
    println!("Group: {}", result.group);
    println!(
        "Rows: {} of {} in {:.2?}",
        outcome.rows_imported, outcome.rows_expected, result.elapsed
    );
    if outcome.cancelled {
        println!("Import was cancelled; remaining rows were not read.");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Array"),
        header_cell("Type"),
        header_cell("Values"),
        header_cell("First"),
        header_cell("Last"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_values = 0usize;
    for (path, array) in result.structure.arrays_in(&result.group) {
        total_values += array.data.len();
        table.add_row(vec![
            Cell::new(path.name().unwrap_or_default())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            type_cell(&array.scalar_type()),
            Cell::new(array.data.len()),
            sample_cell(array, 0),
            sample_cell(array, array.data.len().saturating_sub(1)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_values).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    print_warnings(result.report.warnings());
    if let Some((path, summary)) = &result.export {
        println!(
            "Exported {} rows x {} columns to {}",
            summary.rows,
            summary.columns,
            path.display()
        );
    }
    if let Some(path) = &result.saved_config {
        println!("Configuration: {}", path.display());
    }
}

fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("Warning")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning.code).fg(Color::Yellow),
            Cell::new(&warning.message),
        ]);
    }
    println!();
    println!("Warnings:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn type_cell(scalar_type: &tabload_model::ScalarType) -> Cell {
    Cell::new(scalar_type).fg(Color::Green)
}

fn sample_cell(array: &DataArray, index: usize) -> Cell {
    match array.data.value_string(index) {
        Some(value) if value.chars().count() > SAMPLE_WIDTH => {
            let truncated: String = value.chars().take(SAMPLE_WIDTH - 3).collect();
            Cell::new(format!("{truncated}..."))
        }
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
