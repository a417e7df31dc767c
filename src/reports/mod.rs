use crate::cmd::evaluate::InstanceReport;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use trp_penalty::penalty::{SearchBound, Verdict};

fn verdict_cells(verdict: &Verdict) -> (Cell, Cell) {
    match *verdict {
        Verdict::Complete(_) => (Cell::new("complete").fg(Color::Green), Cell::new("-")),
        Verdict::Abandoned { route, .. } => (
            Cell::new("abandoned").fg(Color::Red),
            Cell::new(route.to_string()),
        ),
    }
}

fn right_align(table: &mut Table, cols: std::ops::RangeInclusive<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_summary(results: &[InstanceReport], bound: &SearchBound) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Instance").add_attribute(Attribute::Bold),
        Cell::new("Tasks"),
        Cell::new("Routes"),
        Cell::new("Exp"),
        Cell::new("Full").fg(Color::Cyan),
        Cell::new("Returned").add_attribute(Attribute::Bold),
        Cell::new("Verdict"),
        Cell::new("Exit Route"),
    ]);

    for r in results {
        let (verdict, exit_route) = verdict_cells(&r.verdict);
        table.add_row(vec![
            Cell::new(&r.name).add_attribute(Attribute::Bold),
            Cell::new(r.tasks),
            Cell::new(r.breakdown.routes.len()),
            Cell::new(format!("{:.2}", r.params.exponent)),
            Cell::new(format!("{:.4}", r.breakdown.total)).fg(Color::Cyan),
            Cell::new(format!("{:.4}", r.verdict.value())).add_attribute(Attribute::Bold),
            verdict,
            exit_route,
        ]);
    }
    right_align(&mut table, 1..=5);

    if bound.penalty.is_finite() {
        println!(
            "\n=== PENALTY (bound {:.4}, gain {}) ===",
            bound.penalty, bound.gain
        );
    } else {
        println!("\n=== PENALTY (unbounded) ===");
    }
    println!("{}", table);
}

pub fn print_routes(report: &InstanceReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Route").add_attribute(Attribute::Bold),
        Cell::new("Legs"),
        Cell::new("Elapsed"),
        Cell::new("Lateness"),
        Cell::new("Cap Excess").fg(Color::Red),
        Cell::new("Total").add_attribute(Attribute::Bold),
    ]);

    for route in &report.breakdown.routes {
        table.add_row(vec![
            Cell::new(route.start).add_attribute(Attribute::Bold),
            Cell::new(route.legs),
            Cell::new(format!("{:.2}", route.elapsed)),
            Cell::new(format!("{:.4}", route.lateness)),
            Cell::new(format!("{:.4}", route.cap_excess)).fg(Color::Red),
            Cell::new(format!("{:.4}", route.total())).add_attribute(Attribute::Bold),
        ]);
    }
    right_align(&mut table, 1..=5);

    println!(
        "\nRoutes of '{}' ({}, {} orientation)",
        report.name, report.path, report.breakdown.orientation
    );
    println!("{}", table);
}

pub fn print_trace(report: &InstanceReport, bound: &SearchBound) {
    let exit = report.breakdown.first_exit(bound);

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Route"),
        Cell::new("Stop"),
        Cell::new("Kind"),
        Cell::new("Elapsed"),
        Cell::new("Term"),
        Cell::new("Running").fg(Color::Cyan),
    ]);

    for (i, cp) in report.breakdown.trace.iter().enumerate() {
        let mut running = Cell::new(format!("{:.4}", cp.penalty)).fg(Color::Cyan);
        if exit == Some(i) {
            running = running.add_attribute(Attribute::Bold).fg(Color::Red);
        }
        table.add_row(vec![
            Cell::new(i),
            Cell::new(cp.route),
            Cell::new(cp.stop),
            Cell::new(cp.kind),
            Cell::new(format!("{:.2}", cp.elapsed)),
            Cell::new(format!("{:.4}", cp.contribution)),
            running,
        ]);
    }
    right_align(&mut table, 4..=6);

    println!("\nCheckpoints of '{}'", report.name);
    println!("{}", table);
}
