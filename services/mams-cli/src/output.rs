//! Table and JSON output

use mams_types::{
    AssignmentRecord, Base, DashboardSummary, EquipmentType, ExpenditureRecord, PurchaseRecord,
    TransferRecord,
};
use serde::Serialize;

/// A value printed as one table row
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Print `rows` as a table, or as a JSON array when `json` is set.
pub fn print_rows<T: Row + Serialize>(rows: &[T], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(rows);
    }
    if rows.is_empty() {
        println!("(none)");
        return Ok(());
    }
    print!("{}", render_table(T::HEADERS, rows.iter().map(Row::cells)));
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned columns separated by two spaces.
pub fn render_table(
    headers: &[&str],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> String {
    let rows: Vec<Vec<String>> = rows.into_iter().collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: Vec<&str>| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };

    push_line(headers.to_vec());
    for row in &rows {
        push_line(row.iter().map(String::as_str).collect());
    }
    out
}

pub fn print_summary(summary: &DashboardSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(summary);
    }
    let details = &summary.net_movement.details;
    println!("Opening balance  {}", summary.opening_balance);
    println!("Closing balance  {}", summary.closing_balance);
    println!(
        "Net movement     {} (purchases {}, transfers in {}, transfers out {})",
        summary.net_movement.total, details.purchases, details.transfers_in, details.transfers_out
    );
    println!("Assigned         {}", summary.assigned);
    println!("Expended         {}", summary.expended);
    Ok(())
}

fn date(value: &chrono::DateTime<chrono::Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

impl Row for Base {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "LOCATION"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.location.clone().unwrap_or_default(),
        ]
    }
}

impl Row for EquipmentType {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "CATEGORY"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.category.clone().unwrap_or_default(),
        ]
    }
}

impl Row for PurchaseRecord {
    const HEADERS: &'static [&'static str] = &["ID", "DATE", "EQUIPMENT", "BASE", "QTY", "VENDOR"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            date(&self.purchase_date),
            self.equipment_type.label(),
            self.base.label(),
            self.quantity.to_string(),
            self.vendor.clone().unwrap_or_default(),
        ]
    }
}

impl Row for TransferRecord {
    const HEADERS: &'static [&'static str] = &["ID", "DATE", "EQUIPMENT", "FROM", "TO", "QTY", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            date(&self.transfer_date),
            self.equipment_type.label(),
            self.from_base.label(),
            self.to_base.label(),
            self.quantity.to_string(),
            self.status.map(|s| s.to_string()).unwrap_or_default(),
        ]
    }
}

impl Row for AssignmentRecord {
    const HEADERS: &'static [&'static str] = &["ID", "DATE", "EQUIPMENT", "ASSIGNED TO", "BASE", "QTY"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            date(&self.assignment_date),
            self.equipment_type.label(),
            self.assigned_to.as_ref().map(|a| a.label()).unwrap_or_default(),
            self.issuing_base.label(),
            self.quantity.to_string(),
        ]
    }
}

impl Row for ExpenditureRecord {
    const HEADERS: &'static [&'static str] = &["ID", "DATE", "EQUIPMENT", "BASE", "QTY", "NOTES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            date(&self.expenditure_date),
            self.equipment_type.label(),
            self.base.label(),
            self.quantity.to_string(),
            self.notes.clone().unwrap_or_default(),
        ]
    }
}
