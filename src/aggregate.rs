//! Post-processing of decoded tables: numeric coercion, commodity
//! enrichment, transport folding, and the month-to-year rollup.

use std::collections::{HashMap, HashSet};

use crate::errors::Warning;
use crate::query::{Direction, Granularity, Period, TradeQuery, Transport, TRANSPORT_FIELDS};
use crate::refdata::ReferenceData;
use crate::types::{Cell, Table};

/// Reshapes a decoded table according to the query settings.
///
/// Empty tables pass through unchanged. Every step preserves row count
/// except the yearly rollup, which merges rows by design.
pub(crate) fn process(
    mut table: Table,
    query: &TradeQuery,
    direction: Direction,
    refdata: &ReferenceData,
    warnings: &mut Vec<Warning>,
) -> Table {
    if table.is_empty() {
        return table;
    }

    coerce_value_columns(&mut table, direction);

    match query.granularity {
        Granularity::Hs2 => enrich_hs2(&mut table, direction, refdata, warnings),
        Granularity::Hs2Section => enrich_section(&mut table, direction, refdata, warnings),
    }

    let mut sum_fields = vec![direction.value_field()];
    match query.transport {
        Transport::Included => {
            sum_fields.extend(TRANSPORT_FIELDS.iter().copied().filter(|f| table.has_column(f)));
        }
        Transport::Excluded => {
            for field in TRANSPORT_FIELDS {
                table.drop_column(field);
            }
        }
    }

    if query.period == Period::Year {
        rollup_year(&mut table, direction, &sum_fields, warnings);
    }

    table
}

/// Rewrites the primary value field and the transport fields as numeric.
/// A field the API did not return is synthesized as an all-zero column so
/// downstream summation is always defined.
fn coerce_value_columns(table: &mut Table, direction: Direction) {
    let mut fields = vec![direction.value_field()];
    fields.extend(TRANSPORT_FIELDS);

    for field in fields {
        match table.column_index(field) {
            Some(i) => {
                for row in table.rows_mut() {
                    row[i] = Cell::Num(row[i].to_num_or_zero());
                }
            }
            None => {
                let zeros = vec![Cell::Num(0.0); table.row_count()];
                table.push_column(field, zeros);
            }
        }
    }
}

/// Left-joins the commodity code column against the HS2 name table,
/// appending `HS2` and `HS2_Name` and dropping the original code column.
/// Unmatched codes get empty cells; no row is ever lost.
fn enrich_hs2(
    table: &mut Table,
    direction: Direction,
    refdata: &ReferenceData,
    warnings: &mut Vec<Warning>,
) {
    let commodity = direction.commodity_field();
    let Some(names) = refdata.hs2_names() else {
        tracing::warn!("HS2 reference table not loaded, keeping '{}'", commodity);
        warnings.push(Warning::LookupUnavailable("hs2_reference".to_string()));
        return;
    };
    let Some(idx) = table.column_index(commodity) else {
        return;
    };

    let mut codes = Vec::with_capacity(table.row_count());
    let mut labels = Vec::with_capacity(table.row_count());
    for row in table.rows() {
        match row[idx].as_str().and_then(|code| names.get(code)) {
            Some(name) => {
                codes.push(row[idx].clone());
                labels.push(Cell::Text(name.to_string()));
            }
            None => {
                codes.push(Cell::Empty);
                labels.push(Cell::Empty);
            }
        }
    }
    table.push_column("HS2", codes);
    table.push_column("HS2_Name", labels);
    table.drop_column(commodity);
}

/// Left-joins the commodity code column against the section table,
/// appending `Section` and `Section_Title`. Both the original code column
/// and the joined section code are dropped.
fn enrich_section(
    table: &mut Table,
    direction: Direction,
    refdata: &ReferenceData,
    warnings: &mut Vec<Warning>,
) {
    let commodity = direction.commodity_field();
    let Some(sections) = refdata.hs2_sections() else {
        tracing::warn!("HS2 section table not loaded, keeping '{}'", commodity);
        warnings.push(Warning::LookupUnavailable("hs2_section".to_string()));
        return;
    };
    let Some(idx) = table.column_index(commodity) else {
        return;
    };

    let mut ids = Vec::with_capacity(table.row_count());
    let mut titles = Vec::with_capacity(table.row_count());
    for row in table.rows() {
        match row[idx].as_str().and_then(|code| sections.get(code)) {
            Some(section) => {
                ids.push(Cell::Text(section.id.clone()));
                titles.push(Cell::Text(section.title.clone()));
            }
            None => {
                ids.push(Cell::Empty);
                titles.push(Cell::Empty);
            }
        }
    }
    table.push_column("Section", ids);
    table.push_column("Section_Title", titles);
    table.drop_column(commodity);
}

/// Sums monthly rows into yearly rows, grouping on every column that is
/// neither a value-field candidate nor `MONTH`. The `MONTH` column does
/// not survive the grouping; group order follows first appearance.
fn rollup_year(
    table: &mut Table,
    direction: Direction,
    sum_fields: &[&str],
    warnings: &mut Vec<Warning>,
) {
    if !(table.has_column("MONTH") && table.has_column("YEAR")) {
        tracing::warn!("MONTH or YEAR column not found for yearly aggregation");
        warnings.push(Warning::MissingPeriodColumns);
        return;
    }

    // All value-field candidates are excluded from grouping, whether or
    // not the transport columns survived folding.
    let mut excluded = vec![direction.value_field()];
    excluded.extend(TRANSPORT_FIELDS);
    excluded.push("MONTH");

    let mut group_idx = Vec::new();
    let mut sum_idx = Vec::new();
    for (i, column) in table.columns().iter().enumerate() {
        if !excluded.contains(&column.as_str()) {
            group_idx.push(i);
        } else if sum_fields.contains(&column.as_str()) {
            sum_idx.push(i);
        }
    }

    if group_idx.is_empty() {
        tracing::warn!("No valid grouping columns found for year aggregation");
        warnings.push(Warning::NoGroupingColumns);
        return;
    }
    if sum_idx.is_empty() {
        tracing::warn!("No value columns to sum for year aggregation, de-duplicating rows");
        warnings.push(Warning::NoValueColumns);
        let mut seen = HashSet::new();
        table
            .rows_mut()
            .retain(|row| seen.insert(group_key(row, &group_idx)));
        table.drop_column("MONTH");
        return;
    }

    let mut slots: HashMap<Vec<String>, usize> = HashMap::new();
    let mut grouped: Vec<Vec<Cell>> = Vec::new();
    for row in table.rows() {
        let key = group_key(row, &group_idx);
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                let mut fresh: Vec<Cell> = group_idx.iter().map(|&i| row[i].clone()).collect();
                fresh.extend(sum_idx.iter().map(|_| Cell::Num(0.0)));
                grouped.push(fresh);
                slots.insert(key, grouped.len() - 1);
                grouped.len() - 1
            }
        };
        for (offset, &i) in sum_idx.iter().enumerate() {
            if let Cell::Num(total) = &mut grouped[slot][group_idx.len() + offset] {
                *total += row[i].as_num().unwrap_or(0.0);
            }
        }
    }

    let columns = group_idx
        .iter()
        .chain(sum_idx.iter())
        .map(|&i| table.columns()[i].clone())
        .collect();
    *table = Table::from_parts(columns, grouped);
}

fn group_key(row: &[Cell], group_idx: &[usize]) -> Vec<String> {
    group_idx.iter().map(|&i| row[i].key()).collect()
}
