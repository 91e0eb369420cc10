//! FILENAME: core/aggregator-engine/src/view.rs
//! Unified View - stacks the per-grouping results into one report table.
//!
//! Layout:
//! - Dimension columns, in order of first appearance across the groupings
//! - One column per operation output, in operation order
//! - `agg_dim$names` and `agg_dim$values` filter metadata
//!
//! A row leaves a dimension column null when its grouping does not use that
//! dimension. Row blocks keep the grouping order; rows within a block keep
//! the first-seen group order.

use std::ops::Range;

use serde::Serialize;

use datatable::{Table, TableError, Value};

use crate::definition::{Operation, AGG_DIM_NAMES, AGG_DIM_VALUES};
use crate::engine::GroupingResult;
use crate::planner::Grouping;

/// Separator used by the filter metadata columns.
pub const METADATA_SEPARATOR: &str = ",";

/// The single table produced by one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    /// Row range of each grouping's block, in grouping order.
    #[serde(skip)]
    segments: Vec<Range<usize>>,
}

impl UnifiedTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The value at `row` in the named column.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Every value of the named column, top to bottom.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Row range of each grouping's block.
    pub fn segments(&self) -> &[Range<usize>] {
        &self.segments
    }

    /// Copies the report into a plain table, e.g. to aggregate it again.
    pub fn to_table(&self) -> Result<Table, TableError> {
        Table::from_rows(self.columns.clone(), self.rows.clone())
    }

    pub fn into_table(self) -> Result<Table, TableError> {
        Table::from_rows(self.columns, self.rows)
    }
}

/// Stacks grouping results into the unified report.
///
/// `groupings` and `results` are parallel slices.
pub fn unify(
    groupings: &[Grouping],
    results: &[GroupingResult],
    operations: &[Operation],
) -> UnifiedTable {
    let mut dimension_columns: Vec<&str> = Vec::new();
    for grouping in groupings {
        for dim in &grouping.dimensions {
            if !dimension_columns.contains(&dim.as_str()) {
                dimension_columns.push(dim);
            }
        }
    }

    let dim_count = dimension_columns.len();
    let output_offset = dim_count;
    let names_col = output_offset + operations.len();
    let values_col = names_col + 1;

    let mut columns: Vec<String> = dimension_columns.iter().map(|d| d.to_string()).collect();
    columns.extend(operations.iter().map(Operation::output_name));
    columns.push(AGG_DIM_NAMES.to_string());
    columns.push(AGG_DIM_VALUES.to_string());

    let total_rows = results.iter().map(GroupingResult::row_count).sum();
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(total_rows);
    let mut segments = Vec::with_capacity(groupings.len());

    for (grouping, result) in groupings.iter().zip(results) {
        let start = rows.len();

        // Report column of each grouping dimension.
        let targets: Vec<usize> = grouping
            .dimensions
            .iter()
            .filter_map(|d| dimension_columns.iter().position(|c| *c == d.as_str()))
            .collect();

        let change_positions: Option<Vec<usize>> = grouping
            .change_columns()
            .map(|cols| cols.iter().filter_map(|c| grouping.position(c)).collect());
        let change_names = grouping
            .change_columns()
            .map(|cols| Value::Text(cols.join(METADATA_SEPARATOR)));

        for (group, dims) in result.dimension_values.iter().enumerate() {
            let mut row = vec![Value::Null; columns.len()];

            for (&target, value) in targets.iter().zip(dims) {
                row[target] = value.clone();
            }
            for (op, output) in result.outputs.iter().enumerate() {
                row[output_offset + op] = output[group].clone();
            }

            if let (Some(names), Some(positions)) = (&change_names, &change_positions) {
                row[names_col] = names.clone();
                row[values_col] = Value::Text(
                    positions
                        .iter()
                        .map(|&p| dims[p].to_string())
                        .collect::<Vec<_>>()
                        .join(METADATA_SEPARATOR),
                );
            }

            rows.push(row);
        }

        segments.push(start..rows.len());
    }

    UnifiedTable {
        columns,
        rows,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::GroupingKind;

    fn grouping(dims: &[&str], change: Option<&[&str]>) -> Grouping {
        Grouping {
            dimensions: dims.iter().map(|d| d.to_string()).collect(),
            kind: match change {
                None => GroupingKind::Constant,
                Some(cols) => GroupingKind::Change {
                    change_columns: cols.iter().map(|c| c.to_string()).collect(),
                },
            },
        }
    }

    #[test]
    fn test_layout_and_padding() {
        let groupings = vec![
            grouping(&["college"], None),
            grouping(&["college", "year"], Some(&["year"])),
        ];
        let results = vec![
            GroupingResult {
                dimension_values: vec![vec!["A".into()], vec!["B".into()]],
                outputs: vec![vec![2200.0.into(), 1200.0.into()]],
            },
            GroupingResult {
                dimension_values: vec![vec!["A".into(), 2021.0.into()]],
                outputs: vec![vec![1000.0.into()]],
            },
        ];
        let view = unify(&groupings, &results, &[Operation::sum("students")]);

        assert_eq!(
            view.columns(),
            ["college", "year", "students_sum", AGG_DIM_NAMES, AGG_DIM_VALUES]
        );
        assert_eq!(view.row_count(), 3);
        assert_eq!(view.value(0, "year"), Some(&Value::Null));
        assert_eq!(view.value(0, AGG_DIM_NAMES), Some(&Value::Null));
        assert_eq!(view.value(2, AGG_DIM_NAMES), Some(&Value::text("year")));
        assert_eq!(view.value(2, AGG_DIM_VALUES), Some(&Value::text("2021")));
        assert_eq!(view.segments(), [0..2, 2..3]);
    }

    #[test]
    fn test_multi_column_change_metadata() {
        let groupings = vec![grouping(
            &["college", "term", "level"],
            Some(&["term", "level"]),
        )];
        let results = vec![GroupingResult {
            dimension_values: vec![vec!["A".into(), "Fall".into(), 2.0.into()]],
            outputs: vec![],
        }];
        let view = unify(&groupings, &results, &[]);
        assert_eq!(view.value(0, AGG_DIM_NAMES), Some(&Value::text("term,level")));
        assert_eq!(view.value(0, AGG_DIM_VALUES), Some(&Value::text("Fall,2")));
    }

    #[test]
    fn test_to_table_round_trips_columns() {
        let groupings = vec![grouping(&["college"], None)];
        let results = vec![GroupingResult {
            dimension_values: vec![vec!["A".into()]],
            outputs: vec![vec![5.0.into()]],
        }];
        let view = unify(&groupings, &results, &[Operation::count("students")]);
        let table = view.to_table().unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.value(0, "students_count"), Some(&Value::Number(5.0)));
        assert_eq!(
            view.column_values("college"),
            Some(vec![&Value::text("A")])
        );
    }
}
