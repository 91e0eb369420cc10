//! FILENAME: tests/common/mod.rs
//! Shared fixtures for the aggregation engine integration tests.

#![allow(dead_code)]

use aggregator_engine::UnifiedTable;
use datatable::{Table, Value};

/// Six rows of college enrolment by year.
pub fn colleges() -> Table {
    let rows = [
        ("College A", 2021, 1000.0),
        ("College A", 2022, 1200.0),
        ("College B", 2021, 500.0),
        ("College B", 2022, 700.0),
        ("College C", 2021, 1800.0),
        ("College C", 2022, 1900.0),
    ];
    Table::from_rows(
        vec!["college", "year", "students"],
        rows.iter()
            .map(|&(college, year, students)| vec![college.into(), year.into(), students.into()])
            .collect(),
    )
    .unwrap()
}

/// Twelve rows of enrolment by college, department, and year.
pub fn departments() -> Table {
    let rows = [
        ("College A", "Department 1", 2021, 1000.0),
        ("College A", "Department 1", 2022, 1200.0),
        ("College A", "Department 2", 2021, 250.0),
        ("College A", "Department 2", 2022, 250.0),
        ("College B", "Department 3", 2021, 300.0),
        ("College B", "Department 3", 2022, 325.0),
        ("College B", "Department 4", 2021, 350.0),
        ("College B", "Department 4", 2022, 350.0),
        ("College C", "Department 5", 2021, 1500.0),
        ("College C", "Department 5", 2022, 1550.0),
        ("College C", "Department 6", 2021, 1500.0),
        ("College C", "Department 6", 2022, 1500.0),
    ];
    Table::from_rows(
        vec!["college", "department", "year", "students"],
        rows.iter()
            .map(|&(college, department, year, students)| {
                vec![college.into(), department.into(), year.into(), students.into()]
            })
            .collect(),
    )
    .unwrap()
}

/// Index of the first row whose named columns hold the given values.
pub fn find_row(view: &UnifiedTable, criteria: &[(&str, Value)]) -> Option<usize> {
    (0..view.row_count()).find(|&row| {
        criteria
            .iter()
            .all(|(column, value)| view.value(row, column) == Some(value))
    })
}

/// The numeric value at `row` in `column`, panicking on anything else.
pub fn number_at(view: &UnifiedTable, row: usize, column: &str) -> f64 {
    match view.value(row, column) {
        Some(Value::Number(n)) => *n,
        other => panic!("expected a number at row {row}, column {column}, found {other:?}"),
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, found {actual}"
    );
}
