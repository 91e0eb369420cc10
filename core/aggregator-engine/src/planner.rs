//! FILENAME: core/aggregator-engine/src/planner.rs
//! Grouping Planner - expands dimension sets into the ordered groupings to compute.
//!
//! Order of emission:
//! 1. One constant grouping per constant set, in the given order.
//! 2. For each constant set (outer) and each change set (inner), the union of
//!    the two as a change grouping.
//!
//! The order is part of the output contract: it fixes the row-block order of
//! the unified report.

use log::debug;

use crate::definition::DimensionSet;
use crate::error::ConfigurationError;

/// Whether a grouping was requested directly or produced by a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingKind {
    Constant,
    /// Carries the change set's columns, which feed the filter metadata.
    Change { change_columns: Vec<String> },
}

/// One concrete set of dimension columns to aggregate by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    /// Constant columns first, then change columns.
    pub dimensions: Vec<String>,
    pub kind: GroupingKind,
}

impl Grouping {
    pub fn constant(dimensions: Vec<String>) -> Self {
        Grouping {
            dimensions,
            kind: GroupingKind::Constant,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, GroupingKind::Constant)
    }

    /// The change set's columns, for change groupings only.
    pub fn change_columns(&self) -> Option<&[String]> {
        match &self.kind {
            GroupingKind::Constant => None,
            GroupingKind::Change { change_columns } => Some(change_columns),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.dimensions.iter().any(|d| d == column)
    }

    /// Position of `column` among the grouping's dimensions.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == column)
    }

    /// Comma-joined dimension list, for messages and logs.
    pub fn describe(&self) -> String {
        self.dimensions.join(",")
    }
}

/// Expands constant and change dimension sets into the ordered grouping list.
pub fn plan_groupings(
    constant: &[DimensionSet],
    change: &[DimensionSet],
) -> Result<Vec<Grouping>, ConfigurationError> {
    if constant.is_empty() {
        return Err(ConfigurationError::EmptyConstantDimensions);
    }

    let mut groupings: Vec<Grouping> = constant
        .iter()
        .map(|set| Grouping::constant(set.columns().to_vec()))
        .collect();

    for constant_set in constant {
        for change_set in change {
            if let Some(column) = change_set.iter().find(|c| constant_set.contains(c)) {
                return Err(ConfigurationError::OverlappingDimension {
                    column: column.clone(),
                });
            }

            let mut dimensions = constant_set.columns().to_vec();
            dimensions.extend(change_set.iter().cloned());

            groupings.push(Grouping {
                dimensions,
                kind: GroupingKind::Change {
                    change_columns: change_set.columns().to_vec(),
                },
            });
        }
    }

    debug!(
        target: "PLAN",
        "planned {} groupings: {}",
        groupings.len(),
        groupings
            .iter()
            .map(|g| format!("[{}]", g.describe()))
            .collect::<Vec<_>>()
            .join(" ")
    );

    Ok(groupings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(columns: &[&str]) -> DimensionSet {
        DimensionSet::new(columns.iter().copied()).unwrap()
    }

    #[test]
    fn test_constant_only() {
        let groupings = plan_groupings(&[set(&["college"]), set(&["college", "year"])], &[]).unwrap();
        assert_eq!(groupings.len(), 2);
        assert!(groupings.iter().all(Grouping::is_constant));
        assert_eq!(groupings[1].dimensions, ["college", "year"]);
    }

    #[test]
    fn test_emission_order() {
        let groupings = plan_groupings(
            &[set(&["college"]), set(&["college", "year"])],
            &[set(&["department"]), set(&["term", "level"])],
        )
        .unwrap();

        let dims: Vec<Vec<&str>> = groupings
            .iter()
            .map(|g| g.dimensions.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(
            dims,
            vec![
                vec!["college"],
                vec!["college", "year"],
                vec!["college", "department"],
                vec!["college", "term", "level"],
                vec!["college", "year", "department"],
                vec!["college", "year", "term", "level"],
            ]
        );
        assert_eq!(groupings[3].change_columns(), Some(&["term".to_string(), "level".to_string()][..]));
        assert_eq!(groupings[0].change_columns(), None);
    }

    #[test]
    fn test_empty_constant_rejected() {
        assert_eq!(
            plan_groupings(&[], &[set(&["year"])]).unwrap_err(),
            ConfigurationError::EmptyConstantDimensions
        );
    }

    #[test]
    fn test_overlap_rejected() {
        let err = plan_groupings(
            &[set(&["college"]), set(&["college", "year"])],
            &[set(&["year"])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::OverlappingDimension {
                column: "year".into()
            }
        );
    }
}
