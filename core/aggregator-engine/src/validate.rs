//! FILENAME: core/aggregator-engine/src/validate.rs
//! Checks a configuration against a concrete source table before any
//! evaluation starts, so a bad run fails without producing partial output.

use datatable::Table;

use crate::definition::{AggregationConfig, OfTotal, Operation};
use crate::error::ConfigurationError;
use crate::planner::Grouping;

/// Validates `config` against the columns of `table` and the planned groupings.
pub fn validate(
    config: &AggregationConfig,
    table: &Table,
    groupings: &[Grouping],
) -> Result<(), ConfigurationError> {
    for grouping in groupings {
        for dimension in &grouping.dimensions {
            require_dimension(table, dimension)?;
        }
    }

    let mut outputs: Vec<String> = Vec::with_capacity(config.operations().len());

    for operation in config.operations() {
        let column = operation.column();
        if !table.has_column(column) && !outputs.iter().any(|o| o == column) {
            return Err(ConfigurationError::UnknownColumn {
                operation: operation.kind_name(),
                column: column.to_string(),
            });
        }

        match operation {
            Operation::PercentOfTotalCategorical { column } => {
                if let Some(grouping) = groupings.iter().find(|g| !g.contains(column)) {
                    return Err(ConfigurationError::CategoricalNotGrouped {
                        column: column.clone(),
                        grouping: grouping.describe(),
                    });
                }
            }
            Operation::PercentOfTotalNumeric {
                of_total: OfTotal::Dimensions(dims),
                ..
            } => {
                for dim in dims {
                    require_dimension(table, dim)?;
                }
            }
            Operation::OfComplement { of_complement, .. } => {
                for dim in of_complement {
                    require_dimension(table, dim)?;
                }
            }
            _ => {}
        }

        outputs.push(operation.output_name());
    }

    Ok(())
}

fn require_dimension(table: &Table, column: &str) -> Result<(), ConfigurationError> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(ConfigurationError::UnknownDimension {
            column: column.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Statistic;
    use crate::planner::plan_groupings;

    fn table() -> Table {
        Table::from_rows(
            vec!["college", "year", "students"],
            vec![
                vec!["A".into(), "2021".into(), 1000.0.into()],
                vec!["B".into(), "2021".into(), 500.0.into()],
            ],
        )
        .unwrap()
    }

    fn check(config: &AggregationConfig) -> Result<(), ConfigurationError> {
        let groupings = plan_groupings(config.dimensions_constant(), config.dimensions_change())?;
        validate(config, &table(), &groupings)
    }

    #[test]
    fn test_valid_chain_of_outputs() {
        let config = AggregationConfig::builder()
            .operation(Operation::sum("students"))
            .operation(Operation::of_complement(Statistic::Mean, "students_sum", ["college"]))
            .constant(["college"])
            .build()
            .unwrap();
        assert_eq!(check(&config), Ok(()));
    }

    #[test]
    fn test_output_must_precede_its_use() {
        let config = AggregationConfig::builder()
            .operation(Operation::max("students_sum"))
            .operation(Operation::sum("students"))
            .constant(["college"])
            .build()
            .unwrap();
        assert_eq!(
            check(&config),
            Err(ConfigurationError::UnknownColumn {
                operation: "max".into(),
                column: "students_sum".into()
            })
        );
    }

    #[test]
    fn test_unknown_dimension() {
        let config = AggregationConfig::builder()
            .operation(Operation::sum("students"))
            .constant(["college"])
            .change(["department"])
            .build()
            .unwrap();
        assert_eq!(
            check(&config),
            Err(ConfigurationError::UnknownDimension {
                column: "department".into()
            })
        );
    }

    #[test]
    fn test_categorical_must_be_in_every_grouping() {
        let config = AggregationConfig::builder()
            .operation(Operation::percent_of_total_categorical("year"))
            .constant(["college", "year"])
            .constant(["college"])
            .build()
            .unwrap();
        assert_eq!(
            check(&config),
            Err(ConfigurationError::CategoricalNotGrouped {
                column: "year".into(),
                grouping: "college".into()
            })
        );
    }

    #[test]
    fn test_of_total_and_of_complement_columns_exist() {
        let config = AggregationConfig::builder()
            .operation(Operation::percent_of_total_numeric(
                "students",
                OfTotal::Dimensions(vec!["region".into()]),
            ))
            .constant(["college"])
            .build()
            .unwrap();
        assert!(matches!(
            check(&config),
            Err(ConfigurationError::UnknownDimension { column }) if column == "region"
        ));

        let config = AggregationConfig::builder()
            .operation(Operation::of_complement(Statistic::Sum, "students", ["term"]))
            .constant(["college"])
            .build()
            .unwrap();
        assert!(matches!(
            check(&config),
            Err(ConfigurationError::UnknownDimension { column }) if column == "term"
        ));
    }
}
