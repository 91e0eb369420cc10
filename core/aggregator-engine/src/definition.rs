//! FILENAME: core/aggregator-engine/src/definition.rs
//! Aggregation Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE an aggregation run.
//! These structures are:
//! - Validated at construction time, so bad configurations never reach the engine
//! - Serializable (operations use the `{operation, column, of_total, of_complement}` record form)
//! - Immutable once built

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::planner::plan_groupings;

/// Metadata column listing the change dimensions of a row's grouping.
pub const AGG_DIM_NAMES: &str = "agg_dim$names";

/// Metadata column listing the row's values for those change dimensions.
pub const AGG_DIM_VALUES: &str = "agg_dim$values";

/// Label that stands in for a null dimension value.
pub const DEFAULT_MISSING_DIMENSION_LABEL: &str = "(no value)";

fn is_reserved(name: &str) -> bool {
    name == AGG_DIM_NAMES || name == AGG_DIM_VALUES
}

// ============================================================================
// STATISTICS
// ============================================================================

/// Reducers that collapse a group of values into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Count,
    CountDistinct,
    Max,
    Mean,
    Median,
    Min,
    Std,
    Sum,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Count,
        Statistic::CountDistinct,
        Statistic::Max,
        Statistic::Mean,
        Statistic::Median,
        Statistic::Min,
        Statistic::Std,
        Statistic::Sum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::CountDistinct => "count_distinct",
            Statistic::Max => "max",
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::Min => "min",
            Statistic::Std => "std",
            Statistic::Sum => "sum",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Statistic::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// The reference population of a `percent_of_total_numeric` operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OfTotal {
    /// The whole source table (`"*"`).
    All,
    /// Rows regrouped by these dimensions.
    Dimensions(Vec<String>),
}

/// One requested output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OperationRecord", into = "OperationRecord")]
pub enum Operation {
    /// A plain reducer over a column, per group.
    Statistic { statistic: Statistic, column: String },
    /// Row count of each group over the row count of its parent group
    /// (the grouping without `column`).
    PercentOfTotalCategorical { column: String },
    /// Sum of `column` per group over the sum per `of_total` group.
    PercentOfTotalNumeric { column: String, of_total: OfTotal },
    /// The statistic over every other member of the group's context partition.
    OfComplement {
        statistic: Statistic,
        column: String,
        of_complement: Vec<String>,
    },
}

impl Operation {
    pub fn statistic(statistic: Statistic, column: impl Into<String>) -> Self {
        Operation::Statistic {
            statistic,
            column: column.into(),
        }
    }

    pub fn count(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::Count, column)
    }

    pub fn count_distinct(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::CountDistinct, column)
    }

    pub fn max(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::Max, column)
    }

    pub fn mean(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::Mean, column)
    }

    pub fn median(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::Median, column)
    }

    pub fn min(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::Min, column)
    }

    pub fn std(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::Std, column)
    }

    pub fn sum(column: impl Into<String>) -> Self {
        Operation::statistic(Statistic::Sum, column)
    }

    pub fn percent_of_total_categorical(column: impl Into<String>) -> Self {
        Operation::PercentOfTotalCategorical {
            column: column.into(),
        }
    }

    pub fn percent_of_total_numeric(column: impl Into<String>, of_total: OfTotal) -> Self {
        Operation::PercentOfTotalNumeric {
            column: column.into(),
            of_total,
        }
    }

    pub fn of_complement<I, S>(statistic: Statistic, column: impl Into<String>, of_complement: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Operation::OfComplement {
            statistic,
            column: column.into(),
            of_complement: of_complement.into_iter().map(Into::into).collect(),
        }
    }

    /// The operation name as written in configuration records.
    pub fn kind_name(&self) -> String {
        match self {
            Operation::Statistic { statistic, .. } => statistic.name().to_string(),
            Operation::PercentOfTotalCategorical { .. } => "percent_of_total_categorical".to_string(),
            Operation::PercentOfTotalNumeric { .. } => "percent_of_total_numeric".to_string(),
            Operation::OfComplement { statistic, .. } => format!("{}_of_complement", statistic),
        }
    }

    /// The column the operation reads.
    pub fn column(&self) -> &str {
        match self {
            Operation::Statistic { column, .. }
            | Operation::PercentOfTotalCategorical { column }
            | Operation::PercentOfTotalNumeric { column, .. }
            | Operation::OfComplement { column, .. } => column,
        }
    }

    /// Name of the report column this operation fills.
    pub fn output_name(&self) -> String {
        match self {
            Operation::PercentOfTotalNumeric {
                column,
                of_total: OfTotal::Dimensions(dims),
            } => {
                let mut name = format!("{}_percent_of_total_numeric", column);
                for dim in dims {
                    name.push('_');
                    name.push_str(dim);
                }
                name
            }
            _ => format!("{}_{}", self.column(), self.kind_name()),
        }
    }

    /// Checks the parameters that do not depend on the source table.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            Operation::PercentOfTotalNumeric {
                column,
                of_total: OfTotal::Dimensions(dims),
            } => {
                if dims.is_empty() {
                    return Err(ConfigurationError::InvalidOfTotal {
                        value: "[]".to_string(),
                    });
                }
                if dims.iter().any(|d| d == column) {
                    return Err(ConfigurationError::ColumnInOfTotal {
                        column: column.clone(),
                    });
                }
                ensure_unique(dims)
            }
            Operation::OfComplement { of_complement, .. } => {
                if of_complement.is_empty() {
                    return Err(ConfigurationError::EmptyOfComplement {
                        operation: self.kind_name(),
                    });
                }
                ensure_unique(of_complement)
            }
            _ => Ok(()),
        }
    }
}

fn ensure_unique(columns: &[String]) -> Result<(), ConfigurationError> {
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].contains(column) {
            return Err(ConfigurationError::DuplicateDimension {
                column: column.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// EXTERNAL OPERATION RECORD
// ============================================================================

/// `of_total` as written in a record: the wildcard string or a list of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OfTotalRecord {
    Wildcard(String),
    Dimensions(Vec<String>),
}

/// The dynamically keyed form of an operation, e.g.
/// `{"operation": "percent_of_total_numeric", "column": "students", "of_total": ["year"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub operation: String,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_total: Option<OfTotalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_complement: Option<Vec<String>>,
}

impl TryFrom<OfTotalRecord> for OfTotal {
    type Error = ConfigurationError;

    fn try_from(record: OfTotalRecord) -> Result<Self, Self::Error> {
        match record {
            OfTotalRecord::Wildcard(s) if s == "*" => Ok(OfTotal::All),
            OfTotalRecord::Wildcard(s) => Err(ConfigurationError::InvalidOfTotal { value: s }),
            OfTotalRecord::Dimensions(dims) if dims.len() == 1 && dims[0] == "*" => Ok(OfTotal::All),
            OfTotalRecord::Dimensions(dims) => {
                if dims.iter().any(|d| d == "*") {
                    return Err(ConfigurationError::InvalidOfTotal {
                        value: dims.join(","),
                    });
                }
                Ok(OfTotal::Dimensions(dims))
            }
        }
    }
}

impl TryFrom<OperationRecord> for Operation {
    type Error = ConfigurationError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        let OperationRecord {
            operation,
            column,
            of_total,
            of_complement,
        } = record;

        let missing = |parameter: &str| ConfigurationError::MissingParameter {
            operation: operation.clone(),
            parameter: parameter.to_string(),
        };
        let unexpected = |parameter: &str| ConfigurationError::UnexpectedParameter {
            operation: operation.clone(),
            parameter: parameter.to_string(),
        };

        let parsed = if let Some(statistic) = Statistic::from_name(&operation) {
            if of_total.is_some() {
                return Err(unexpected("of_total"));
            }
            if of_complement.is_some() {
                return Err(unexpected("of_complement"));
            }
            Operation::Statistic { statistic, column }
        } else if operation == "percent_of_total_categorical" {
            if of_total.is_some() {
                return Err(unexpected("of_total"));
            }
            if of_complement.is_some() {
                return Err(unexpected("of_complement"));
            }
            Operation::PercentOfTotalCategorical { column }
        } else if operation == "percent_of_total_numeric" {
            if of_complement.is_some() {
                return Err(unexpected("of_complement"));
            }
            let of_total = of_total.ok_or_else(|| missing("of_total"))?;
            Operation::PercentOfTotalNumeric {
                column,
                of_total: OfTotal::try_from(of_total)?,
            }
        } else if let Some(statistic) = operation
            .strip_suffix("_of_complement")
            .and_then(Statistic::from_name)
        {
            if of_total.is_some() {
                return Err(unexpected("of_total"));
            }
            let of_complement = of_complement.ok_or_else(|| missing("of_complement"))?;
            Operation::OfComplement {
                statistic,
                column,
                of_complement,
            }
        } else {
            return Err(ConfigurationError::UnknownOperation { name: operation });
        };

        parsed.validate()?;
        Ok(parsed)
    }
}

impl From<Operation> for OperationRecord {
    fn from(op: Operation) -> Self {
        let operation = op.kind_name();
        match op {
            Operation::Statistic { column, .. } | Operation::PercentOfTotalCategorical { column } => {
                OperationRecord {
                    operation,
                    column,
                    of_total: None,
                    of_complement: None,
                }
            }
            Operation::PercentOfTotalNumeric { column, of_total } => OperationRecord {
                operation,
                column,
                of_total: Some(match of_total {
                    OfTotal::All => OfTotalRecord::Wildcard("*".to_string()),
                    OfTotal::Dimensions(dims) => OfTotalRecord::Dimensions(dims),
                }),
                of_complement: None,
            },
            Operation::OfComplement {
                column,
                of_complement,
                ..
            } => OperationRecord {
                operation,
                column,
                of_total: None,
                of_complement: Some(of_complement),
            },
        }
    }
}

// ============================================================================
// DIMENSION SETS
// ============================================================================

/// An ordered, non-empty list of distinct dimension column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct DimensionSet(Vec<String>);

impl DimensionSet {
    pub fn new<I, S>(columns: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ConfigurationError::EmptyDimensionSet);
        }
        ensure_unique(&columns)?;
        Ok(DimensionSet(columns))
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl TryFrom<Vec<String>> for DimensionSet {
    type Error = ConfigurationError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        DimensionSet::new(columns)
    }
}

impl From<DimensionSet> for Vec<String> {
    fn from(set: DimensionSet) -> Self {
        set.0
    }
}

// ============================================================================
// MAIN CONFIGURATION STRUCT
// ============================================================================

fn default_missing_dimension_label() -> String {
    DEFAULT_MISSING_DIMENSION_LABEL.to_string()
}

/// The complete, validated description of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigRecord")]
pub struct AggregationConfig {
    operations: Vec<Operation>,
    dimensions_constant: Vec<DimensionSet>,
    dimensions_change: Vec<DimensionSet>,
    missing_dimension_label: String,
}

/// Unvalidated serde form of [`AggregationConfig`].
#[derive(Debug, Deserialize)]
struct ConfigRecord {
    operations: Vec<Operation>,
    dimensions_constant: Vec<DimensionSet>,
    #[serde(default)]
    dimensions_change: Vec<DimensionSet>,
    #[serde(default = "default_missing_dimension_label")]
    missing_dimension_label: String,
}

impl TryFrom<ConfigRecord> for AggregationConfig {
    type Error = ConfigurationError;

    fn try_from(record: ConfigRecord) -> Result<Self, Self::Error> {
        AggregationConfig::new(
            record.operations,
            record.dimensions_constant,
            record.dimensions_change,
            record.missing_dimension_label,
        )
    }
}

impl AggregationConfig {
    /// Builds and validates a configuration in one call.
    pub fn new(
        operations: Vec<Operation>,
        dimensions_constant: Vec<DimensionSet>,
        dimensions_change: Vec<DimensionSet>,
        missing_dimension_label: String,
    ) -> Result<Self, ConfigurationError> {
        let config = AggregationConfig {
            operations,
            dimensions_constant,
            dimensions_change,
            missing_dimension_label,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn builder() -> AggregationConfigBuilder {
        AggregationConfigBuilder::default()
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidJson(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigurationError::InvalidJson(e.to_string()))
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn dimensions_constant(&self) -> &[DimensionSet] {
        &self.dimensions_constant
    }

    pub fn dimensions_change(&self) -> &[DimensionSet] {
        &self.dimensions_change
    }

    pub fn missing_dimension_label(&self) -> &str {
        &self.missing_dimension_label
    }

    /// Checks every rule that can be decided without the source table.
    fn validate(&self) -> Result<(), ConfigurationError> {
        // Also rejects an empty constant list and constant/change overlaps.
        plan_groupings(&self.dimensions_constant, &self.dimensions_change)?;

        let dimension_names: Vec<&String> = self
            .dimensions_constant
            .iter()
            .chain(self.dimensions_change.iter())
            .flat_map(DimensionSet::iter)
            .collect();

        for name in &dimension_names {
            if is_reserved(name) {
                return Err(ConfigurationError::ReservedColumnName {
                    column: (*name).clone(),
                });
            }
        }

        let mut outputs: Vec<String> = Vec::with_capacity(self.operations.len());
        for op in &self.operations {
            op.validate()?;
            let output = op.output_name();
            if is_reserved(&output) {
                return Err(ConfigurationError::ReservedColumnName { column: output });
            }
            if outputs.contains(&output) || dimension_names.iter().any(|d| **d == output) {
                return Err(ConfigurationError::DuplicateOutputColumn { column: output });
            }
            outputs.push(output);
        }

        Ok(())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Assembles an [`AggregationConfig`]. Every step consumes the builder and
/// returns a new one; nothing is checked until [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct AggregationConfigBuilder {
    operations: Vec<Operation>,
    dimensions_constant: Vec<Vec<String>>,
    dimensions_change: Vec<Vec<String>>,
    missing_dimension_label: Option<String>,
}

impl AggregationConfigBuilder {
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    /// Appends one constant dimension set.
    pub fn constant<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions_constant
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Appends one change dimension set.
    pub fn change<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions_change
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn missing_dimension_label(mut self, label: impl Into<String>) -> Self {
        self.missing_dimension_label = Some(label.into());
        self
    }

    pub fn build(self) -> Result<AggregationConfig, ConfigurationError> {
        let constant = self
            .dimensions_constant
            .into_iter()
            .map(DimensionSet::new)
            .collect::<Result<Vec<_>, _>>()?;
        let change = self
            .dimensions_change
            .into_iter()
            .map(DimensionSet::new)
            .collect::<Result<Vec<_>, _>>()?;

        AggregationConfig::new(
            self.operations,
            constant,
            change,
            self.missing_dimension_label
                .unwrap_or_else(default_missing_dimension_label),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        assert_eq!(Operation::sum("students").output_name(), "students_sum");
        assert_eq!(
            Operation::count_distinct("name").output_name(),
            "name_count_distinct"
        );
        assert_eq!(
            Operation::percent_of_total_categorical("year").output_name(),
            "year_percent_of_total_categorical"
        );
        assert_eq!(
            Operation::percent_of_total_numeric("students", OfTotal::All).output_name(),
            "students_percent_of_total_numeric"
        );
        assert_eq!(
            Operation::percent_of_total_numeric(
                "students",
                OfTotal::Dimensions(vec!["college".into(), "year".into()])
            )
            .output_name(),
            "students_percent_of_total_numeric_college_year"
        );
        assert_eq!(
            Operation::of_complement(Statistic::Mean, "students_sum", ["college"]).output_name(),
            "students_sum_mean_of_complement"
        );
    }

    #[test]
    fn test_record_parsing() {
        let op: Operation = serde_json::from_str(
            r#"{"operation":"median_of_complement","column":"grade","of_complement":["name"]}"#,
        )
        .unwrap();
        assert_eq!(op, Operation::of_complement(Statistic::Median, "grade", ["name"]));

        let op: Operation = serde_json::from_str(
            r#"{"operation":"percent_of_total_numeric","column":"grade","of_total":"*"}"#,
        )
        .unwrap();
        assert_eq!(op, Operation::percent_of_total_numeric("grade", OfTotal::All));

        let op: Operation = serde_json::from_str(
            r#"{"operation":"percent_of_total_numeric","column":"grade","of_total":["*"]}"#,
        )
        .unwrap();
        assert_eq!(op, Operation::percent_of_total_numeric("grade", OfTotal::All));
    }

    #[test]
    fn test_record_rejections() {
        let unknown = serde_json::from_str::<Operation>(r#"{"operation":"mode","column":"x"}"#);
        assert!(unknown.unwrap_err().to_string().contains("unknown operation 'mode'"));

        let missing = serde_json::from_str::<Operation>(
            r#"{"operation":"percent_of_total_numeric","column":"x"}"#,
        );
        assert!(missing.unwrap_err().to_string().contains("of_total"));

        let extra = serde_json::from_str::<Operation>(
            r#"{"operation":"sum","column":"x","of_complement":["a"]}"#,
        );
        assert!(extra.unwrap_err().to_string().contains("does not accept"));

        let own = serde_json::from_str::<Operation>(
            r#"{"operation":"percent_of_total_numeric","column":"x","of_total":["x"]}"#,
        );
        assert!(own.unwrap_err().to_string().contains("own of_total"));
    }

    #[test]
    fn test_record_round_trip_keeps_wildcard() {
        let record = OperationRecord::from(Operation::percent_of_total_numeric("x", OfTotal::All));
        assert_eq!(record.of_total, Some(OfTotalRecord::Wildcard("*".to_string())));
        assert_eq!(record.operation, "percent_of_total_numeric");
    }

    #[test]
    fn test_dimension_set_rules() {
        assert_eq!(
            DimensionSet::new(Vec::<String>::new()).unwrap_err(),
            ConfigurationError::EmptyDimensionSet
        );
        assert_eq!(
            DimensionSet::new(["a", "b", "a"]).unwrap_err(),
            ConfigurationError::DuplicateDimension { column: "a".into() }
        );
        let set = DimensionSet::new(["a", "b"]).unwrap();
        assert!(set.contains("b"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_builder_returns_new_values() {
        let base = AggregationConfig::builder().operation(Operation::sum("students"));
        let by_college = base.clone().constant(["college"]).build().unwrap();
        let by_year = base.constant(["year"]).build().unwrap();

        assert_eq!(by_college.dimensions_constant()[0].columns(), ["college"]);
        assert_eq!(by_year.dimensions_constant()[0].columns(), ["year"]);
        assert_eq!(by_college.missing_dimension_label(), "(no value)");
    }

    #[test]
    fn test_builder_requires_constant_dimensions() {
        let err = AggregationConfig::builder()
            .operation(Operation::sum("students"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyConstantDimensions);
    }

    #[test]
    fn test_reserved_and_duplicate_outputs() {
        let err = AggregationConfig::builder()
            .constant(["agg_dim$names"])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::ReservedColumnName { .. }));

        let err = AggregationConfig::builder()
            .constant(["college"])
            .operation(Operation::sum("students"))
            .operation(Operation::sum("students"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateOutputColumn {
                column: "students_sum".into()
            }
        );
    }

    #[test]
    fn test_config_json() {
        let config = AggregationConfig::from_json(
            r#"{
                "operations": [{"operation": "mean", "column": "grade"}],
                "dimensions_constant": [["name"]],
                "dimensions_change": [["subject"], ["year"], ["subject", "year"]]
            }"#,
        )
        .unwrap();
        assert_eq!(config.operations(), [Operation::mean("grade")]);
        assert_eq!(config.dimensions_change().len(), 3);

        let again = AggregationConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn test_config_json_overlap_rejected() {
        let err = AggregationConfig::from_json(
            r#"{
                "operations": [],
                "dimensions_constant": [["name"]],
                "dimensions_change": [["name"]]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidJson(msg) if msg.contains("'name'")));
    }
}
