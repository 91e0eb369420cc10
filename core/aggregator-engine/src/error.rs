//! FILENAME: core/aggregator-engine/src/error.rs

use thiserror::Error;

/// A configuration that cannot be evaluated. Raised before any data is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("at least one constant dimension set is required")]
    EmptyConstantDimensions,

    #[error("a dimension set must name at least one column")]
    EmptyDimensionSet,

    #[error("column '{column}' appears more than once in a dimension set")]
    DuplicateDimension { column: String },

    #[error("column '{column}' is in both the constant and the change part of a grouping")]
    OverlappingDimension { column: String },

    #[error("dimension '{column}' is not a column of the source table")]
    UnknownDimension { column: String },

    #[error("operation {operation} targets unknown column '{column}'")]
    UnknownColumn { operation: String, column: String },

    #[error("percent_of_total_categorical column '{column}' is not a dimension of grouping [{grouping}]")]
    CategoricalNotGrouped { column: String, grouping: String },

    #[error("column '{column}' cannot also be listed in its own of_total")]
    ColumnInOfTotal { column: String },

    #[error("invalid of_total value: {value}")]
    InvalidOfTotal { value: String },

    #[error("operation {operation} needs a non-empty of_complement list")]
    EmptyOfComplement { operation: String },

    #[error("column name '{column}' is reserved for filter metadata")]
    ReservedColumnName { column: String },

    #[error("output column '{column}' would be produced more than once")]
    DuplicateOutputColumn { column: String },

    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },

    #[error("operation {operation} requires parameter '{parameter}'")]
    MissingParameter { operation: String, parameter: String },

    #[error("operation {operation} does not accept parameter '{parameter}'")]
    UnexpectedParameter { operation: String, parameter: String },

    #[error("invalid configuration JSON: {0}")]
    InvalidJson(String),
}

/// The data does not support a requested statistic. Raised during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("{operation} needs numeric values but column '{column}' holds {value_kind} value '{value}'")]
    NonNumeric {
        column: String,
        operation: String,
        value_kind: String,
        value: String,
    },

    #[error("{operation} cannot order the mixed values of column '{column}'")]
    IncomparableValues { column: String, operation: String },
}

/// Any failure of an aggregation run. A failed run never yields a partial table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregatorError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl AggregatorError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, AggregatorError::Configuration(_))
    }

    pub fn is_data(&self) -> bool {
        matches!(self, AggregatorError::Data(_))
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
