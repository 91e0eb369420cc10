//! FILENAME: core/aggregator-engine/src/lib.rs
//! Aggregation-plan engine.
//!
//! Expands a set of grouping dimensions into every grouping to compute,
//! evaluates an ordered list of statistics over each grouping, and stacks the
//! results into one report table with filter metadata.
//!
//! Layers:
//! - `definition`: Serializable configuration (what to aggregate)
//! - `planner`: Grouping expansion (which groupings, in which order)
//! - `cache`: Interned dimension columns (HOW rows are grouped)
//! - `accumulator`: Per-group reducers
//! - `engine`: Operation evaluation for one grouping
//! - `view`: The unified report (WHAT is returned)

pub mod accumulator;
pub mod cache;
pub mod definition;
pub mod engine;
pub mod error;
pub mod planner;
pub mod validate;
pub mod view;

pub use definition::*;
pub use engine::{evaluate_grouping, GroupingResult, OperationEvaluator};
pub use error::{AggregatorError, ConfigurationError, DataError, Result};
pub use planner::{plan_groupings, Grouping, GroupingKind};
pub use view::{unify, UnifiedTable};

use log::{debug, info};

use datatable::Table;

use crate::cache::SourceCache;

/// Runs one aggregation over `table`.
///
/// The run is all-or-nothing: the configuration is checked against the table
/// before any grouping is evaluated, and the first error aborts the run.
pub fn execute(config: &AggregationConfig, table: &Table) -> Result<UnifiedTable> {
    let groupings = plan_groupings(config.dimensions_constant(), config.dimensions_change())?;
    validate::validate(config, table, &groupings)?;

    info!(
        target: "AGG",
        "aggregating {} rows: {} groupings, {} operations",
        table.row_count(),
        groupings.len(),
        config.operations().len()
    );

    let cache = SourceCache::build(
        table,
        groupings
            .iter()
            .flat_map(|g| g.dimensions.iter().map(String::as_str)),
        config.missing_dimension_label(),
    )?;

    let results = evaluate_all(&cache, &groupings, config.operations())?;

    for (grouping, result) in groupings.iter().zip(&results) {
        debug!(
            target: "EVAL",
            "grouping [{}] produced {} rows",
            grouping.describe(),
            result.row_count()
        );
    }

    let unified = unify(&groupings, &results, config.operations());

    info!(
        target: "AGG",
        "aggregation complete: {} rows x {} columns",
        unified.row_count(),
        unified.columns().len()
    );

    Ok(unified)
}

fn evaluate_all(
    cache: &SourceCache<'_>,
    groupings: &[Grouping],
    operations: &[Operation],
) -> Result<Vec<GroupingResult>> {
    #[cfg(feature = "parallel")]
    {
        evaluate_parallel(cache, groupings, operations)
    }
    #[cfg(not(feature = "parallel"))]
    {
        evaluate_sequential(cache, groupings, operations)
    }
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn evaluate_sequential(
    cache: &SourceCache<'_>,
    groupings: &[Grouping],
    operations: &[Operation],
) -> Result<Vec<GroupingResult>> {
    groupings
        .iter()
        .map(|grouping| evaluate_grouping(cache, grouping, operations))
        .collect()
}

/// Groupings are independent; rayon keeps the collected results in input order.
#[cfg(feature = "parallel")]
fn evaluate_parallel(
    cache: &SourceCache<'_>,
    groupings: &[Grouping],
    operations: &[Operation],
) -> Result<Vec<GroupingResult>> {
    use rayon::prelude::*;

    groupings
        .par_iter()
        .map(|grouping| evaluate_grouping(cache, grouping, operations))
        .collect()
}
