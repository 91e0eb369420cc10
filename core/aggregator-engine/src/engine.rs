//! FILENAME: core/aggregator-engine/src/engine.rs
//! Aggregation Engine - evaluates the operation list for one grouping.
//!
//! Algorithm:
//! 1. Group the detail rows by the grouping's dimensions (first-seen order)
//! 2. Evaluate the operations in list order; each produces one value per group
//! 3. An operation whose column names an earlier output reduces that output,
//!    treating each group as a single row
//! 4. Percent-of-total and complement operations roll the per-group values up
//!    to coarser keys (a projection of the group key) instead of rescanning rows

use log::trace;
use rustc_hash::FxHashMap;

use datatable::Value;

use crate::accumulator::{Accumulator, Rejection};
use crate::cache::{FieldCache, GroupIndex, GroupKey, SourceCache};
use crate::definition::{OfTotal, Operation, Statistic};
use crate::error::{ConfigurationError, DataError, Result};
use crate::planner::Grouping;

// ============================================================================
// RESULT
// ============================================================================

/// The evaluated rows of one grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingResult {
    /// Dimension values of each group, in the grouping's column order.
    pub dimension_values: Vec<Vec<Value>>,
    /// One column per operation, each holding one value per group.
    pub outputs: Vec<Vec<Value>>,
}

impl GroupingResult {
    pub fn row_count(&self) -> usize {
        self.dimension_values.len()
    }
}

// ============================================================================
// ROW SPACES
// ============================================================================

/// The rows an operation reduces.
#[derive(Debug, Clone, Copy)]
enum Rows<'r> {
    /// Detail rows of the source table, one value per source row.
    Detail(&'r [Value]),
    /// An earlier output of this grouping, one value per group.
    Grouped(&'r [Value]),
}

impl<'r> Rows<'r> {
    fn values(&self) -> &'r [Value] {
        match self {
            Rows::Detail(values) | Rows::Grouped(values) => values,
        }
    }
}

fn data_error(rejection: Rejection, column: &str, operation: &str) -> DataError {
    match rejection {
        Rejection::NonNumeric(value) => DataError::NonNumeric {
            column: column.to_string(),
            operation: operation.to_string(),
            value_kind: value.kind_name().to_string(),
            value: value.to_string(),
        },
        Rejection::Incomparable => DataError::IncomparableValues {
            column: column.to_string(),
            operation: operation.to_string(),
        },
    }
}

// ============================================================================
// OPERATION EVALUATOR
// ============================================================================

/// Evaluates operations, in order, over one grouping.
pub struct OperationEvaluator<'c, 'a> {
    cache: &'c SourceCache<'a>,
    grouping: &'c Grouping,
    fields: Vec<&'c FieldCache>,
    index: GroupIndex,
    /// Outputs produced so far, by output column name.
    outputs: Vec<(String, Vec<Value>)>,
}

impl<'c, 'a> OperationEvaluator<'c, 'a> {
    /// Groups the source rows by the grouping's dimensions.
    pub fn new(cache: &'c SourceCache<'a>, grouping: &'c Grouping) -> Result<Self> {
        let fields = cache.fields_for(&grouping.dimensions)?;
        let index = cache.group_by(&grouping.dimensions)?;

        trace!(
            target: "EVAL",
            "grouping [{}]: {} rows -> {} groups",
            grouping.describe(),
            index.row_count(),
            index.group_count()
        );

        Ok(OperationEvaluator {
            cache,
            grouping,
            fields,
            index,
            outputs: Vec::new(),
        })
    }

    pub fn group_count(&self) -> usize {
        self.index.group_count()
    }

    /// Evaluates one operation and records its output column.
    pub fn evaluate(&mut self, operation: &Operation) -> Result<&[Value]> {
        let values = self.compute(operation)?;
        debug_assert_eq!(values.len(), self.group_count());
        self.outputs.push((operation.output_name(), values));
        Ok(self.outputs.last().map_or(&[][..], |(_, v)| v.as_slice()))
    }

    /// Resolves the dimension values of every group and hands back all outputs.
    pub fn finish(self) -> GroupingResult {
        let dimension_values = self
            .index
            .keys()
            .iter()
            .map(|key| {
                key.values
                    .iter()
                    .zip(&self.fields)
                    .map(|(&id, field)| field.value(id).clone())
                    .collect()
            })
            .collect();

        GroupingResult {
            dimension_values,
            outputs: self.outputs.into_iter().map(|(_, values)| values).collect(),
        }
    }

    fn compute(&self, operation: &Operation) -> Result<Vec<Value>> {
        let name = operation.kind_name();
        match operation {
            Operation::Statistic { statistic, column } => {
                let rows = self.rows_for(&name, column)?;
                Ok(self.reduce_per_group(rows, *statistic, &name, column)?)
            }
            Operation::PercentOfTotalCategorical { column } => {
                self.percent_of_total_categorical(column)
            }
            Operation::PercentOfTotalNumeric { column, of_total } => {
                let rows = self.rows_for(&name, column)?;
                self.percent_of_total_numeric(rows, &name, column, of_total)
            }
            Operation::OfComplement {
                statistic,
                column,
                of_complement,
            } => {
                let rows = self.rows_for(&name, column)?;
                self.of_complement(rows, *statistic, &name, column, of_complement)
            }
        }
    }

    /// Finds the rows behind a column name. Earlier outputs shadow source columns.
    fn rows_for(&self, operation: &str, column: &str) -> Result<Rows<'_>> {
        if let Some((_, values)) = self.outputs.iter().rev().find(|(name, _)| name == column) {
            return Ok(Rows::Grouped(values));
        }
        if let Some(source) = self.cache.table().column(column) {
            return Ok(Rows::Detail(source.values()));
        }
        Err(ConfigurationError::UnknownColumn {
            operation: operation.to_string(),
            column: column.to_string(),
        }
        .into())
    }

    fn group_of(&self, rows: Rows<'_>, row: usize) -> usize {
        match rows {
            Rows::Detail(_) => self.index.group_of(row),
            Rows::Grouped(_) => row,
        }
    }

    /// Positions of `columns` in the grouping, or `None` if one is absent.
    fn positions(&self, columns: &[String]) -> Option<Vec<usize>> {
        columns.iter().map(|c| self.grouping.position(c)).collect()
    }

    // ========================================================================
    // SIMPLE STATISTICS
    // ========================================================================

    fn reduce_per_group(
        &self,
        rows: Rows<'_>,
        statistic: Statistic,
        operation: &str,
        column: &str,
    ) -> std::result::Result<Vec<Value>, DataError> {
        let mut accumulators: Vec<Accumulator> = (0..self.group_count())
            .map(|_| Accumulator::new(statistic))
            .collect();

        for (row, value) in rows.values().iter().enumerate() {
            accumulators[self.group_of(rows, row)]
                .push(value)
                .map_err(|r| data_error(r, column, operation))?;
        }

        Ok(accumulators.into_iter().map(Accumulator::finish).collect())
    }

    // ========================================================================
    // PERCENT OF TOTAL
    // ========================================================================

    /// Rows per group over rows per parent group (the grouping without `column`).
    fn percent_of_total_categorical(&self, column: &str) -> Result<Vec<Value>> {
        let Some(own) = self.grouping.position(column) else {
            return Err(ConfigurationError::CategoricalNotGrouped {
                column: column.to_string(),
                grouping: self.grouping.describe(),
            }
            .into());
        };

        let parent_positions: Vec<usize> =
            (0..self.grouping.dimensions.len()).filter(|&p| p != own).collect();
        let sizes = self.index.sizes();

        let parent_keys: Vec<GroupKey> = self
            .index
            .keys()
            .iter()
            .map(|k| k.project(&parent_positions))
            .collect();

        let mut parent_sizes: FxHashMap<&GroupKey, usize> = FxHashMap::default();
        for (key, &size) in parent_keys.iter().zip(sizes) {
            *parent_sizes.entry(key).or_insert(0) += size;
        }

        Ok(parent_keys
            .iter()
            .zip(sizes)
            .map(|(key, &size)| match parent_sizes.get(key) {
                Some(&total) if total > 0 => Value::Number(size as f64 / total as f64),
                _ => Value::Null,
            })
            .collect())
    }

    /// Sum per group over the sum per `of_total` group.
    ///
    /// Only the `of_total` dimensions that are part of this grouping take part in
    /// the match; with none of them (or `*`) the denominator is the grand total.
    fn percent_of_total_numeric(
        &self,
        rows: Rows<'_>,
        operation: &str,
        column: &str,
        of_total: &OfTotal,
    ) -> Result<Vec<Value>> {
        let sums: Vec<f64> = self
            .reduce_per_group(rows, Statistic::Sum, operation, column)?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0))
            .collect();

        let join_positions: Vec<usize> = match of_total {
            OfTotal::All => Vec::new(),
            OfTotal::Dimensions(dims) => dims
                .iter()
                .filter_map(|d| self.grouping.position(d))
                .collect(),
        };

        let join_keys: Vec<GroupKey> = self
            .index
            .keys()
            .iter()
            .map(|k| k.project(&join_positions))
            .collect();

        let mut totals: FxHashMap<&GroupKey, f64> = FxHashMap::default();
        for (key, &sum) in join_keys.iter().zip(&sums) {
            *totals.entry(key).or_insert(0.0) += sum;
        }

        Ok(join_keys
            .iter()
            .zip(&sums)
            .map(|(key, &sum)| match totals.get(key) {
                Some(&total) if total != 0.0 => Value::Number(sum / total),
                _ => Value::Null,
            })
            .collect())
    }

    // ========================================================================
    // COMPLEMENT (LEAVE-ONE-OUT) STATISTICS
    // ========================================================================

    /// For each group, `statistic` over the per-group values of every other
    /// group in the same context partition with a different complement key.
    ///
    /// Null for every row of a change grouping, and for a grouping that does
    /// not contain all `of_complement` columns.
    fn of_complement(
        &self,
        rows: Rows<'_>,
        statistic: Statistic,
        operation: &str,
        column: &str,
        of_complement: &[String],
    ) -> Result<Vec<Value>> {
        let group_count = self.group_count();
        if !self.grouping.is_constant() {
            return Ok(vec![Value::Null; group_count]);
        }
        let Some(complement_positions) = self.positions(of_complement) else {
            return Ok(vec![Value::Null; group_count]);
        };
        let context_positions: Vec<usize> = (0..self.grouping.dimensions.len())
            .filter(|p| !complement_positions.contains(p))
            .collect();

        let base = self.reduce_per_group(rows, statistic, operation, column)?;

        let keys = self.index.keys();
        let complement_keys: Vec<GroupKey> =
            keys.iter().map(|k| k.project(&complement_positions)).collect();
        let context_keys: Vec<GroupKey> =
            keys.iter().map(|k| k.project(&context_positions)).collect();

        let mut partitions: FxHashMap<&GroupKey, Vec<usize>> = FxHashMap::default();
        for (group, key) in context_keys.iter().enumerate() {
            partitions.entry(key).or_default().push(group);
        }

        let mut result = Vec::with_capacity(group_count);
        for group in 0..group_count {
            let members = partitions
                .get(&context_keys[group])
                .map_or(&[][..], Vec::as_slice);

            let mut accumulator = Accumulator::new(statistic);
            let mut population = 0usize;
            for &other in members {
                if complement_keys[other] == complement_keys[group] {
                    continue;
                }
                population += 1;
                accumulator
                    .push(&base[other])
                    .map_err(|r| data_error(r, column, operation))?;
            }

            result.push(if population > 0 {
                accumulator.finish()
            } else {
                Value::Null
            });
        }

        Ok(result)
    }
}

/// Evaluates every operation, in order, over one grouping.
pub fn evaluate_grouping(
    cache: &SourceCache<'_>,
    grouping: &Grouping,
    operations: &[Operation],
) -> Result<GroupingResult> {
    let mut evaluator = OperationEvaluator::new(cache, grouping)?;
    for operation in operations {
        evaluator.evaluate(operation)?;
    }
    Ok(evaluator.finish())
}
