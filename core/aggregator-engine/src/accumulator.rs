//! FILENAME: core/aggregator-engine/src/accumulator.rs
//! Incremental reducers for every `Statistic`.
//!
//! Conventions:
//! - `count` counts rows, nulls included; every other reducer skips nulls.
//! - `sum` of no values is 0; `mean`, `median`, `max`, `min` of no values are null.
//! - `std` is the sample standard deviation (n - 1), null below two values.
//!   Variance is accumulated with Welford's algorithm for numerical stability.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use datatable::Value;

use crate::cache::CacheValue;
use crate::definition::Statistic;

/// Why a value was refused by an accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// A numeric reducer met a non-numeric value.
    NonNumeric(Value),
    /// `max`/`min` met values that cannot be ordered against each other.
    Incomparable,
}

/// Running state of one statistic over one group.
#[derive(Debug, Clone)]
pub struct Accumulator {
    statistic: Statistic,
    rows: u64,
    count_numbers: u64,
    sum: f64,
    mean: f64,
    m2: f64,
    numbers: Vec<f64>,
    extreme: Option<Value>,
    distinct: FxHashSet<CacheValue>,
}

impl Accumulator {
    pub fn new(statistic: Statistic) -> Self {
        Accumulator {
            statistic,
            rows: 0,
            count_numbers: 0,
            sum: 0.0,
            mean: 0.0,
            m2: 0.0,
            numbers: Vec::new(),
            extreme: None,
            distinct: FxHashSet::default(),
        }
    }

    /// Adds one row's value.
    pub fn push(&mut self, value: &Value) -> Result<(), Rejection> {
        self.rows += 1;
        if value.is_null() {
            return Ok(());
        }

        match self.statistic {
            Statistic::Count => {}
            Statistic::CountDistinct => {
                self.distinct.insert(CacheValue::from(value));
            }
            Statistic::Max => self.push_extreme(value, Ordering::Greater)?,
            Statistic::Min => self.push_extreme(value, Ordering::Less)?,
            Statistic::Sum | Statistic::Mean | Statistic::Std | Statistic::Median => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| Rejection::NonNumeric(value.clone()))?;
                self.add_number(n);
            }
        }

        Ok(())
    }

    fn add_number(&mut self, value: f64) {
        self.count_numbers += 1;
        self.sum += value;

        // Welford's algorithm for variance
        let delta = value - self.mean;
        self.mean += delta / (self.count_numbers as f64);
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if self.statistic == Statistic::Median {
            self.numbers.push(value);
        }
    }

    /// Keeps `value` if it compares as `wanted` against the current extreme.
    fn push_extreme(&mut self, value: &Value, wanted: Ordering) -> Result<(), Rejection> {
        let replace = match &self.extreme {
            None => true,
            Some(current) => compare(value, current).ok_or(Rejection::Incomparable)? == wanted,
        };
        if replace {
            self.extreme = Some(value.clone());
        }
        Ok(())
    }

    /// Computes the final value.
    pub fn finish(self) -> Value {
        match self.statistic {
            Statistic::Count => Value::Number(self.rows as f64),
            Statistic::CountDistinct => Value::Number(self.distinct.len() as f64),
            Statistic::Sum => Value::Number(self.sum),
            Statistic::Mean => {
                if self.count_numbers > 0 {
                    Value::Number(self.sum / (self.count_numbers as f64))
                } else {
                    Value::Null
                }
            }
            Statistic::Std => {
                if self.count_numbers > 1 {
                    Value::Number((self.m2 / ((self.count_numbers - 1) as f64)).sqrt())
                } else {
                    Value::Null
                }
            }
            Statistic::Median => median(self.numbers).map_or(Value::Null, Value::Number),
            Statistic::Max | Statistic::Min => self.extreme.unwrap_or(Value::Null),
        }
    }
}

/// Orders two non-null values of the same kind.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(x.total_cmp(y)),
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn median(mut numbers: Vec<f64>) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }
    numbers.sort_by(f64::total_cmp);
    let mid = numbers.len() / 2;
    if numbers.len() % 2 == 0 {
        Some((numbers[mid - 1] + numbers[mid]) / 2.0)
    } else {
        Some(numbers[mid])
    }
}

/// Reduces a sequence of values in one go.
pub fn reduce<'v>(
    statistic: Statistic,
    values: impl IntoIterator<Item = &'v Value>,
) -> Result<Value, Rejection> {
    let mut acc = Accumulator::new(statistic);
    for value in values {
        acc.push(value)?;
    }
    Ok(acc.finish())
}
