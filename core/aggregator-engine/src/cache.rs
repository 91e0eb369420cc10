//! FILENAME: core/aggregator-engine/src/cache.rs
//! Source Cache - interned representation of the dimension columns.
//!
//! The cache is designed for:
//! - One O(n) scan of each dimension column, shared by every grouping
//! - Cheap group keys: a key is a short vector of interned value IDs
//! - Deterministic group order: groups are numbered by first occurrence
//!
//! Architecture:
//! - Each distinct dimension value is stored once per field and referenced by ID
//! - Row data is stored per field as a vector of IDs
//! - A `GroupIndex` maps every row of a row space to its group

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use datatable::{Table, Value};

use crate::error::ConfigurationError;

// ============================================================================
// VALUE INTERNING
// ============================================================================

/// A reference to an interned value within a field's unique value store.
pub type ValueId = u32;

/// A normalized, hashable representation of a cell value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheValue {
    Missing,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl From<&Value> for CacheValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CacheValue::Missing,
            Value::Number(n) => CacheValue::Number(OrderedFloat(*n)),
            Value::Text(s) => CacheValue::Text(s.clone()),
            Value::Boolean(b) => CacheValue::Boolean(*b),
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other, and -0.0 equals 0.0.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

// ============================================================================
// FIELD CACHE
// ============================================================================

/// Cache for one dimension column of the source table.
#[derive(Debug, Clone)]
pub struct FieldCache {
    /// Column name in the source table.
    pub name: String,

    /// Map from value to its unique ID (for deduplication during build).
    value_to_id: FxHashMap<CacheValue, ValueId>,

    /// Distinct values in first-seen order (indexed by ValueId).
    id_to_value: Vec<Value>,

    /// ValueId of every source row.
    row_ids: Vec<ValueId>,
}

impl FieldCache {
    /// Interns every value of `values`. Nulls become `missing_label`.
    pub fn build(name: &str, values: &[Value], missing_label: &str) -> Self {
        let mut field = FieldCache {
            name: name.to_string(),
            value_to_id: FxHashMap::default(),
            id_to_value: Vec::new(),
            row_ids: Vec::with_capacity(values.len()),
        };

        for value in values {
            let id = field.intern(value, missing_label);
            field.row_ids.push(id);
        }

        field
    }

    /// Interns a value and returns its ValueId.
    /// If the value already exists, returns the existing ID.
    /// A null shares its ID with a literal `missing_label` text value.
    fn intern(&mut self, value: &Value, missing_label: &str) -> ValueId {
        let stored = match value {
            Value::Null => Value::text(missing_label),
            other => other.clone(),
        };
        let key = CacheValue::from(&stored);
        if let Some(&id) = self.value_to_id.get(&key) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(stored);
        self.value_to_id.insert(key, id);
        id
    }

    /// The display value for an ID.
    pub fn value(&self, id: ValueId) -> &Value {
        &self.id_to_value[id as usize]
    }

    pub fn row_id(&self, row: usize) -> ValueId {
        self.row_ids[row]
    }

    /// Number of distinct values (a null counts once).
    pub fn unique_count(&self) -> usize {
        self.id_to_value.len()
    }
}

// ============================================================================
// GROUP KEY
// ============================================================================

/// A key representing one combination of dimension values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupKey {
    pub values: SmallVec<[ValueId; 4]>,
}

impl GroupKey {
    pub fn new(values: SmallVec<[ValueId; 4]>) -> Self {
        GroupKey { values }
    }

    /// The key restricted to the given positions, in that order.
    pub fn project(&self, positions: &[usize]) -> GroupKey {
        GroupKey {
            values: positions.iter().map(|&p| self.values[p]).collect(),
        }
    }
}

// ============================================================================
// GROUP INDEX
// ============================================================================

/// Assignment of rows to groups. Groups are numbered in order of first occurrence.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    keys: Vec<GroupKey>,
    row_groups: Vec<usize>,
    sizes: Vec<usize>,
}

impl GroupIndex {
    /// Builds the index from one key per row, scanning rows top to bottom.
    pub fn from_row_keys(row_keys: impl IntoIterator<Item = GroupKey>) -> Self {
        let mut lookup: FxHashMap<GroupKey, usize> = FxHashMap::default();
        let mut index = GroupIndex::default();

        for key in row_keys {
            let group = match lookup.get(&key) {
                Some(&g) => g,
                None => {
                    let g = index.keys.len();
                    lookup.insert(key.clone(), g);
                    index.keys.push(key);
                    index.sizes.push(0);
                    g
                }
            };
            index.sizes[group] += 1;
            index.row_groups.push(group);
        }

        index
    }

    pub fn group_count(&self) -> usize {
        self.keys.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_groups.len()
    }

    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    pub fn group_of(&self, row: usize) -> usize {
        self.row_groups[row]
    }

    /// Number of rows in each group.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }
}

// ============================================================================
// SOURCE CACHE
// ============================================================================

/// Interned dimension columns of one source table.
#[derive(Debug)]
pub struct SourceCache<'a> {
    table: &'a Table,
    fields: FxHashMap<String, FieldCache>,
}

impl<'a> SourceCache<'a> {
    /// Interns the named dimension columns of `table`.
    pub fn build<'n>(
        table: &'a Table,
        dimensions: impl IntoIterator<Item = &'n str>,
        missing_label: &str,
    ) -> Result<Self, ConfigurationError> {
        let mut fields = FxHashMap::default();

        for name in dimensions {
            if fields.contains_key(name) {
                continue;
            }
            let column = table
                .column(name)
                .ok_or_else(|| ConfigurationError::UnknownDimension {
                    column: name.to_string(),
                })?;
            fields.insert(
                name.to_string(),
                FieldCache::build(name, column.values(), missing_label),
            );
        }

        Ok(SourceCache { table, fields })
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn field(&self, name: &str) -> Result<&FieldCache, ConfigurationError> {
        self.fields
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownDimension {
                column: name.to_string(),
            })
    }

    /// Resolves a list of dimension names to their field caches.
    pub fn fields_for(&self, dimensions: &[String]) -> Result<Vec<&FieldCache>, ConfigurationError> {
        dimensions.iter().map(|d| self.field(d)).collect()
    }

    /// Groups the detail rows by the given dimensions.
    pub fn group_by(&self, dimensions: &[String]) -> Result<GroupIndex, ConfigurationError> {
        let fields = self.fields_for(dimensions)?;
        Ok(GroupIndex::from_row_keys(
            (0..self.row_count()).map(|row| row_key(&fields, row)),
        ))
    }
}

/// Key of a detail row over the given fields.
pub fn row_key(fields: &[&FieldCache], row: usize) -> GroupKey {
    GroupKey::new(fields.iter().map(|f| f.row_id(row)).collect())
}
