use std::collections::HashMap;

use super::data_type::DataType;
use super::errors::DataSetError;

/// Display name of the synthetic timestamp column.
pub const TIMESTAMP_COLUMN: &str = "Time";

/// Ordinal of the first data column. Ordinal 1 belongs to Time.
pub const START_INDEX: usize = 2;

/// Where a column name points once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Time,
    Slot(usize),
}

/// Column layout of one result set, fixed at construction.
///
/// `names` is the display list exactly as the server sent it (duplicates kept,
/// Time prepended when timestamps are included) and backs positional lookups.
/// `ordinals` maps each distinct name to its 1-based ordinal; data ordinals start
/// at [`START_INDEX`] so `ordinal - 2` is the storage slot in `types`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    names: Vec<String>,
    ordinals: HashMap<String, usize>,
    types: Vec<DataType>,
    slot_names: Vec<String>,
    include_timestamp: bool,
}

impl ColumnSchema {
    /// Builds the schema from the server's raw, possibly duplicated, column list.
    ///
    /// With `dedup_index`, the server dictates each distinct name's slot. Without it,
    /// slots are handed out in first-seen order. Repeats of a name always share the
    /// slot of its first occurrence.
    pub fn resolve(
        raw_names: &[String],
        raw_types: &[String],
        dedup_index: Option<&HashMap<String, usize>>,
        include_timestamp: bool,
    ) -> Result<Self, DataSetError> {
        if raw_names.len() != raw_types.len() {
            return Err(DataSetError::InvalidSchema(format!(
                "{} column names but {} column types",
                raw_names.len(),
                raw_types.len()
            )));
        }

        let mut names = Vec::with_capacity(raw_names.len() + 1);
        let mut ordinals = HashMap::with_capacity(raw_names.len() + 1);
        if include_timestamp {
            names.push(TIMESTAMP_COLUMN.to_string());
            ordinals.insert(TIMESTAMP_COLUMN.to_string(), 1);
        }

        let (types, slot_names) = match dedup_index {
            Some(index) => {
                let mut types: Vec<Option<DataType>> = vec![None; index.len()];
                let mut slot_names = vec![String::new(); index.len()];
                for (name, type_name) in raw_names.iter().zip(raw_types) {
                    names.push(name.clone());
                    if ordinals.contains_key(name) {
                        continue;
                    }
                    let slot = *index.get(name).ok_or_else(|| {
                        DataSetError::InvalidSchema(format!(
                            "column {name} missing from the deduplication index"
                        ))
                    })?;
                    if slot >= types.len() {
                        return Err(DataSetError::InvalidSchema(format!(
                            "column {name} mapped to slot {slot} of {}",
                            types.len()
                        )));
                    }
                    ordinals.insert(name.clone(), slot + START_INDEX);
                    types[slot] = Some(type_name.parse()?);
                    slot_names[slot] = name.clone();
                }
                let types = types
                    .into_iter()
                    .enumerate()
                    .map(|(slot, t)| {
                        t.ok_or_else(|| {
                            DataSetError::InvalidSchema(format!("slot {slot} has no column"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (types, slot_names)
            }
            None => {
                let mut types: Vec<DataType> = Vec::new();
                let mut slot_names = Vec::new();
                for (name, type_name) in raw_names.iter().zip(raw_types) {
                    names.push(name.clone());
                    if ordinals.contains_key(name) {
                        continue;
                    }
                    ordinals.insert(name.clone(), types.len() + START_INDEX);
                    types.push(type_name.parse()?);
                    slot_names.push(name.clone());
                }
                (types, slot_names)
            }
        };

        Ok(Self {
            names,
            ordinals,
            types,
            slot_names,
            include_timestamp,
        })
    }

    pub fn include_timestamp(&self) -> bool {
        self.include_timestamp
    }

    /// Display names, duplicates included.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of display columns (Time counts when present).
    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    /// Deduplicated data column types, indexed by slot.
    pub fn column_types(&self) -> &[DataType] {
        &self.types
    }

    /// Number of storage slots, i.e. distinct data columns.
    pub fn slot_count(&self) -> usize {
        self.types.len()
    }

    pub fn slot_name(&self, slot: usize) -> &str {
        &self.slot_names[slot]
    }

    pub fn slot_type(&self, slot: usize) -> DataType {
        self.types[slot]
    }

    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.ordinals.get(name).copied()
    }

    pub fn resolve_name(&self, name: &str) -> Result<ColumnRef, DataSetError> {
        match self.ordinal(name) {
            Some(1) if self.include_timestamp => Ok(ColumnRef::Time),
            Some(ordinal) if ordinal >= START_INDEX => Ok(ColumnRef::Slot(ordinal - START_INDEX)),
            _ => Err(DataSetError::UnknownColumn(name.to_string())),
        }
    }

    /// Display name at a 1-based position.
    pub fn name_at(&self, index: usize) -> Result<&str, DataSetError> {
        if index == 0 || index > self.names.len() {
            return Err(DataSetError::IndexOutOfRange {
                index,
                count: self.names.len(),
            });
        }
        Ok(&self.names[index - 1])
    }
}
