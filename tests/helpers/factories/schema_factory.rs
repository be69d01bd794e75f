use std::collections::HashMap;

use crate::dataset::ColumnSchema;

pub struct SchemaFactory {
    names: Vec<String>,
    types: Vec<String>,
    dedup_index: Option<HashMap<String, usize>>,
    include_timestamp: bool,
}

impl SchemaFactory {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            types: Vec::new(),
            dedup_index: None,
            include_timestamp: true,
        }
    }

    pub fn with_column(mut self, name: &str, type_name: &str) -> Self {
        self.names.push(name.to_string());
        self.types.push(type_name.to_string());
        self
    }

    pub fn with_dedup_index(mut self, entries: &[(&str, usize)]) -> Self {
        self.dedup_index = Some(
            entries
                .iter()
                .map(|(name, idx)| (name.to_string(), *idx))
                .collect(),
        );
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.include_timestamp = false;
        self
    }

    pub fn raw_names(&self) -> &[String] {
        &self.names
    }

    pub fn raw_types(&self) -> &[String] {
        &self.types
    }

    pub fn dedup_index(&self) -> Option<&HashMap<String, usize>> {
        self.dedup_index.as_ref()
    }

    pub fn create(self) -> ColumnSchema {
        ColumnSchema::resolve(
            &self.names,
            &self.types,
            self.dedup_index.as_ref(),
            self.include_timestamp,
        )
        .expect("resolve schema")
    }
}
