#[cfg(test)]
#[path = "gallery_test.rs"]
mod tests;

use crate::domain::models::GenerationRecord;

/// Session gallery, newest record first. Records are only ever added.
#[derive(Default)]
pub struct Gallery {
    records: Vec<GenerationRecord>,
}

impl Gallery {
    pub fn prepend(&mut self, record: GenerationRecord) {
        self.records.insert(0, record);
    }

    pub fn records(&self) -> &[GenerationRecord] {
        return &self.records;
    }

    pub fn get(&self, idx: usize) -> Option<&GenerationRecord> {
        return self.records.get(idx);
    }

    pub fn len(&self) -> usize {
        return self.records.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.records.is_empty();
    }
}
