//! Paginated, typed query results.

use core::ops::Index;

use compact_str::CompactString;

use crate::value::Value;

/// One decoded row: registered column names to cast values, in projection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(CompactString, Value)>,
}

impl Record {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<CompactString>, value: Value) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Field names, in projection order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// Panics if the record has no field `name`.
    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no field {name:?} in record"),
        }
    }
}

/// One page of records plus the pagination metadata needed to navigate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    page: u64,
    page_size: u64,
    total_count: u64,
    records: Vec<Record>,
}

impl ResultSet {
    pub(crate) fn new(page: u64, page_size: u64, total_count: u64, records: Vec<Record>) -> Self {
        Self {
            page,
            page_size,
            total_count,
            records,
        }
    }

    pub fn current_page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.page_size
    }

    /// Rows matching the filters across all pages.
    pub fn total_entries(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn previous_page(&self) -> Option<u64> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u64> {
        (self.page < self.total_pages()).then(|| self.page + 1)
    }

    pub fn has_previous(&self) -> bool {
        self.previous_page().is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_page().is_some()
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.page > self.total_pages()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Index<usize> for ResultSet {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Record;
    type IntoIter = core::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: i64) -> Record {
        let mut record = Record::with_capacity(2);
        record.push("id", Value::Integer(n));
        record.push("name", Value::from(format!("row {n}")));
        record
    }

    #[test]
    fn navigation_in_the_middle() {
        let set = ResultSet::new(2, 4, 10, (5..9).map(record).collect());
        assert_eq!(set.total_pages(), 3);
        assert_eq!(set.offset(), 4);
        assert_eq!(set.previous_page(), Some(1));
        assert_eq!(set.next_page(), Some(3));
        assert!(!set.is_out_of_bounds());
        assert_eq!(set.len(), 4);
        assert_eq!(set[0]["id"], Value::Integer(5));
    }

    #[test]
    fn first_and_last_pages() {
        let first = ResultSet::new(1, 5, 10, Vec::new());
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = ResultSet::new(2, 5, 10, Vec::new());
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn past_the_end_is_out_of_bounds() {
        let set = ResultSet::new(7, 5, 10, Vec::new());
        assert!(set.is_out_of_bounds());
        assert!(set.is_empty());
    }

    #[test]
    fn empty_unpaged_result() {
        let set = ResultSet::new(1, 0, 0, Vec::new());
        assert_eq!(set.total_pages(), 0);
        assert_eq!(set.next_page(), None);
        assert_eq!(set.previous_page(), None);
    }

    #[test]
    fn record_accessors() {
        let record = record(3);
        assert_eq!(record.members().collect::<Vec<_>>(), ["id", "name"]);
        assert_eq!(record.get("name"), Some(&Value::from("row 3")));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.iter().count(), 2);
    }
}
