use std::collections::HashMap;

use crate::models::{AggregateEntry, GroupField, GroupKey, GroupSpec, PointRecord};

/// Sum points and people for each distinct key combination.
///
/// Entries come back in order of first occurrence. Callers that need an
/// ordering sort explicitly (see [`rank`](super::rank)).
pub fn aggregate(records: &[PointRecord], group_by: &GroupSpec) -> Vec<AggregateEntry> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut entries: Vec<AggregateEntry> = Vec::new();

    for record in records {
        let key = group_by.key_for(record);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            let mut entry = AggregateEntry::new(key);
            if group_by.contains(GroupField::Nation) {
                entry.nation_name = record.nation_name.clone();
            }
            entries.push(entry);
            entries.len() - 1
        });
        entries[slot].add(record);
    }

    entries
}
