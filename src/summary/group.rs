//! Group-by breakdown shared by the module and smart-lock rollups.

use serde::Serialize;
use std::collections::HashMap;

/// Totals for one group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub total: usize,
    /// Records in the group matching the variant's completion predicate
    /// (done modules, installed locks).
    pub completed: usize,
}

/// Accumulates groups in first-seen key order.
#[derive(Debug, Default)]
pub(crate) struct Grouper {
    index: HashMap<String, usize>,
    groups: Vec<GroupCount>,
}

impl Grouper {
    pub(crate) fn add(&mut self, key: &str, completed: bool) {
        let slot = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.to_string(), self.groups.len());
                self.groups.push(GroupCount {
                    key: key.to_string(),
                    total: 0,
                    completed: 0,
                });
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[slot];
        group.total += 1;
        if completed {
            group.completed += 1;
        }
    }

    pub(crate) fn finish(self) -> Vec<GroupCount> {
        self.groups
    }
}

/// Looks a group up by key.
pub fn find<'a>(groups: &'a [GroupCount], key: &str) -> Option<&'a GroupCount> {
    groups.iter().find(|g| g.key == key)
}

/// Groups sorted by descending total, cut to at most `limit` entries.
///
/// Ties keep their first-seen order. The rollups themselves never truncate;
/// this is for display.
pub fn ranked(groups: &[GroupCount], limit: usize) -> Vec<GroupCount> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| b.total.cmp(&a.total));
    sorted.truncate(limit);
    sorted
}
