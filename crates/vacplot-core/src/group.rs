#![forbid(unsafe_code)]

//! Grouping of records by municipality.
//!
//! # Invariants
//!
//! 1. Every record belongs to exactly one group.
//! 2. Groups appear in first-occurrence order of their key.
//! 3. Members keep input order within their group.
//! 4. [`Groups::lookup`] never fails: an unknown key yields an empty group.

use std::borrow::Cow;

use ahash::AHashMap;

use crate::record::{Dataset, Record, RecordId};

/// Records sharing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    key: String,
    members: Vec<RecordId>,
}

impl Group {
    /// A group with no members.
    #[must_use]
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            members: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Members in input order.
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[RecordId] {
        &self.members
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Ordered collection of groups with key lookup.
#[derive(Debug, Clone, Default)]
pub struct Groups {
    groups: Vec<Group>,
    index: AHashMap<String, usize>,
}

impl Groups {
    /// Group a dataset by its `municipality` field.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::group_by(dataset.iter(), |record| record.municipality.as_str())
    }

    /// Group records by an arbitrary string key.
    pub fn group_by<'a, I, F>(records: I, key_of: F) -> Self
    where
        I: IntoIterator<Item = (RecordId, &'a Record)>,
        F: Fn(&Record) -> &str,
    {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: AHashMap<String, usize> = AHashMap::new();
        for (id, record) in records {
            let key = key_of(record);
            let slot = match index.get(key) {
                Some(&slot) => slot,
                None => {
                    let slot = groups.len();
                    groups.push(Group::empty(key));
                    index.insert(key.to_string(), slot);
                    slot
                }
            };
            groups[slot].members.push(id);
        }
        Self { groups, index }
    }

    /// Group for `key`, or an empty group carrying `key` when there is none.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Cow<'_, Group> {
        match self.get(key) {
            Some(group) => Cow::Borrowed(group),
            None => Cow::Owned(Group::empty(key)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Group> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    /// Group keys in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(Group::key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a Groups {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
