//! People who can be assigned to slots.
//!
//! A person is identified by a stable integer id for the duration of a run
//! and carries the display name that ends up in projected schedules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable identifier of a person within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PersonId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A person who reported availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique person identifier.
    pub id: PersonId,
    /// Display name.
    pub name: String,
}

impl Person {
    /// Creates a new person.
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The person table of a run (`id → name`).
///
/// Exclusion removes a person as a possible assignee; the id stays
/// resolvable so that it can still be recognised in raw availability data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    people: BTreeMap<PersonId, String>,
    #[serde(default)]
    excluded: BTreeSet<PersonId>,
}

impl Roster {
    /// Creates a roster from a list of people.
    pub fn new(people: impl IntoIterator<Item = Person>) -> Self {
        Self {
            people: people.into_iter().map(|p| (p.id, p.name)).collect(),
            excluded: BTreeSet::new(),
        }
    }

    /// Builder: adds a person.
    pub fn with_person(mut self, id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        self.people.insert(id.into(), name.into());
        self
    }

    /// Marks every person whose name is in `names` as excluded.
    ///
    /// Names that match nobody are ignored.
    pub fn exclude_names<S: AsRef<str>>(&mut self, names: &[S]) {
        for (id, name) in &self.people {
            if names.iter().any(|n| n.as_ref() == name) {
                self.excluded.insert(*id);
            }
        }
    }

    /// Builder form of [`Roster::exclude_names`].
    pub fn excluding<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.exclude_names(names);
        self
    }

    /// Whether the id is known (excluded or not).
    pub fn contains(&self, id: PersonId) -> bool {
        self.people.contains_key(&id)
    }

    /// Whether the person may be assigned.
    pub fn is_eligible(&self, id: PersonId) -> bool {
        self.contains(id) && !self.excluded.contains(&id)
    }

    /// Name of a person.
    pub fn name(&self, id: PersonId) -> Option<&str> {
        self.people.get(&id).map(String::as_str)
    }

    /// Eligible person ids in ascending order.
    pub fn eligible_ids(&self) -> Vec<PersonId> {
        self.people
            .keys()
            .copied()
            .filter(|id| !self.excluded.contains(id))
            .collect()
    }

    /// Iterates over all `(id, name)` pairs, excluded people included.
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &str)> {
        self.people.iter().map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of known people.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Roster {
        Roster::new(vec![
            Person::new(1, "Ada"),
            Person::new(2, "Brook"),
            Person::new(3, "Cyd"),
        ])
    }

    #[test]
    fn test_roster_lookup() {
        let roster = sample_roster();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.name(PersonId(2)), Some("Brook"));
        assert_eq!(roster.name(PersonId(9)), None);
        assert!(roster.contains(PersonId(3)));
    }

    #[test]
    fn test_exclusion_by_name() {
        let roster = sample_roster().excluding(&["Brook", "Nobody"]);
        assert!(roster.contains(PersonId(2)));
        assert!(!roster.is_eligible(PersonId(2)));
        assert!(roster.is_eligible(PersonId(1)));
        assert_eq!(roster.eligible_ids(), vec![PersonId(1), PersonId(3)]);
    }

    #[test]
    fn test_builder_person() {
        let roster = Roster::default().with_person(7, "Gale");
        assert_eq!(roster.name(PersonId(7)), Some("Gale"));
        assert!(!roster.is_empty());
    }

    #[test]
    fn test_person_id_is_transparent_in_json() {
        let json = serde_json::to_string(&PersonId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
