//! Subject partitions and subject-keyed collections.
//!
//! Every entity in the system is partitioned by one of a fixed set of lab
//! subjects; there are no cross-subject references.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A lab department partition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    GeneralScience,
    Biology,
    Physics,
    Chemistry,
}

impl Subject {
    /// Every subject, in canonical order.
    pub const ALL: [Subject; 4] = [
        Subject::GeneralScience,
        Subject::Biology,
        Subject::Physics,
        Subject::Chemistry,
    ];

    /// Stable key used in store paths and persisted data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::GeneralScience => "general_science",
            Subject::Biology => "biology",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::GeneralScience => "General Science",
            Subject::Biology => "Biology",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
        }
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general_science" => Ok(Subject::GeneralScience),
            "biology" => Ok(Subject::Biology),
            "physics" => Ok(Subject::Physics),
            "chemistry" => Ok(Subject::Chemistry),
            other => Err(DomainError::validation(format!("unknown subject: {other}"))),
        }
    }
}

/// Subject selector for reports. `All` expands to the full fixed set.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubjectFilter {
    All,
    One(Subject),
}

impl SubjectFilter {
    /// Subjects covered by this selector, in canonical order.
    pub fn subjects(self) -> impl Iterator<Item = Subject> {
        let subjects: Vec<Subject> = match self {
            SubjectFilter::All => Subject::ALL.to_vec(),
            SubjectFilter::One(subject) => vec![subject],
        };
        subjects.into_iter()
    }
}

impl From<Subject> for SubjectFilter {
    fn from(value: Subject) -> Self {
        SubjectFilter::One(value)
    }
}

impl FromStr for SubjectFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(SubjectFilter::All)
        } else {
            Ok(SubjectFilter::One(s.parse()?))
        }
    }
}

/// Fixed-size map with one slot per [`Subject`].
///
/// Every subject always has an entry; "no data yet" is the default value,
/// matching how store snapshots treat missing branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectMap<T> {
    #[serde(default)]
    general_science: T,
    #[serde(default)]
    biology: T,
    #[serde(default)]
    physics: T,
    #[serde(default)]
    chemistry: T,
}

impl<T: Default> Default for SubjectMap<T> {
    fn default() -> Self {
        Self {
            general_science: T::default(),
            biology: T::default(),
            physics: T::default(),
            chemistry: T::default(),
        }
    }
}

impl<T> SubjectMap<T> {
    pub fn get(&self, subject: Subject) -> &T {
        match subject {
            Subject::GeneralScience => &self.general_science,
            Subject::Biology => &self.biology,
            Subject::Physics => &self.physics,
            Subject::Chemistry => &self.chemistry,
        }
    }

    pub fn get_mut(&mut self, subject: Subject) -> &mut T {
        match subject {
            Subject::GeneralScience => &mut self.general_science,
            Subject::Biology => &mut self.biology,
            Subject::Physics => &mut self.physics,
            Subject::Chemistry => &mut self.chemistry,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, &T)> + '_ {
        Subject::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_round_trips_through_its_key() {
        for subject in Subject::ALL {
            assert_eq!(subject.as_str().parse::<Subject>().unwrap(), subject);
        }
    }

    #[test]
    fn unknown_subject_is_rejected() {
        assert!("astronomy".parse::<Subject>().is_err());
    }

    #[test]
    fn all_selector_expands_to_every_subject() {
        let subjects: Vec<Subject> = SubjectFilter::All.subjects().collect();
        assert_eq!(subjects, Subject::ALL.to_vec());

        let one: Vec<Subject> = "physics".parse::<SubjectFilter>().unwrap().subjects().collect();
        assert_eq!(one, vec![Subject::Physics]);
    }

    #[test]
    fn subject_map_slots_are_independent() {
        let mut map: SubjectMap<Vec<u32>> = SubjectMap::default();
        map.get_mut(Subject::Biology).push(1);

        assert_eq!(map.get(Subject::Biology), &vec![1]);
        assert!(map.get(Subject::Physics).is_empty());
        assert_eq!(map.iter().count(), 4);
    }
}
