//! Data spaces and row frequencies.
//!
//! A data space is the hierarchy an analysis's data lives in, for example
//! `samples` with the levels `dataset` and `sample`. A row frequency names
//! one level of that hierarchy: the granularity at which a column exists.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind, Result};

/// A named hierarchy of row-frequency levels, coarsest first.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataSpace {
    name: Arc<str>,
    levels: Arc<[Arc<str>]>,
}

impl DataSpace {
    /// Creates a data space from its name and its levels, coarsest first.
    ///
    /// # Errors
    /// Returns an error if no levels are given or a level is repeated.
    pub fn new<I, S>(name: &str, levels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let levels: Vec<Arc<str>> = levels.into_iter().map(Into::into).collect();
        if levels.is_empty() {
            return Err(Error::new(ErrorKind::Internal(format!(
                "data space '{name}' has no levels"
            ))));
        }
        for (i, level) in levels.iter().enumerate() {
            if levels[..i].contains(level) {
                return Err(Error::new(ErrorKind::Internal(format!(
                    "data space '{name}' repeats level '{level}'"
                ))));
            }
        }
        Ok(Self {
            name: name.into(),
            levels: levels.into(),
        })
    }

    /// Returns the name of this space.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the levels of this space, coarsest first.
    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(AsRef::as_ref)
    }

    /// Returns the finest level, where columns live unless declared otherwise.
    #[must_use]
    pub fn leaf(&self) -> RowFrequency {
        // `new` guarantees at least one level
        let level = self.levels[self.levels.len() - 1].clone();
        RowFrequency {
            space: self.name.clone(),
            level,
        }
    }

    /// Returns the row frequency for a named level.
    ///
    /// # Errors
    /// Returns an error if the level is not part of this space.
    pub fn frequency(&self, level: &str) -> Result<RowFrequency> {
        self.levels
            .iter()
            .find(|l| l.as_ref() == level)
            .map(|l| RowFrequency {
                space: self.name.clone(),
                level: l.clone(),
            })
            .ok_or_else(|| {
                Error::new(ErrorKind::Internal(format!(
                    "data space '{}' has no level '{level}'",
                    self.name
                )))
            })
    }

    /// Returns true if `frequency` is a level of this space.
    #[must_use]
    pub fn contains(&self, frequency: &RowFrequency) -> bool {
        frequency.space == self.name && self.levels.contains(&frequency.level)
    }
}

impl fmt::Debug for DataSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{level}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for DataSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One level of a data space.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowFrequency {
    space: Arc<str>,
    level: Arc<str>,
}

impl RowFrequency {
    /// Returns the name of the space this level belongs to.
    #[must_use]
    pub fn space(&self) -> &str {
        &self.space
    }

    /// Returns the level name.
    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }
}

impl fmt::Debug for RowFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.space, self.level)
    }
}

impl fmt::Display for RowFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
