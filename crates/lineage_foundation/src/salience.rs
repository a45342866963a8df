//! Salience tiers and check outcomes.
//!
//! Salience ranks how important a declaration is for display and validation.
//! It never takes part in resolution or selection.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind};

macro_rules! tiers {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every tier, least salient first.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the lowercase name of this tier.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(Error::new(ErrorKind::Internal(format!(
                        "unknown {} '{other}'",
                        stringify!($name)
                    )))),
                }
            }
        }
    };
}

tiers! {
    /// Importance of a column, least salient first.
    ColumnSalience, default = Supplementary {
        /// Transient data that need not be kept after a run.
        Temp => "temp",
        /// Only of interest when debugging a pipeline.
        Debug => "debug",
        /// Quality-assurance output.
        Qa => "qa",
        /// Derived data of secondary interest.
        Supplementary => "supplementary",
        /// Derived data typically reported in publications.
        Publication => "publication",
        /// Raw data before reconstruction.
        Raw => "raw",
        /// Primary input data.
        Primary => "primary",
    }
}

tiers! {
    /// Importance of altering a parameter's default, least salient first.
    ParameterSalience, default = Recommended {
        /// The default is somewhat arbitrary.
        Arbitrary => "arbitrary",
        /// Only altered when debugging.
        Debug => "debug",
        /// Worth checking against the data at hand.
        Check => "check",
        /// The best value depends on the context of the analysis.
        Dependent => "dependent",
        /// Recommended to be altered for basic usage.
        Recommended => "recommended",
    }
}

tiers! {
    /// Importance of a check, least salient first.
    CheckSalience, default = Potential {
        /// Only of interest when debugging.
        Debug => "debug",
        /// Could indicate a problem.
        Potential => "potential",
        /// Prudent to run.
        Prudent => "prudent",
        /// Recommended to run.
        Recommended => "recommended",
        /// Failure invalidates the column.
        Critical => "critical",
    }
}

tiers! {
    /// Outcome of running a check, worst first.
    CheckStatus, default = Unclear {
        /// The check failed.
        Failed => "failed",
        /// The check probably failed.
        ProbableFail => "probable_fail",
        /// The check could not decide.
        Unclear => "unclear",
        /// The check probably passed.
        ProbablePass => "probable_pass",
        /// The check passed.
        Passed => "passed",
    }
}
