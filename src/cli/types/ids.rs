//! Typed ID and unit wrappers for the FPL domain.

use crate::error::FplError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_wrapper {
    ($name:ident, $inner:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub $inner);

        impl $name {
            pub fn new(id: $inner) -> Self {
                Self(id)
            }

            pub fn value(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = FplError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<$inner>()
                    .map(Self)
                    .map_err(|_| FplError::invalid_input(format!("invalid {}: {s}", stringify!($name))))
            }
        }
    };
}

id_wrapper!(EntryId, u32, "A manager's FPL team (\"entry\") ID.");
id_wrapper!(GameweekId, u16, "A one-indexed FPL gameweek number.");
id_wrapper!(ClubId, u8, "An FPL club (\"team\") ID, 1..=20.");
id_wrapper!(PlayerId, u32, "An FPL player (\"element\") ID.");
