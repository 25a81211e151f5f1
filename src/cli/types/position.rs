//! FPL squad positions and quotas.

use crate::error::FplError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// FPL player positions (`element_type` in the upstream payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Required count of this position in a full 15-man squad.
    pub fn squad_quota(&self) -> usize {
        match self {
            Position::Goalkeeper => 2,
            Position::Defender => 5,
            Position::Midfielder => 5,
            Position::Forward => 3,
        }
    }

    /// Decode the upstream `element_type` numeric code.
    pub fn try_from_element_type(id: u8) -> Result<Self, FplError> {
        match id {
            1 => Ok(Position::Goalkeeper),
            2 => Ok(Position::Defender),
            3 => Ok(Position::Midfielder),
            4 => Ok(Position::Forward),
            _ => Err(FplError::invalid_input(format!(
                "unknown element_type: {id}"
            ))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_element_type() {
        assert_eq!(
            Position::try_from_element_type(1).unwrap(),
            Position::Goalkeeper
        );
        assert_eq!(
            Position::try_from_element_type(4).unwrap(),
            Position::Forward
        );
        assert!(Position::try_from_element_type(9).is_err());
    }

    #[test]
    fn quotas_sum_to_full_squad() {
        let total: usize = [
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward,
        ]
        .iter()
        .map(|p| p.squad_quota())
        .sum();
        assert_eq!(total, 15);
    }
}
