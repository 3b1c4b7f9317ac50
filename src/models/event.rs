use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two end-of-year parties dishes are voted for. Stored in PostgreSQL
/// as the `party_type` enum and spelled lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "party_type", rename_all = "lowercase")]
pub enum EventType {
    Natal,
    Reveillon,
}

impl EventType {
    pub const ALL: [EventType; 2] = [EventType::Natal, EventType::Reveillon];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Natal => "natal",
            EventType::Reveillon => "reveillon",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "natal" => Ok(EventType::Natal),
            "reveillon" => Ok(EventType::Reveillon),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// Parse failure for an event name taken from a URL path.
#[derive(Debug, Clone)]
pub struct UnknownEvent(pub String);

impl fmt::Display for UnknownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event: {}", self.0)
    }
}

impl std::error::Error for UnknownEvent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_events() {
        assert_eq!("natal".parse::<EventType>().unwrap(), EventType::Natal);
        assert_eq!("reveillon".parse::<EventType>().unwrap(), EventType::Reveillon);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("pascoa".parse::<EventType>().is_err());
        assert!("NATAL".parse::<EventType>().is_err());
        assert!("".parse::<EventType>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for party in EventType::ALL {
            assert_eq!(party.to_string().parse::<EventType>().unwrap(), party);
        }
    }
}
