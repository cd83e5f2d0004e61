// Event filters and limit semantics
//
// Listing is "all events" (no filter) or one of three disconnected views.
// Every listing takes a limit where 0 or a negative value means unlimited.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::event::Event;

/// Named views over the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// Either Wi-Fi or internet was down.
    Disconnected,
    /// Wi-Fi was down, regardless of internet.
    WifiDisconnected,
    /// Internet was down, regardless of Wi-Fi.
    InternetDisconnected,
}

impl EventFilter {
    pub const ALL: [EventFilter; 3] = [
        EventFilter::Disconnected,
        EventFilter::WifiDisconnected,
        EventFilter::InternetDisconnected,
    ];

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::Disconnected => event.is_disconnected(),
            EventFilter::WifiDisconnected => !event.wifi_connected,
            EventFilter::InternetDisconnected => !event.internet_connected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventFilter::Disconnected => "disconnected",
            EventFilter::WifiDisconnected => "wifi",
            EventFilter::InternetDisconnected => "internet",
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event filter '{0}' (expected disconnected, wifi or internet)")]
pub struct ParseFilterError(pub String);

impl FromStr for EventFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disconnected" | "failed" => Ok(EventFilter::Disconnected),
            "wifi" | "wifi_disconnected" => Ok(EventFilter::WifiDisconnected),
            "internet" | "internet_disconnected" => Ok(EventFilter::InternetDisconnected),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Translate a caller-supplied limit into a row cap.
/// `None` means no cap.
pub fn effective_limit(limit: i64) -> Option<i64> {
    (limit > 0).then_some(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(wifi: bool, internet: bool) -> Event {
        Event {
            id: 1,
            timestamp: Utc::now(),
            wifi_connected: wifi,
            internet_connected: internet,
            message: None,
        }
    }

    #[test]
    fn test_filter_matrix() {
        let cases = [
            (true, true, [false, false, false]),
            (false, true, [true, true, false]),
            (true, false, [true, false, true]),
            (false, false, [true, true, true]),
        ];

        for (wifi, internet, expected) in cases {
            let e = event(wifi, internet);
            let actual: Vec<bool> = EventFilter::ALL.iter().map(|f| f.matches(&e)).collect();
            assert_eq!(actual, expected, "wifi={wifi} internet={internet}");
        }
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("wifi".parse::<EventFilter>(), Ok(EventFilter::WifiDisconnected));
        assert_eq!("Internet".parse::<EventFilter>(), Ok(EventFilter::InternetDisconnected));
        assert_eq!("failed".parse::<EventFilter>(), Ok(EventFilter::Disconnected));
        assert!("bluetooth".parse::<EventFilter>().is_err());
    }

    #[test]
    fn test_filter_display_round_trips() {
        for filter in EventFilter::ALL {
            assert_eq!(filter.to_string().parse::<EventFilter>(), Ok(filter));
        }
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(0), None);
        assert_eq!(effective_limit(-5), None);
        assert_eq!(effective_limit(1), Some(1));
        assert_eq!(effective_limit(250), Some(250));
    }
}
