//! The closed set of actions a spoken command can resolve to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified application action derived from one transcript.
///
/// Serializes adjacently tagged: `{"kind": "accept"}` or
/// `{"kind": "free_text", "text": "Find plumbers near me"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Intent {
    Accept,
    Decline,
    ShowEarnings,
    ShowProfile,
    ShowNotifications,
    ShowSearch,
    ShowBookings,
    /// Provider dashboard: incoming service requests.
    ShowRequests,
    /// Provider dashboard: overview tab.
    ShowOverview,
    /// No rule matched. Carries the transcript exactly as spoken (original casing).
    FreeText(String),
}

/// Field-less discriminant of [`Intent`], used as a rule target and anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Accept,
    Decline,
    ShowEarnings,
    ShowProfile,
    ShowNotifications,
    ShowSearch,
    ShowBookings,
    ShowRequests,
    ShowOverview,
    FreeText,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Accept => IntentKind::Accept,
            Intent::Decline => IntentKind::Decline,
            Intent::ShowEarnings => IntentKind::ShowEarnings,
            Intent::ShowProfile => IntentKind::ShowProfile,
            Intent::ShowNotifications => IntentKind::ShowNotifications,
            Intent::ShowSearch => IntentKind::ShowSearch,
            Intent::ShowBookings => IntentKind::ShowBookings,
            Intent::ShowRequests => IntentKind::ShowRequests,
            Intent::ShowOverview => IntentKind::ShowOverview,
            Intent::FreeText(_) => IntentKind::FreeText,
        }
    }

    /// Dashboard tab the host should switch to, if this intent is a navigation.
    pub fn tab(&self) -> Option<&'static str> {
        match self {
            Intent::ShowEarnings => Some("earnings"),
            Intent::ShowProfile => Some("profile"),
            Intent::ShowNotifications => Some("notifications"),
            Intent::ShowSearch => Some("search"),
            Intent::ShowBookings => Some("bookings"),
            Intent::ShowRequests => Some("requests"),
            Intent::ShowOverview => Some("overview"),
            Intent::Accept | Intent::Decline | Intent::FreeText(_) => None,
        }
    }

    /// The forwarded text of a `FreeText` intent.
    pub fn free_text(&self) -> Option<&str> {
        match self {
            Intent::FreeText(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self, Intent::FreeText(_))
    }
}

impl IntentKind {
    /// Build the payload-free intent for this kind. `FreeText` has no payload-free form.
    pub fn to_intent(self) -> Option<Intent> {
        Some(match self {
            IntentKind::Accept => Intent::Accept,
            IntentKind::Decline => Intent::Decline,
            IntentKind::ShowEarnings => Intent::ShowEarnings,
            IntentKind::ShowProfile => Intent::ShowProfile,
            IntentKind::ShowNotifications => Intent::ShowNotifications,
            IntentKind::ShowSearch => Intent::ShowSearch,
            IntentKind::ShowBookings => Intent::ShowBookings,
            IntentKind::ShowRequests => Intent::ShowRequests,
            IntentKind::ShowOverview => Intent::ShowOverview,
            IntentKind::FreeText => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Accept => "accept",
            IntentKind::Decline => "decline",
            IntentKind::ShowEarnings => "show_earnings",
            IntentKind::ShowProfile => "show_profile",
            IntentKind::ShowNotifications => "show_notifications",
            IntentKind::ShowSearch => "show_search",
            IntentKind::ShowBookings => "show_bookings",
            IntentKind::ShowRequests => "show_requests",
            IntentKind::ShowOverview => "show_overview",
            IntentKind::FreeText => "free_text",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::FreeText(text) => write!(f, "free_text({:?})", text),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_to_intent() {
        for kind in [
            IntentKind::Accept,
            IntentKind::Decline,
            IntentKind::ShowEarnings,
            IntentKind::ShowProfile,
            IntentKind::ShowNotifications,
            IntentKind::ShowSearch,
            IntentKind::ShowBookings,
            IntentKind::ShowRequests,
            IntentKind::ShowOverview,
        ] {
            assert_eq!(kind.to_intent().map(|i| i.kind()), Some(kind));
        }
        assert_eq!(IntentKind::FreeText.to_intent(), None);
    }

    #[test]
    fn tabs_match_dashboard_ids() {
        assert_eq!(Intent::ShowRequests.tab(), Some("requests"));
        assert_eq!(Intent::ShowBookings.tab(), Some("bookings"));
        assert_eq!(Intent::Accept.tab(), None);
        assert_eq!(Intent::FreeText("plumber".into()).tab(), None);
    }

    #[test]
    fn serde_shape_is_adjacently_tagged() {
        let json = serde_json::to_string(&Intent::FreeText("Find plumbers".into())).unwrap();
        assert_eq!(json, r#"{"kind":"free_text","text":"Find plumbers"}"#);
        let json = serde_json::to_string(&Intent::ShowEarnings).unwrap();
        assert_eq!(json, r#"{"kind":"show_earnings"}"#);
        let back: Intent = serde_json::from_str(r#"{"kind":"decline"}"#).unwrap();
        assert_eq!(back, Intent::Decline);
    }

    #[test]
    fn display_uses_snake_case() {
        assert_eq!(Intent::ShowOverview.to_string(), "show_overview");
        assert_eq!(IntentKind::FreeText.to_string(), "free_text");
    }
}
