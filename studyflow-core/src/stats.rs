use serde::{Deserialize, Serialize};

use crate::timer::SessionKind;

/// Cumulative counters across all completed sessions.
///
/// Field names follow the persisted JSON layout. All values only ever grow;
/// no operation decrements them. `longest_session` (minutes) is carried for
/// the persisted layout and display but nothing writes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_hours: f64,
    pub sessions_completed: u32,
    pub longest_session: u32,
}

impl Stats {
    /// Credits one finished session: bumps the session count and adds the
    /// kind's hour credit to the running total.
    pub fn record_session(&mut self, kind: SessionKind) {
        self.sessions_completed += 1;
        self.total_hours += kind.hours_credit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_credits() {
        let mut stats = Stats::default();
        stats.record_session(SessionKind::Work);
        assert_eq!(stats.sessions_completed, 1);
        assert!((stats.total_hours - 0.25).abs() < 1e-9);

        stats.record_session(SessionKind::Break);
        assert_eq!(stats.sessions_completed, 2);
        assert!((stats.total_hours - 0.30).abs() < 1e-9);
    }

    #[test]
    fn persisted_field_names() {
        let json = serde_json::to_string(&Stats::default()).unwrap();
        assert_eq!(
            json,
            r#"{"totalHours":0.0,"sessionsCompleted":0,"longestSession":0}"#
        );
    }
}
