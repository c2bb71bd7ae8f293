//! Log/Status Panel
//!
//! Derived entirely from the window snapshot and the connection state: a
//! newest-first feed of recent attacks plus an online/offline indicator.

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::connection::ConnectionState;
use super::event::AttackEvent;

pub const PANEL_TITLE: &str = "EVENT LOG";
pub const AWAITING_TRAFFIC: &str = "Waiting for traffic...";
pub const STATUS_GLYPH: &str = "●";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusIndicator {
    pub state: ConnectionState,
    pub glyph: String,
    pub label: String,
    /// CSS color for the glyph
    pub color: String,
}

impl StatusIndicator {
    pub fn from_state(state: ConnectionState) -> Self {
        let (label, color) = match state {
            ConnectionState::Open => ("SYSTEM ONLINE", "#0f0"),
            ConnectionState::Connecting => ("CONNECTING", "#fc0"),
            ConnectionState::Closed => ("OFFLINE", "#f33"),
        };

        Self {
            state,
            glyph: STATUS_GLYPH.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.state == ConnectionState::Open
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub key: u64,
    /// Uppercased attack type
    pub attack_type: String,
    /// `lon,lat` of the attacker, one decimal
    pub source: String,
    pub route: String,
    pub magnitude: String,
    /// Local receipt time `HH:MM:SS`
    pub received_at: String,
    pub source_country: Option<String>,
    pub target_country: Option<String>,
}

impl LogLine {
    pub fn from_event(event: &AttackEvent) -> Self {
        let source = format!("{:.1},{:.1}", event.source_longitude, event.source_latitude);
        Self {
            key: event.id,
            attack_type: event.attack_type.to_uppercase(),
            route: format!("{} → TARGET", source),
            source,
            magnitude: format!("MAG {}", event.magnitude),
            received_at: event.received_at.with_timezone(&Local).format("%H:%M:%S").to_string(),
            source_country: event.source_country.clone(),
            target_country: event.target_country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelView {
    pub title: String,
    pub active_count: usize,
    pub active_label: String,
    pub status: StatusIndicator,
    /// Newest first, at most `feed_limit` lines
    pub lines: Vec<LogLine>,
    /// Shown instead of the feed when the window is empty
    pub placeholder: Option<String>,
}

// ============================================================================
// DERIVATION
// ============================================================================

/// Build the panel from an oldest-first snapshot
pub fn derive_panel(
    snapshot: &[AttackEvent],
    state: ConnectionState,
    feed_limit: usize,
) -> PanelView {
    let lines: Vec<LogLine> = snapshot
        .iter()
        .rev()
        .take(feed_limit)
        .map(LogLine::from_event)
        .collect();

    PanelView {
        title: PANEL_TITLE.to_string(),
        active_count: snapshot.len(),
        active_label: format!("{} ACTIVE", snapshot.len()),
        status: StatusIndicator::from_state(state),
        placeholder: snapshot.is_empty().then(|| AWAITING_TRAFFIC.to_string()),
        lines,
    }
}

impl fmt::Display for PanelView {
    /// Terminal rendering of the panel
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.status.glyph, self.status.label)?;
        writeln!(f, "{:<24}{:>16}", self.title, self.active_label)?;
        writeln!(f, "{}", "-".repeat(40))?;

        if let Some(placeholder) = &self.placeholder {
            return writeln!(f, "{}", placeholder);
        }

        for line in &self.lines {
            writeln!(f, "{:<24}{:>16}", line.attack_type, line.magnitude)?;
            writeln!(f, "  {:<22}{:>16}", line.route, line.received_at)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::event::AttackPayload;
    use chrono::{TimeZone, Utc};

    fn event(id: u64, attack_type: &str, magnitude: f64) -> AttackEvent {
        AttackEvent::stamp(
            AttackPayload::new(-122.419, 37.774, 139.69, 35.68)
                .with_magnitude(magnitude)
                .with_type(attack_type),
            id,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap(),
        )
    }

    #[test]
    fn test_empty_window_shows_placeholder() {
        let panel = derive_panel(&[], ConnectionState::Open, 30);
        assert_eq!(panel.active_label, "0 ACTIVE");
        assert_eq!(panel.placeholder.as_deref(), Some(AWAITING_TRAFFIC));
        assert!(panel.lines.is_empty());
        assert!(panel.to_string().contains(AWAITING_TRAFFIC));
    }

    #[test]
    fn test_lines_newest_first_and_formatted() {
        let snapshot = vec![event(1, "syn_flood", 5.0), event(2, "udp_flood", 2.5)];
        let panel = derive_panel(&snapshot, ConnectionState::Open, 30);

        assert_eq!(panel.placeholder, None);
        assert_eq!(panel.lines[0].key, 2);
        assert_eq!(panel.lines[0].attack_type, "UDP_FLOOD");
        assert_eq!(panel.lines[0].magnitude, "MAG 2.5");
        assert_eq!(panel.lines[1].magnitude, "MAG 5");
        assert_eq!(panel.lines[1].source, "-122.4,37.8");
        assert_eq!(panel.lines[1].route, "-122.4,37.8 → TARGET");
        assert_eq!(panel.lines[1].received_at.len(), 8);
    }

    #[test]
    fn test_feed_limit_keeps_newest() {
        let snapshot: Vec<AttackEvent> = (1..=10).map(|i| event(i, "x", 1.0)).collect();
        let panel = derive_panel(&snapshot, ConnectionState::Open, 3);

        let keys: Vec<u64> = panel.lines.iter().map(|l| l.key).collect();
        assert_eq!(keys, vec![10, 9, 8]);
        assert_eq!(panel.active_count, 10);
    }

    #[test]
    fn test_indicator_follows_connection() {
        assert!(StatusIndicator::from_state(ConnectionState::Open).is_online());
        let offline = StatusIndicator::from_state(ConnectionState::Closed);
        assert!(!offline.is_online());
        assert_eq!(offline.label, "OFFLINE");
        assert_eq!(StatusIndicator::from_state(ConnectionState::Connecting).label, "CONNECTING");
    }
}
