//! Subscription status shown in the dashboard title bar.

use crate::sync::SyncEvent;

/// State of the live subscription
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Waiting for the first snapshot
    #[default]
    Loading,
    /// Receiving snapshots
    Live,
    /// Subscription failed; the list shown is stale
    Failed,
}

impl SyncStatus {
    /// Next status after an event from the subscription.
    pub fn after(&self, event: &SyncEvent) -> Self {
        match event {
            SyncEvent::Snapshot(_) => SyncStatus::Live,
            SyncEvent::Failed(_) => SyncStatus::Failed,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SyncStatus::Live)
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            SyncStatus::Loading => "○",
            SyncStatus::Live => "●",
            SyncStatus::Failed => "✗",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Loading => "Carregando",
            SyncStatus::Live => "Ao vivo",
            SyncStatus::Failed => "Desconectado",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading() {
        assert_eq!(SyncStatus::default(), SyncStatus::Loading);
        assert!(!SyncStatus::default().is_live());
    }

    #[test]
    fn test_transitions() {
        let live = SyncStatus::Loading.after(&SyncEvent::Snapshot(vec![]));
        assert!(live.is_live());
        let failed = live.after(&SyncEvent::Failed("boom".to_string()));
        assert_eq!(failed, SyncStatus::Failed);
        assert_eq!(failed.label(), "Desconectado");
    }
}
