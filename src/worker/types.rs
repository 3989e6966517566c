//! États et notifications du worker de téléchargement.
//!
//! Cycle de vie: `Idle` → `Running` → {`Completed`, `Failed`, `Cancelled`}. Un état
//! terminal vaut `Idle` pour `start`: seul `Running` bloque une nouvelle requête.
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Idle = 0,
    Running = 1,
    Completed = 2,
    Failed = 3,
    Cancelled = 4,
}

impl WorkerState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => WorkerState::Running,
            2 => WorkerState::Completed,
            3 => WorkerState::Failed,
            4 => WorkerState::Cancelled,
            _ => WorkerState::Idle,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, WorkerState::Running)
    }
}

/// Notification envoyée du worker vers le shell, dans l'ordre de production
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Status(String),
    /// pourcentage entier, 0 à 100
    Progress(u8),
    Speed(String),
    Eta(String),
    Completed { output: Option<PathBuf> },
    Failed { message: String },
    Cancelled,
}

impl WorkerEvent {
    /// Vrai pour les trois issues finales d'un téléchargement
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerEvent::Completed { .. } | WorkerEvent::Failed { .. } | WorkerEvent::Cancelled
        )
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WorkerError {
    #[error("un téléchargement est déjà en cours")]
    AlreadyRunning,
    #[error("impossible de lancer le thread de téléchargement: {0}")]
    Spawn(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_u8() {
        for state in [
            WorkerState::Idle,
            WorkerState::Running,
            WorkerState::Completed,
            WorkerState::Failed,
            WorkerState::Cancelled,
        ] {
            assert_eq!(WorkerState::from_u8(state as u8), state);
        }
    }

    #[test]
    fn test_terminal_events() {
        assert!(WorkerEvent::Cancelled.is_terminal());
        assert!(WorkerEvent::Completed { output: None }.is_terminal());
        assert!(WorkerEvent::Failed { message: "x".into() }.is_terminal());
        assert!(!WorkerEvent::Progress(10).is_terminal());
        assert!(!WorkerEvent::Status("x".into()).is_terminal());
    }
}
