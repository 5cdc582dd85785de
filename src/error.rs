use thiserror::Error;

/// Failures the menu synchroniser can run into. None of them is shown to the user;
/// every variant degrades to a temporarily stale menu.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuSyncError {
    #[error("value store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("host rejected menu call for '{id}': {message}")]
    HostApi { id: String, message: String },

    #[error("host capability unreachable: {0}")]
    HostUnreachable(String),

    #[error("tab {tab_id} still navigating after {attempts} attempts")]
    StaleNavigation { tab_id: i64, attempts: u32 },

    #[error("unknown menu action '{0}'")]
    UnknownMenuAction(String),
}

impl MenuSyncError {
    /// Whether this error ends the current refresh cycle.
    /// A rejected host call only affects the single item it was about.
    pub fn aborts_cycle(&self) -> bool {
        match self {
            Self::StoreUnavailable(_) | Self::HostUnreachable(_) => true,
            Self::StaleNavigation { .. } => true,
            Self::HostApi { .. } | Self::UnknownMenuAction(_) => false,
        }
    }

    pub(crate) fn store(err: anyhow::Error) -> Self {
        Self::StoreUnavailable(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, MenuSyncError>;
