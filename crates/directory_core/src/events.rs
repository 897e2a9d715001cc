//! Acknowledgments published to whatever front-end drives the directory.

use shared::domain::ClientId;

pub const CREATE_SUCCEEDED: &str = "Cliente adicionado com sucesso";
pub const CREATE_FAILED: &str = "Erro ao adicionar cliente";
pub const DELETE_SUCCEEDED: &str = "Cliente excluído com sucesso";
pub const DELETE_FAILED: &str = "Erro ao excluir cliente";
pub const LIST_FAILED: &str = "Erro ao carregar clientes";
pub const FILTER_FAILED: &str = "Erro ao filtrar clientes";
pub const ROUTE_FAILED: &str = "Erro ao buscar rota";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient toast-style message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Create,
    Delete(ClientId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryEvent {
    Notification(Notice),
    /// The dialog that triggered a confirmed mutation may be dismissed.
    DialogClosed(Dialog),
    DirectoryChanged { revision: u64 },
    RouteUpdated { len: usize },
}
