pub mod auth;
pub mod creation;
pub mod date;
pub mod document;
pub mod editor;
pub mod format;
pub mod invoice;
pub mod listing;
pub mod menu;
pub mod model;
pub mod protocol;

pub use chrono;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 事件集合
pub const COLLECTION_EVENTS: &str = "eventos";
/// 操作员集合
pub const COLLECTION_OPERATORS: &str = "usuarios";

pub use auth::{AuthErrorCode, Credentials};
pub use date::Timestamp;
pub use document::{EventDocument, InvoiceDocument, OperatorDocument, StoredEvent};
pub use model::{Event, Invoice, InvoiceShape, PaymentStatus};
pub use protocol::{ApiErrorBody, ApiRequest, HttpMethod, Session};
