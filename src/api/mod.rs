// ==========================================
// POS 交易通知中继 - API 层
// ==========================================
// 职责: 对外边界（上传接收、失败重推）
// ==========================================

pub mod error;
pub mod intake_api;

pub use error::{ApiError, ApiResult};
pub use intake_api::{IntakeApi, IntakeResponse, IntakeStatus, UploadedFile};
