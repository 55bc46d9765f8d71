//! SDK 版本与运行时元信息

/// SDK semver，来自 Cargo.toml
///
/// 禁止手写版本号，必须用 `env!("CARGO_PKG_VERSION")` 与 Cargo.toml 保持同步。
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP 请求使用的 User-Agent
pub const USER_AGENT: &str = concat!("khive-sdk/", env!("CARGO_PKG_VERSION"));
