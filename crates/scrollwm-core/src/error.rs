//! Crate-wide error alias.

/// A boxed error type, used at the platform-adapter boundary and in
/// config/log/pid plumbing.
///
/// Core command methods never surface `Result` to their callers (see
/// §7 of the design spec): preconditions degrade to no-ops and adapter
/// failures are logged. `WmResult` exists for the operations that *do*
/// need to report failure — mainly adapter setup and file IO.
pub type WmResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
