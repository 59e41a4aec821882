//! Antichess engine: capturing is mandatory and the side that loses all of
//! its pieces (or cannot move) wins. For more information, see [README].
//!
//! [README]: https://github.com/kirillbobyrev/antichess/blob/main/README.md

pub mod chess;
pub mod engine;
pub mod evaluation;
pub mod search;

pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Logs the engine version and build type on startup. Nothing is written to
/// stdout since it is reserved for the protocol.
pub fn log_engine_info() {
    tracing::info!(
        version = %engine_version(),
        release = !shadow_rs::is_debug(),
        "antichess engine"
    );
    if !shadow_rs::git_clean() {
        tracing::warn!("built with uncommitted changes");
    }
}
