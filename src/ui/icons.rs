//! Shared UI icons.
//!
//! Each icon falls back to ASCII on terminals without emoji support.

use console::Emoji;

use crate::stage::StageStatus;

// Stage markers
pub static DONE: Emoji<'_, '_> = Emoji("✅ ", "[x]");
pub static CURRENT: Emoji<'_, '_> = Emoji("▶️  ", "[>]");
pub static PENDING: Emoji<'_, '_> = Emoji("⏳ ", "[ ]");

// Navigation results
pub static LOCKED: Emoji<'_, '_> = Emoji("🔒 ", "[L]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static EXIT: Emoji<'_, '_> = Emoji("🚪 ", "[<-]");

/// Marker for a stage status.
pub fn status_marker(status: StageStatus) -> Emoji<'static, 'static> {
    match status {
        StageStatus::Completed => DONE,
        StageStatus::Active => CURRENT,
        StageStatus::Upcoming => PENDING,
    }
}
