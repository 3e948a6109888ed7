//! Emoji used in terminal output, with plain-text fallbacks.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");

// Navigation
pub static HOUSE: Emoji<'_, '_> = Emoji("🏠 ", ">");
pub static KEY: Emoji<'_, '_> = Emoji("🔑 ", ">");

// Records
pub static DOCUMENT: Emoji<'_, '_> = Emoji("📄 ", "-");
pub static PERSON: Emoji<'_, '_> = Emoji("👤 ", "-");
