// ── Progress reporting ──
//
// Pipelines report stages and items through this trait so the CLI can draw
// spinners while tests and library callers stay silent.

/// Receives progress notifications from a running transfer.
pub trait Progress: Send + Sync {
    /// A new pipeline stage begins.
    fn stage(&self, name: &str);
    /// One item inside the current stage was processed.
    fn item(&self, message: &str);
    /// The current stage finished.
    fn finish(&self, message: &str);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {
    fn stage(&self, _name: &str) {}
    fn item(&self, _message: &str) {}
    fn finish(&self, _message: &str) {}
}
