// Constants module for showme
// Centralizes magic numbers for better maintainability

// ============================================================================
// Queue Constants
// ============================================================================

/// Initial capacity for a position queue
pub(crate) const INITIAL_QUEUE_CAPACITY: usize = 8;

/// Queues are shrunk back to this capacity once they drain
pub(crate) const IDLE_QUEUE_CAPACITY: usize = 8;

// ============================================================================
// Rendering Constants
// ============================================================================

/// Maximum visible action buttons on a terminal card
pub(crate) const MAX_VISIBLE_ACTIONS: usize = 3;

/// Maximum message length on a terminal card before truncation
pub(crate) const CARD_MESSAGE_MAX_LENGTH: usize = 120;

/// Glyph drawn for the close control
pub(crate) const CLOSE_GLYPH: &str = "×";
