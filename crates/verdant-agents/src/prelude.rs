//! Verdant Agents Prelude — convenient imports for common usage.
//!
//! ```rust
//! use verdant_agents::prelude::*;
//! ```

// Re-export agent types
pub use crate::insect::{leaves_at, Insect, InsectConfig, InsectState};
pub use crate::motion::{Crawl, Erratic, Flutter, Hover, MotionStrategy};

// Re-export from core
pub use verdant_core::prelude::*;
