//! # Core Application Logic
//!
//! Everything that is not the installer: where settings come from and the
//! directory history itself. It knows nothing about terminals.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • config  (settings)   │
//!                    │  • history (JSON store) │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │       commands          │
//!                    │  (one fn per subcommand)│
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `ChangedirConfig` and the resolution hierarchy
//! - [`history`]: `History`, visited directories and the ignore list

pub mod config;
pub mod history;
