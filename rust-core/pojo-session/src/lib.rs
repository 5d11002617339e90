// SPDX-License-Identifier: PMPL-1.0-or-later
//! POJO Session
//!
//! The context object an editor or shell holds: the schema registry, the
//! history store, and the state needed to notice when a tag line has been
//! finished.
//!
//! ```rust,ignore
//! let mut session = PojoSession::open_files("pojo-settings.json", "pojo-history.json").await?;
//! let suggestions = session.suggest("#Exercise/R", 11);
//! session.record_line("#Exercise/Run 30; felt great").await?;
//! ```

pub mod error;
pub mod scan;
pub mod session;

pub use error::SessionError;
pub use scan::ScanReport;
pub use session::{CompletedLine, PojoSession};
