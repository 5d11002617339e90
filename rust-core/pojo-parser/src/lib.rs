// SPDX-License-Identifier: PMPL-1.0-or-later
//! POJO Parser
//!
//! Turns a tag line such as `#Exercise/Run 30; felt great` into a
//! [`ParsedRecord`], validated against a [`pojo_schema::SchemaRegistry`],
//! together with the cursor location used for suggestions.

pub mod error;
pub mod parser;
pub mod prefix;
pub mod record;

pub use error::ParseError;
pub use parser::{database_prefix, parse_line, LineParser};
pub use prefix::{prefix_len, strip_leading};
pub use record::{
    CursorLocation, FieldValue, Parameter, ParseOutcome, ParseWarning, ParsedRecord, WarningKind,
};
