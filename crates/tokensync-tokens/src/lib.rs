//! Design token extraction for tokensync.
//!
//! Turns a design tool's variable graph into nested token files:
//!
//! - [`taxonomy`] classifies variable names into token categories
//! - [`resolver`] turns stored values into literals or one-hop references
//! - [`builder`] folds tokens into per-file trees with canonical key order
//! - [`validate`] checks trees before anything is published
//! - [`serialize`] renders trees following their key order
//! - [`detect`] compares trees with the published snapshot

pub mod builder;
pub mod detect;
pub mod error;
pub mod extract;
pub mod file;
pub mod resolver;
pub mod serialize;
pub mod taxonomy;
pub mod token;
pub mod validate;
pub mod variable;

pub use builder::{CategoryStats, ExtractionResult, ExtractionStats, TokenFile};
pub use detect::{detect_changes, ChangeSet, FileChange};
pub use error::{TokenError, TokenResult};
pub use extract::extract;
pub use file::{ThemeName, TokenFileId};
pub use resolver::{rgb_to_hex, Resolution};
pub use serialize::{parse_ordered, serialize, KeyOrder};
pub use taxonomy::{classify, TokenCategory};
pub use token::{Token, TokenType};
pub use validate::{validate, validate_all, ValidationIssue, ValidationReport};
pub use variable::{
    AliasRef, BoundVariables, Collection, Mode, PrimitiveKind, Rgba, TextStyle, Variable,
    VariableGraph, VariableValue,
};
