#![forbid(unsafe_code)]
//! plank-query: the board query language.
//!
//! A query such as `status:open AND (priority:1-2 OR labels:bug)` goes
//! through [`lexer::tokenize`], [`parser::parse`] and finally
//! [`eval::evaluate`] against each [`WorkItem`](plank_core::model::item::WorkItem).
//! Most callers only need the facade in [`filter`]:
//!
//! ```
//! use plank_core::model::item::WorkItem;
//! use plank_query::{compile_query, filter_items};
//!
//! let items = vec![WorkItem::new("a", "Fix login"), WorkItem::new("b", "Docs")];
//! let filter = compile_query("login");
//! assert_eq!(filter_items(&items, &filter).len(), 1);
//! ```

pub mod ast;
pub mod eval;
pub mod fields;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod presets;

pub use ast::{Expr, FieldPredicate, Operator};
pub use eval::evaluate;
pub use filter::{
    CompiledFilter, QueryValidation, compile_query, filter_items, matches_filter, validate_query,
};
pub use parser::{ParseError, ParseOutcome, parse, parse_query};
pub use presets::{QUERY_PRESETS, QueryPreset, find_preset};
