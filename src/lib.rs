//! Compiles JSON filter documents into SQL query text.
//!
//! ```
//! use filter_sql::sql_compiler::SqlCompiler;
//!
//! let sql = SqlCompiler::new()
//!     .compile(r#"{"from": "tickets", "where": {"status": "open", "or_priority": {"level": "high"}}}"#)
//!     .unwrap();
//! assert_eq!(sql, "select *\nfrom tickets\nwhere status = 'open' or (level = 'high');");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod key_grammar;
pub mod parser;
pub mod sql_compiler;
pub mod value;

pub use config::CompilerConfig;
pub use error::CompileError;
pub use sql_compiler::SqlCompiler;
