//! Template rendering against captured response values
//!
//! # Usage
//!
//! ```
//! use iffy_application::template::ValueStore;
//!
//! let mut store = ValueStore::new();
//! store.record("create", br#"{"id": 7}"#);
//!
//! let path = store.apply(r#"/items/{{field "create" "id"}}"#).unwrap();
//! assert_eq!(path, "/items/7");
//! ```

pub mod engine;
pub mod parser;

pub use engine::{Entry, ValueStore};
pub use parser::{Action, Function, Segment, has_actions, parse_template};
