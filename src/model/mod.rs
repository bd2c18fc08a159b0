//! Model layer - dashboard state without any terminal concerns
//!
//! - `FieldSpec` - how one column reads, formats and shortens a value
//! - `Predicate` - compiled search query
//! - `TableModel` - filtered, capped and sorted rows plus selection
//! - `Resource` / `Tab` - one backend collection and its table
//! - `ModalStack` - modal overlay management

pub mod field;
pub mod modal;
pub mod resource;
pub mod search;
pub mod tab;
pub mod table;
