pub mod dictionary_entry;

pub use dictionary_entry::*;
