pub mod diacritics;
pub mod json;
pub mod verb_forms;
