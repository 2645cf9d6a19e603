pub mod info;
pub mod track;
