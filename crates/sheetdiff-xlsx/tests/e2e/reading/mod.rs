//! Reading tests - build a package, read it back, check the snapshot.

mod data_types;
mod layout;
mod styles;
mod workbook;
