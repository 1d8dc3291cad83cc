// Parser module: turns uploaded spreadsheet files into row objects.

pub mod sheet;

pub use sheet::decode_file;
