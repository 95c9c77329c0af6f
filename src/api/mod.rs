pub mod sheets;

pub use sheets::SheetsStore;
