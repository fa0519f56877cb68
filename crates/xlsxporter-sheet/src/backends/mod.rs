#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "calamine")]
pub mod calamine;

#[cfg(feature = "csv")]
pub use self::csv::CsvSource;

#[cfg(feature = "calamine")]
pub use self::calamine::CalamineSource;
