mod aggregate;
mod client;
mod decode;
mod errors;
mod query;
mod refdata;
pub mod types;
pub use self::client::Client;
pub use self::errors::{Error, Warning};
pub use self::query::{Direction, Granularity, Period, TradeQuery, Transport};
pub use self::refdata::{CountryTable, Hs2NameTable, Hs2Section, Hs2SectionTable, ReferenceData};
