mod common;
pub use self::common::{Direction, Granularity, Period, Transport};
pub(crate) use self::common::TRANSPORT_FIELDS;

mod trade;
pub use self::trade::TradeQuery;
