mod frame;
mod geo_id;
mod locale;
mod wage;

pub use frame::Frame;
pub use geo_id::{CountyKey, GeoId};
pub use locale::Locale;
pub use wage::WageCategory;
