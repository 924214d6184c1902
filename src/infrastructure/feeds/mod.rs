pub mod metno;
pub mod usgs;

pub use metno::MetNoCycloneFeed;
pub use usgs::UsgsSeismicFeed;
