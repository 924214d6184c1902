pub mod family_handler;
pub mod home_handler;
pub mod request_handler;
pub mod shelter_handler;

pub use family_handler::FamilyLocatorHandler;
pub use home_handler::HomeHandler;
pub use request_handler::RequestBoardHandler;
pub use shelter_handler::ShelterHandler;
