pub mod gateways;
pub mod repositories;
pub mod usecases;

pub mod entities {
    pub use placecap_entities::{
        geo::*, id::*, location::*, navigation::*, permission::*, place::*,
    };
}
