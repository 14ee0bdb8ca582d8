mod create_new_place;
mod error;
mod image_picker;
mod load_places;
mod location_picker;
mod permission_gate;


pub use self::{
    create_new_place::*, error::Error, image_picker::*, load_places::*, location_picker::*,
    permission_gate::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, repositories::*};
}
