pub mod element;
pub mod layout;
pub mod model;
pub mod position;

pub use element::Element;
pub use layout::Layout;
pub use model::Model;
pub use position::Position;
