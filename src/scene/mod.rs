//! Scene graph: modules of geometry, transforms and draw state.

pub mod draw_state;
pub mod element;
pub mod module;
pub mod view;

pub use draw_state::{DrawState, FillMode, ShadeMode};
pub use element::Element;
pub use module::Module;
pub use view::{View2D, View3D};
