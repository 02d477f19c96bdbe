mod double_click;
mod pick_endpoint;
mod select_near;

pub use double_click::DoubleClickDetector;
pub use pick_endpoint::{EndpointPickOutcome, PickEndpoint};
pub use select_near::{SelectNear, SelectOutcome};
