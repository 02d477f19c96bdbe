mod boundary;
mod classify_endpoint;
mod detect;
mod tau;

pub use boundary::BoundaryVertices;
pub use classify_endpoint::{Classification, ClassifyEndpoint};
pub use detect::{AutomatedDetection, DetectionReport};
pub use tau::ComputeTau;
