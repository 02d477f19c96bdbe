pub mod config;
pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod persist;
pub mod selection;
pub mod session;
pub mod store;
pub mod topology;

pub use config::MapperConfig;
pub use error::{Result, TraceMapError};
pub use mesh::{MeshProvider, TriangleMesh};
pub use session::{Command, DetectionMode, Event, Mode, Session, Viewer};
pub use store::{Endpoint, PolylineId, PolylineStore};
pub use topology::{Termination, TopologyMap};
