mod delete_point;
mod extend;
mod join;
mod remove;

pub use delete_point::DeleteNearestControlPoint;
pub use extend::Extend;
pub use join::{merge_points, FindJoinCandidate, Join, JoinCandidate, JoinOutcome};
pub use remove::RemovePolyline;
