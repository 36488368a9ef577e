mod error;
mod look_angles;
mod observer;
mod orbit_info;
mod pass_finder;
mod types;

pub use error::PredictError;
pub use look_angles::look_angles;
pub use observer::Observer;
pub use orbit_info::orbit_info;
pub use pass_finder::next_pass;
pub use types::{LookAngles, OrbitInfo, PassSearch, PassWindow};
