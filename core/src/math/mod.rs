pub mod interp;
pub mod stats;

pub use interp::InterpHelper;
pub use stats::StatsHelper;
