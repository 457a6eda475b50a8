//! Motion simulation for a single launched point mass.
//!
//! The [`core`] module holds everything that has algorithmic content: the
//! kinematics model, the flight envelope estimator, the parameter store and
//! the simulation clock. The binaries in this package are thin presentation
//! layers over it.

pub mod core {
    pub mod ballistics;
    pub mod clock;
    pub mod config;
    pub mod engine;
    pub mod envelope;
    pub mod error;
    pub mod model;
    pub mod params;
    pub mod plots;
    pub mod window;
}
