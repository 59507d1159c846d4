pub mod aerodynamics;
pub mod body;
pub mod kinematics;
pub mod simulated_vessel;
pub mod vehicle;
