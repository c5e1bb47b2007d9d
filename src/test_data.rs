//! Helpers shared by the unit tests.

use crate::config::ReferenceConfig;

pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    use std::f64;

    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}

/// The default levels with a sparse pressure sweep and moist adiabat grid so tests run quickly.
pub fn coarse_reference_config() -> ReferenceConfig {
    ReferenceConfig::default()
        .with_pressure_step(25.0)
        .with_theta_ep_grid_step(1.0)
}
