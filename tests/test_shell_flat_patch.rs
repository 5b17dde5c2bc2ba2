use gemlab::shapes::GeoKind;
use klshell::prelude::*;
use russell_lab::approx_eq;

// TEST GOAL
//
// This test verifies that a flat shell patch with zero prescribed radial
// increment stays in equilibrium: the projected displacement is zero, the
// internal force vanishes at every increment, and the stretch stays at one.
//
// MESH
//
// 3×3 Qua4 cells covering the unit square on the z = 0 plane. Every edge
// of the patch lies on a coordinate plane, hence the penalty constraints
// cover the whole boundary.

#[test]
fn test_shell_flat_patch() -> Result<(), StrError> {
    // mesh
    let mesh = SampleMeshes::flat_shell(GeoKind::Qua4, 3, 3, 1.0, 1.0)?;

    // parameters and configuration
    let param = SampleParams::param_shell_neo_hookean();
    let mut config = Config::new();
    config.set_n_increments(3)?.set_delta_radius(0.0)?;

    // run simulation
    let mut solver = ShellSolver::new(&mesh, &config, param)?;
    let summary = solver.run()?;

    // check equilibrium at every increment
    assert_eq!(summary.steps.len(), 3);
    for step in &summary.steps {
        approx_eq(step.norm_ff_int, 0.0, 1e-10);
        assert_eq!(step.cg_iterations, 0);
        approx_eq(step.stretch_min, 1.0, 1e-13);
        approx_eq(step.stretch_max, 1.0, 1e-13);
    }

    // check the constrained DOF set (sorted, unique, covers the boundary)
    let constrained = &solver.constrained_dof_indices;
    assert!(!constrained.is_empty());
    for pair in constrained.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    // the corner point 0 sits on both the x = 0 and y = 0 planes
    assert!(constrained.contains(&0));
    assert!(constrained.contains(&1));
    assert!(constrained.contains(&2));
    Ok(())
}
