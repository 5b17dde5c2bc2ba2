use crate::StrError;
use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;
use russell_lab::math::PI;

/// Holds mesh presets for shell simulations
pub struct SampleMeshes;

// builds a structured grid of shell cells; map takes (u,v) in [0,1]²
fn structured_grid<F>(kind: GeoKind, nx: usize, ny: usize, map: F) -> Result<Mesh, StrError>
where
    F: Fn(f64, f64) -> [f64; 3],
{
    if nx < 1 || ny < 1 {
        return Err("number of cells per direction must be ≥ 1");
    }
    // nodes per cell edge segment: 1 for Qua4, 3 for Qua16
    let seg = match kind {
        GeoKind::Qua4 => 1,
        GeoKind::Qua16 => 3,
        _ => return Err("shell cells must be Qua4 or Qua16"),
    };
    let npx = seg * nx + 1;
    let npy = seg * ny + 1;
    let mut points = Vec::with_capacity(npx * npy);
    for j in 0..npy {
        for i in 0..npx {
            let u = (i as f64) / ((seg * nx) as f64);
            let v = (j as f64) / ((seg * ny) as f64);
            let coords = map(u, v);
            points.push(Point {
                id: j * npx + i,
                marker: 0,
                coords: coords.to_vec(),
            });
        }
    }
    let mut cells = Vec::with_capacity(nx * ny);
    for jc in 0..ny {
        for ic in 0..nx {
            let mut cell_points = Vec::with_capacity((seg + 1) * (seg + 1));
            match kind {
                GeoKind::Qua4 => {
                    // counter-clockwise corners
                    let (i0, j0) = (ic, jc);
                    cell_points.push(j0 * npx + i0);
                    cell_points.push(j0 * npx + i0 + 1);
                    cell_points.push((j0 + 1) * npx + i0 + 1);
                    cell_points.push((j0 + 1) * npx + i0);
                }
                GeoKind::Qua16 => {
                    // lexicographic 4×4 lattice (m = 4 j + i)
                    for jj in 0..4 {
                        for ii in 0..4 {
                            cell_points.push((3 * jc + jj) * npx + 3 * ic + ii);
                        }
                    }
                }
                _ => unreachable!(),
            }
            cells.push(Cell {
                id: jc * nx + ic,
                attribute: 1,
                kind,
                points: cell_points,
            });
        }
    }
    Ok(Mesh { ndim: 3, points, cells })
}

impl SampleMeshes {
    /// Returns a flat rectangular shell patch on the z = 0 plane
    ///
    /// ```text
    /// y
    /// ↑
    /// ly  3-------2
    ///     | (0,0) |      (nx = ny = 1, Qua4 shown)
    ///     |       |
    ///     0-------1 → x
    ///            lx
    /// ```
    pub fn flat_shell(kind: GeoKind, nx: usize, ny: usize, lx: f64, ly: f64) -> Result<Mesh, StrError> {
        if lx <= 0.0 || ly <= 0.0 {
            return Err("plate dimensions must be positive");
        }
        structured_grid(kind, nx, ny, |u, v| [u * lx, v * ly, 0.0])
    }

    /// Returns a spherical band covering one octant minus a polar cap
    ///
    /// The surface is `x = R sinθ cosφ, y = R sinθ sinφ, z = R cosθ` with
    /// `φ ∈ [0, π/2]` and `θ ∈ [π/6, π/2]`. Three edges lie exactly on the
    /// coordinate planes (φ = 0 on y = 0, φ = π/2 on x = 0, θ = π/2 on
    /// z = 0); the rim at θ = π/6 is free. Staying away from the pole keeps
    /// every cell non-degenerate. The grid runs θ from the equator up to the
    /// rim so that `a₁ × a₂` points outward.
    pub fn quarter_sphere(kind: GeoKind, radius: f64, nphi: usize, ntheta: usize) -> Result<Mesh, StrError> {
        if radius <= 0.0 {
            return Err("sphere radius must be positive");
        }
        structured_grid(kind, nphi, ntheta, |u, v| {
            let phi = u * PI / 2.0;
            let theta = PI / 2.0 - v * PI / 3.0;
            [
                radius * f64::sin(theta) * f64::cos(phi),
                radius * f64::sin(theta) * f64::sin(phi),
                radius * f64::cos(theta),
            ]
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use russell_lab::approx_eq;

    #[test]
    fn flat_shell_qua4_works() {
        let mesh = SampleMeshes::flat_shell(GeoKind::Qua4, 2, 3, 2.0, 3.0).unwrap();
        assert_eq!(mesh.ndim, 3);
        assert_eq!(mesh.points.len(), 3 * 4);
        assert_eq!(mesh.cells.len(), 6);
        assert_eq!(mesh.cells[0].points, &[0, 1, 4, 3]);
        assert_eq!(mesh.cells[5].points, &[7, 8, 11, 10]);
        // corner coordinates
        assert_eq!(mesh.points[0].coords, &[0.0, 0.0, 0.0]);
        assert_eq!(mesh.points[11].coords, &[2.0, 3.0, 0.0]);
        assert_eq!(
            SampleMeshes::flat_shell(GeoKind::Qua4, 0, 1, 1.0, 1.0).err(),
            Some("number of cells per direction must be ≥ 1")
        );
        assert_eq!(
            SampleMeshes::flat_shell(GeoKind::Tri3, 1, 1, 1.0, 1.0).err(),
            Some("shell cells must be Qua4 or Qua16")
        );
    }

    #[test]
    fn flat_shell_qua16_works() {
        let mesh = SampleMeshes::flat_shell(GeoKind::Qua16, 2, 1, 6.0, 3.0).unwrap();
        assert_eq!(mesh.points.len(), 7 * 4);
        assert_eq!(mesh.cells.len(), 2);
        assert_eq!(mesh.cells[0].points.len(), 16);
        // first row of the second cell lattice
        assert_eq!(&mesh.cells[1].points[0..4], &[3, 4, 5, 6]);
        // interior node spacing is lx/(3 nx)
        approx_eq(mesh.points[1].coords[0], 1.0, 1e-15);
    }

    #[test]
    fn quarter_sphere_works() {
        let radius = 10.0;
        let mesh = SampleMeshes::quarter_sphere(GeoKind::Qua4, radius, 4, 4).unwrap();
        assert_eq!(mesh.points.len(), 25);
        assert_eq!(mesh.cells.len(), 16);
        for point in &mesh.points {
            let r = f64::sqrt(
                point.coords[0] * point.coords[0]
                    + point.coords[1] * point.coords[1]
                    + point.coords[2] * point.coords[2],
            );
            approx_eq(r, radius, 1e-13);
            // octant: all coordinates non-negative
            assert!(point.coords.iter().all(|x| *x > -1e-13));
        }
        // first grid row lies on the equator z = 0
        approx_eq(mesh.points[0].coords[2], 0.0, 1e-13);
        approx_eq(mesh.points[0].coords[0], radius, 1e-13);
        // last grid row lies on the free rim (θ = π/6 ⇒ z = R cos 30°)
        approx_eq(mesh.points[24].coords[2], radius * f64::sqrt(3.0) / 2.0, 1e-13);
        assert_eq!(
            SampleMeshes::quarter_sphere(GeoKind::Qua4, 0.0, 2, 2).err(),
            Some("sphere radius must be positive")
        );
    }
}
