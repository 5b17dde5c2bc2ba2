use crate::fem::Interp;
use crate::material::unit_normal;
use crate::StrError;
use gemlab::mesh::Mesh;
use russell_lab::{Matrix, Vector};
use std::ffi::OsStr;
use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::Path;

// VTK code for a four-node quadrilateral
const VTK_QUAD: usize = 9;

/// Writes a VTU file with the shell solution sampled on a per-cell lattice
///
/// Each cell is sampled on an `ngrid` × `ngrid` lattice of parametric points
/// and rendered as `(ngrid-1)²` linear quads; lattice points are not shared
/// between cells. The fields are the displacement, the pull-back of the
/// pressure-like coefficients (scaled by the reference-to-deformed area
/// ratio), the reference unit normal, and the mid-surface principal stretch.
///
/// * `uu` -- total displacement coefficients (3 × npoint)
/// * `pp` -- pressure-like coefficients (3 × npoint); all-zero is fine
pub fn write_shell_vtu(full_path: &str, mesh: &Mesh, uu: &Vector, pp: &Vector, ngrid: usize) -> Result<(), StrError> {
    if ngrid < 2 {
        return Err("n_vtu_grid must be ≥ 2");
    }
    let neq = 3 * mesh.points.len();
    if uu.dim() != neq || pp.dim() != neq {
        return Err("coefficient vectors are incompatible with the mesh");
    }
    let ncell = mesh.cells.len();
    let n_sample = ncell * ngrid * ngrid;
    let n_quad = ncell * (ngrid - 1) * (ngrid - 1);

    // sampled fields
    let mut positions = vec![[0.0; 3]; n_sample];
    let mut displacements = vec![[0.0; 3]; n_sample];
    let mut pressures = vec![[0.0; 3]; n_sample];
    let mut normals = vec![[0.0; 3]; n_sample];
    let mut stretches = vec![0.0; n_sample];

    let mut count = 0;
    for cell in &mesh.cells {
        let interp = Interp::new(cell.kind)?;
        let nnode = interp.nnode();
        let mut nn = Vector::new(nnode);
        let mut deriv = Matrix::new(nnode, 2);
        let mut deriv2 = vec![[[0.0; 2]; 2]; nnode];
        for jt in 0..ngrid {
            for is in 0..ngrid {
                let ksi = [
                    -1.0 + 2.0 * (is as f64) / ((ngrid - 1) as f64),
                    -1.0 + 2.0 * (jt as f64) / ((ngrid - 1) as f64),
                ];
                interp.calc(&mut nn, &mut deriv, &mut deriv2, &ksi)?;
                let mut a_ref = [[0.0; 3]; 2];
                let mut a_def = [[0.0; 3]; 2];
                for m in 0..nnode {
                    let point = &mesh.points[cell.points[m]];
                    for i in 0..3 {
                        let u = uu[3 * point.id + i];
                        positions[count][i] += nn[m] * point.coords[i];
                        displacements[count][i] += nn[m] * u;
                        pressures[count][i] += nn[m] * pp[3 * point.id + i];
                        for ia in 0..2 {
                            a_ref[ia][i] += deriv.get(m, ia) * point.coords[i];
                            a_def[ia][i] += deriv.get(m, ia) * (point.coords[i] + u);
                        }
                    }
                }
                let (normal_ref, jac_ref) = unit_normal(&a_ref[0], &a_ref[1])?;
                let (_, jac_def) = unit_normal(&a_def[0], &a_def[1])?;
                normals[count] = normal_ref;
                stretches[count] = f64::sqrt(jac_def / jac_ref);
                // pull-back scaling of the pressure field
                for i in 0..3 {
                    pressures[count][i] *= jac_ref / jac_def;
                }
                count += 1;
            }
        }
    }

    // output buffer
    let mut buffer = String::new();

    // header
    write!(
        &mut buffer,
        "<?xml version=\"1.0\"?>\n\
         <VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
         <UnstructuredGrid>\n\
         <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">\n",
        n_sample, n_quad
    )
    .unwrap();

    // nodes: coordinates
    write!(
        &mut buffer,
        "<Points>\n\
         <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n",
    )
    .unwrap();
    for position in &positions {
        write!(&mut buffer, "{:?} {:?} {:?} ", position[0], position[1], position[2]).unwrap();
    }
    write!(
        &mut buffer,
        "\n</DataArray>\n\
         </Points>\n"
    )
    .unwrap();

    // elements: connectivity
    write!(
        &mut buffer,
        "<Cells>\n\
         <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">\n"
    )
    .unwrap();
    let mut sample_offset = 0;
    for _ in 0..ncell {
        for jt in 0..(ngrid - 1) {
            for is in 0..(ngrid - 1) {
                let p0 = sample_offset + jt * ngrid + is;
                write!(&mut buffer, "{} {} {} {} ", p0, p0 + 1, p0 + ngrid + 1, p0 + ngrid).unwrap();
            }
        }
        sample_offset += ngrid * ngrid;
    }

    // elements: offsets
    write!(
        &mut buffer,
        "\n</DataArray>\n\
         <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">\n"
    )
    .unwrap();
    for index in 0..n_quad {
        write!(&mut buffer, "{} ", 4 * (index + 1)).unwrap();
    }

    // elements: types
    write!(
        &mut buffer,
        "\n</DataArray>\n\
         <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n"
    )
    .unwrap();
    for _ in 0..n_quad {
        write!(&mut buffer, "{} ", VTK_QUAD).unwrap();
    }
    write!(
        &mut buffer,
        "\n</DataArray>\n\
         </Cells>\n"
    )
    .unwrap();

    // data: points
    write!(&mut buffer, "<PointData Scalars=\"TheScalars\">\n").unwrap();
    let vector_fields: [(&str, &Vec<[f64; 3]>); 3] = [
        ("displacement", &displacements),
        ("pressure", &pressures),
        ("normal", &normals),
    ];
    for (name, field) in &vector_fields {
        write!(
            &mut buffer,
            "<DataArray type=\"Float64\" Name=\"{}\" NumberOfComponents=\"3\" format=\"ascii\">\n",
            name
        )
        .unwrap();
        for value in field.iter() {
            write!(&mut buffer, "{:?} {:?} {:?} ", value[0], value[1], value[2]).unwrap();
        }
        write!(&mut buffer, "\n</DataArray>\n").unwrap();
    }
    write!(
        &mut buffer,
        "<DataArray type=\"Float64\" Name=\"stretch\" NumberOfComponents=\"1\" format=\"ascii\">\n"
    )
    .unwrap();
    for value in &stretches {
        write!(&mut buffer, "{:?} ", value).unwrap();
    }
    write!(&mut buffer, "\n</DataArray>\n").unwrap();

    // footer
    write!(
        &mut buffer,
        "</PointData>\n\
         </Piece>\n\
         </UnstructuredGrid>\n\
         </VTKFile>\n"
    )
    .unwrap();

    // create directory and write file
    let path = Path::new(full_path);
    if let Some(p) = path.parent() {
        fs::create_dir_all(p).map_err(|_| "cannot create directory for VTU file")?;
    }
    if path.extension() != Some(OsStr::new("vtu")) {
        return Err("VTU file name must end in .vtu");
    }
    let mut file = File::create(path).map_err(|_| "cannot create VTU file")?;
    file.write_all(buffer.as_bytes()).map_err(|_| "cannot write VTU file")?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::SampleMeshes;
    use gemlab::shapes::GeoKind;

    #[test]
    fn write_shell_vtu_captures_errors() {
        let mesh = SampleMeshes::flat_shell(GeoKind::Qua4, 1, 1, 1.0, 1.0).unwrap();
        let uu = Vector::new(12);
        let pp = Vector::new(12);
        assert_eq!(
            write_shell_vtu("/tmp/klshell/test_vtu/a.vtu", &mesh, &uu, &pp, 1).err(),
            Some("n_vtu_grid must be ≥ 2")
        );
        let short = Vector::new(3);
        assert_eq!(
            write_shell_vtu("/tmp/klshell/test_vtu/a.vtu", &mesh, &short, &pp, 2).err(),
            Some("coefficient vectors are incompatible with the mesh")
        );
        assert_eq!(
            write_shell_vtu("/tmp/klshell/test_vtu/a.txt", &mesh, &uu, &pp, 2).err(),
            Some("VTU file name must end in .vtu")
        );
    }

    #[test]
    fn write_shell_vtu_works() {
        let mesh = SampleMeshes::flat_shell(GeoKind::Qua4, 1, 1, 2.0, 1.0).unwrap();
        let neq = 12;
        let mut uu = Vector::new(neq);
        let pp = Vector::new(neq);
        // rigid translation in z
        for point_id in 0..4 {
            uu[3 * point_id + 2] = 0.5;
        }
        let full_path = "/tmp/klshell/test_vtu/flat.vtu";
        write_shell_vtu(full_path, &mesh, &uu, &pp, 3).unwrap();
        let contents = fs::read_to_string(full_path).unwrap();
        assert!(contents.contains("NumberOfPoints=\"9\" NumberOfCells=\"4\""));
        assert!(contents.contains("Name=\"displacement\""));
        assert!(contents.contains("Name=\"pressure\""));
        assert!(contents.contains("Name=\"normal\""));
        assert!(contents.contains("Name=\"stretch\""));
        // rigid translation keeps the stretch at one
        assert!(contents.contains("1.0 1.0 1.0 1.0 1.0 1.0 1.0 1.0 1.0"));
    }
}
