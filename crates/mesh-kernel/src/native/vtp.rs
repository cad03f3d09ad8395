//! ASCII VTK XML PolyData (`.vtp`) writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use guide_types::Mesh;
use tracing::debug;

use crate::types::{KernelError, KernelResult};

pub(crate) fn write_vtp(mesh: &Mesh, path: &Path) -> KernelResult<()> {
    if !mesh.indices_in_range() {
        return Err(KernelError::InvalidMesh {
            reason: "polygon index out of range".to_string(),
        });
    }
    write_xml(mesh, path).map_err(|e| KernelError::WriteFailed {
        reason: format!("{}: {}", path.display(), e),
    })?;
    debug!(
        path = %path.display(),
        points = mesh.point_count(),
        polys = mesh.poly_count(),
        "mesh written"
    );
    Ok(())
}

fn write_xml(mesh: &Mesh, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, r#"<?xml version="1.0"?>"#)?;
    writeln!(
        w,
        r#"<VTKFile type="PolyData" version="0.1" byte_order="LittleEndian">"#
    )?;
    writeln!(w, "  <PolyData>")?;
    writeln!(
        w,
        r#"    <Piece NumberOfPoints="{}" NumberOfVerts="0" NumberOfLines="0" NumberOfStrips="0" NumberOfPolys="{}">"#,
        mesh.point_count(),
        mesh.poly_count()
    )?;

    let normals = mesh.normals.as_deref().unwrap_or_default();
    if !normals.is_empty() && normals.len() == mesh.points.len() {
        writeln!(w, r#"      <PointData Normals="Normals">"#)?;
        writeln!(
            w,
            r#"        <DataArray type="Float64" Name="Normals" NumberOfComponents="3" format="ascii">"#
        )?;
        write_vectors(&mut w, normals)?;
        writeln!(w, "        </DataArray>")?;
        writeln!(w, "      </PointData>")?;
    }

    writeln!(w, "      <Points>")?;
    writeln!(
        w,
        r#"        <DataArray type="Float64" NumberOfComponents="3" format="ascii">"#
    )?;
    write_vectors(&mut w, &mesh.points)?;
    writeln!(w, "        </DataArray>")?;
    writeln!(w, "      </Points>")?;

    writeln!(w, "      <Polys>")?;
    writeln!(
        w,
        r#"        <DataArray type="Int64" Name="connectivity" format="ascii">"#
    )?;
    for poly in &mesh.polys {
        let line: Vec<String> = poly.iter().map(u32::to_string).collect();
        writeln!(w, "          {}", line.join(" "))?;
    }
    writeln!(w, "        </DataArray>")?;
    writeln!(
        w,
        r#"        <DataArray type="Int64" Name="offsets" format="ascii">"#
    )?;
    let mut offset = 0usize;
    for poly in &mesh.polys {
        offset += poly.len();
        writeln!(w, "          {}", offset)?;
    }
    writeln!(w, "        </DataArray>")?;
    writeln!(w, "      </Polys>")?;

    writeln!(w, "    </Piece>")?;
    writeln!(w, "  </PolyData>")?;
    writeln!(w, "</VTKFile>")?;
    w.flush()
}

fn write_vectors(w: &mut impl Write, values: &[[f64; 3]]) -> std::io::Result<()> {
    for v in values {
        writeln!(w, "          {} {} {}", v[0], v[1], v[2])?;
    }
    Ok(())
}
