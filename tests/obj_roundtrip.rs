// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Optimize OBJ files on disk and read them back

use anyhow::Result;
use polyframe_reduce::io::compare_meshes;
use polyframe_reduce::{import_obj_file, optimize_file, parse_obj, Optimizer, OptimizerConfig};
use tempfile::TempDir;

/// Two parallel 2x2 plates of quads, one normal per plate
const PLATES: &str = "\
mtllib plates.mtl
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
v 1 1 0
v 2 1 0
v 0 2 0
v 1 2 0
v 2 2 0
v 0 0 2
v 1 0 2
v 2 0 2
v 0 1 2
v 1 1 2
v 2 1 2
v 0 2 2
v 1 2 2
v 2 2 2
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 -1
vn 0 0 1
o Bottom
usemtl Grey
f 1/1/1 4/4/1 5/3/1 2/2/1
f 2/1/1 5/4/1 6/3/1 3/2/1
f 4/1/1 7/4/1 8/3/1 5/2/1
f 5/1/1 8/4/1 9/3/1 6/2/1
g Top
usemtl Red
f 10/1/2 11/2/2 14/3/2 13/4/2
f 11/1/2 12/2/2 15/3/2 14/4/2
f 13/1/2 14/2/2 17/3/2 16/4/2
f 14/1/2 15/2/2 18/3/2 17/4/2
";

#[test]
fn test_optimized_file_reads_back() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("plates.obj");
    let output = dir.path().join("plates_optimized.obj");
    std::fs::write(&input, PLATES)?;

    let report = optimize_file(&input, &output)?;
    assert_eq!(report.groups, 2);
    assert_eq!(report.triangles_before, 16);
    assert_eq!(report.triangles_after, 4);

    let before = import_obj_file(&input)?;
    let after = import_obj_file(&output)?;
    assert_eq!(after.triangle_count(), 4);
    assert_eq!(after.material_libraries, vec!["plates.mtl".to_string()]);

    let comparison = compare_meshes(&before, &after, 1e-6);
    println!(
        "triangles {} -> {}, area {} -> {}",
        comparison.triangles_before,
        comparison.triangles_after,
        comparison.area_before,
        comparison.area_after
    );
    assert!(comparison.passed);
    assert!((comparison.reduction_ratio - 0.75).abs() < 1e-12);

    let top = after.group("Top").expect("top group");
    assert_eq!(top.material.as_deref(), Some("Red"));
    for face in &top.faces {
        for corner in &face.vertices {
            assert!(corner.texcoord.is_some());
            assert_eq!(after.corner_normal(corner).map(|n| n.z), Some(1.0));
        }
    }

    let text = std::fs::read_to_string(&output)?;
    assert!(text.starts_with("# New triangle count: 4\n# Old triangle count: 16\n"));
    // interior grid points are no longer referenced
    assert!(!text.contains("v 1 1 0\n"));
    Ok(())
}

#[test]
fn test_optimizing_twice_keeps_the_result() -> Result<()> {
    let optimizer = Optimizer::new(OptimizerConfig::default());
    let (first, _) = optimizer.optimize_obj(PLATES)?;
    let (second, report) = optimizer.optimize_obj(&first)?;

    assert_eq!(report.triangles_before, 4);
    assert_eq!(report.triangles_after, 4);

    let comparison = compare_meshes(&parse_obj(&first)?, &parse_obj(&second)?, 1e-9);
    assert!(comparison.passed);
    assert_eq!(comparison.triangle_count_diff, 0);
    Ok(())
}

#[test]
fn test_missing_input_is_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    let result = optimize_file(dir.path().join("nope.obj"), dir.path().join("out.obj"));
    assert!(result.is_err());
    assert!(!dir.path().join("out.obj").exists());
    Ok(())
}
