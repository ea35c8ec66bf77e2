// Gradient table fixture files (.bval / .bvec)
use std::path::Path;
use tracing::debug;

use dmri_testkit_core::domain::GradientTable;
use dmri_testkit_core::Result;

/// Load a gradient table from b-value and b-vector text files
///
/// # Errors
/// - RunnerError::Io if either file cannot be read
/// - RunnerError::InvalidArgument if the contents are malformed or mismatched
pub fn read_gradient_table(bval_path: &Path, bvec_path: &Path) -> Result<GradientTable> {
    let bvals = std::fs::read_to_string(bval_path)?;
    let bvecs = std::fs::read_to_string(bvec_path)?;
    let table = GradientTable::parse(&bvals, &bvecs)?;

    debug!(
        bval_path = %bval_path.display(),
        bvec_path = %bvec_path.display(),
        volumes = table.len(),
        "Gradient table loaded"
    );

    Ok(table)
}

/// Write a gradient table in numpy `savetxt` layout
pub fn write_gradient_table(table: &GradientTable, bval_path: &Path, bvec_path: &Path) -> Result<()> {
    std::fs::write(bval_path, table.format_bvals())?;
    std::fs::write(bvec_path, table.format_bvecs())?;

    debug!(
        bval_path = %bval_path.display(),
        bvec_path = %bvec_path.display(),
        volumes = table.len(),
        "Gradient table written"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmri_testkit_core::RunnerError;

    #[test]
    fn test_write_then_read_two_shell() {
        let dir = tempfile::tempdir().unwrap();
        let bval = dir.path().join("dwi.bval");
        let bvec = dir.path().join("dwi.bvec");

        let table = GradientTable::new(
            vec![0.0, 1000.0],
            vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        )
        .unwrap()
        .two_shell();
        write_gradient_table(&table, &bval, &bvec).unwrap();

        let loaded = read_gradient_table(&bval, &bvec).unwrap();
        assert_eq!(loaded, table);
        assert_eq!(std::fs::read_to_string(&bval).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_gradient_table(&dir.path().join("a.bval"), &dir.path().join("a.bvec"));
        assert!(matches!(result, Err(RunnerError::Io(_))));
    }
}
