use std::fs;
use std::path::Path;

use memmap2::Mmap;
use raidsim_types::SimRun;

use super::error::LoadError;

/// Reads a JSON `SimRun` saved by the simulator.
pub fn load_sim_run(path: &Path) -> Result<SimRun, LoadError> {
    let file = fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    // The file is only read, and only for the duration of this call
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| LoadError::MemoryMap {
        path: path.to_path_buf(),
        source,
    })?;

    let run: SimRun = serde_json::from_slice(mmap.as_ref()).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        bytes = mmap.len(),
        log_bytes = run.result.logs.len(),
        "Loaded sim run"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_protobuf_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"request": {{"simOptions": {{"iterations": 100}}}}, "result": {{"avgIterationDuration": 60.5}}}}"#
        )
        .unwrap();

        let run = load_sim_run(file.path()).unwrap();
        assert_eq!(run.request.sim_options.iterations, 100);
        assert_eq!(run.result.avg_iteration_duration, 60.5);
    }

    #[test]
    fn errors_carry_the_path() {
        let missing = Path::new("/nonexistent/run.json");
        let err = load_sim_run(missing).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/run.json"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(load_sim_run(file.path()), Err(LoadError::Decode { .. })));
    }
}
