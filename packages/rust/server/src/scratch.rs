//! Scoped on-disk intermediates for a single enrich request.
//!
//! The processor works on files, so each request gets a private temporary
//! directory holding `input.csv` and `input_enriched.csv`. The directory is
//! removed when the guard drops, on success, error, and unwind alike.

use std::path::Path;

use tracing::{debug, warn};

use cravey_core::CsvProcessor;
use cravey_shared::{CraveyError, Result};

const INPUT_FILE: &str = "input.csv";
const OUTPUT_FILE: &str = "input_enriched.csv";

/// Reported when the processor succeeds but leaves no output file.
pub const MISSING_OUTPUT_MESSAGE: &str = "Enrichment script failed to generate output";

/// Run `processor` over `csv` inside a throwaway directory and return the
/// enriched CSV text.
pub fn enrich_via_files(processor: &dyn CsvProcessor, csv: &str) -> Result<String> {
    let dir = tempfile::Builder::new()
        .prefix("cravey-")
        .tempdir()
        .map_err(|e| CraveyError::io(std::env::temp_dir(), e))?;

    let input = dir.path().join(INPUT_FILE);
    let output = dir.path().join(OUTPUT_FILE);
    debug!(dir = %dir.path().display(), "created scratch directory");

    let enriched = run(processor, csv, &input, &output)?;

    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        warn!(dir = %path.display(), error = %e, "failed to remove scratch directory");
    }

    Ok(enriched)
}

fn run(processor: &dyn CsvProcessor, csv: &str, input: &Path, output: &Path) -> Result<String> {
    std::fs::write(input, csv).map_err(|e| CraveyError::io(input, e))?;

    processor.process(input, output)?;

    if !output.exists() {
        return Err(CraveyError::missing_output(MISSING_OUTPUT_MESSAGE));
    }

    std::fs::read_to_string(output).map_err(|e| CraveyError::io(output, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::Mutex;

    use cravey_core::SchemaEnricher;

    /// Records the directory it was given, then does nothing.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Option<PathBuf>>,
        write_output: bool,
    }

    impl CsvProcessor for Recorder {
        fn process(&self, input: &Path, output: &Path) -> Result<()> {
            *self.seen.lock().expect("lock") = input.parent().map(Path::to_path_buf);
            if self.write_output {
                std::fs::copy(input, output).map_err(|e| CraveyError::io(output, e))?;
            }
            Ok(())
        }
    }

    impl Recorder {
        fn dir(&self) -> PathBuf {
            self.seen.lock().expect("lock").clone().expect("processor ran")
        }
    }

    #[test]
    fn enriches_and_cleans_up() {
        let csv = enrich_via_files(&SchemaEnricher, "name\nJoe's Diner\n").expect("enrich");
        assert!(csv.starts_with("name,cover_image,"));

        let recorder = Recorder {
            write_output: true,
            ..Recorder::default()
        };
        let echoed = enrich_via_files(&recorder, "a\n1\n").expect("echo");
        assert_eq!(echoed, "a\n1\n");
        assert!(!recorder.dir().exists());
    }

    #[test]
    fn missing_output_is_reported_and_cleaned_up() {
        let recorder = Recorder::default();
        let err = enrich_via_files(&recorder, "a\n1\n").unwrap_err();
        assert!(matches!(err, CraveyError::MissingOutput { .. }));
        assert_eq!(err.to_string(), MISSING_OUTPUT_MESSAGE);
        assert!(!recorder.dir().exists());
    }

    #[test]
    fn processing_error_is_propagated() {
        let err = enrich_via_files(&SchemaEnricher, "a,b\n1\n").unwrap_err();
        assert!(matches!(err, CraveyError::Processing { .. }));
        assert!(err.to_string().contains("malformed CSV"));
    }
}
