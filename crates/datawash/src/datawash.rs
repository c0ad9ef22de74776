//! Main Datawash struct and public API.

use std::path::Path;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::inference::{Profiler, ProfilerConfig};
use crate::input::{Parser, ParserConfig, SourceFormat, SourceMetadata};
use crate::session::{PipelineSession, SessionObserver};

/// Configuration for ingestion and profiling.
#[derive(Debug, Clone, Default)]
pub struct DatawashConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Profiler configuration.
    pub profiler: ProfilerConfig,
}

/// Entry point: ingests files into cleaning sessions.
pub struct Datawash {
    parser: Parser,
    profiler: Profiler,
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl Datawash {
    /// Create a new Datawash instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(DatawashConfig::default())
    }

    /// Create a Datawash instance with custom configuration.
    pub fn with_config(config: DatawashConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            profiler: Profiler::with_config(config.profiler),
            observers: Vec::new(),
        }
    }

    /// Register an observer that every new session will notify.
    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Register an observer that is shared with the caller.
    pub fn with_shared_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Ingest a file from disk. The format comes from the extension.
    pub fn ingest_path(&self, path: impl AsRef<Path>) -> Result<PipelineSession> {
        let (dataset, source) = self.parser.parse_file(path)?;
        Ok(self.start(dataset, source))
    }

    /// Ingest raw content. `file_name` drives format detection.
    pub fn ingest_str(&self, file_name: &str, content: &str) -> Result<PipelineSession> {
        let (dataset, source) = self.parser.parse_content(file_name, content)?;
        Ok(self.start(dataset, source))
    }

    /// Ingest raw content in a known format.
    pub fn ingest_as(&self, content: &str, format: SourceFormat) -> Result<PipelineSession> {
        let file_name = match format {
            SourceFormat::Delimited => "upload.csv",
            SourceFormat::Json => "upload.json",
        };
        self.ingest_str(file_name, content)
    }

    fn start(&self, dataset: Dataset, source: SourceMetadata) -> PipelineSession {
        PipelineSession::new(dataset, source, self.profiler.clone(), self.observers.clone())
    }
}

impl Default for Datawash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    use crate::error::DatawashError;
    use crate::schema::DatasetProfile;
    use crate::transform::CleaningOperation;

    fn create_test_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, usize)>>,
    }

    impl SessionObserver for Recorder {
        fn on_ingested(&self, dataset: &Dataset, _profile: &DatasetProfile) {
            self.events.lock().unwrap().push(("ingested".into(), dataset.row_count()));
        }

        fn on_step_applied(&self, dataset: &Dataset, _profile: &DatasetProfile) {
            self.events.lock().unwrap().push(("applied".into(), dataset.row_count()));
        }

        fn on_reset(&self, dataset: &Dataset, _profile: &DatasetProfile) {
            self.events.lock().unwrap().push(("reset".into(), dataset.row_count()));
        }
    }

    #[test]
    fn test_ingest_path() {
        let file = create_test_file(".csv", "sample_id,age\nS001,25\nS002,30\n");
        let session = Datawash::new().ingest_path(file.path()).unwrap();

        assert_eq!(session.dataset().row_count(), 2);
        assert_eq!(session.source().format, "csv");
        assert!(session.source().path.is_some());
    }

    #[test]
    fn test_ingest_unsupported_extension() {
        let file = create_test_file(".xlsx", "a,b\n1,2\n");
        assert!(matches!(
            Datawash::new().ingest_path(file.path()),
            Err(DatawashError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_observers_are_notified() {
        let recorder = Arc::new(Recorder::default());
        let datawash = Datawash::new().with_shared_observer(recorder.clone());

        let mut session = datawash.ingest_str("data.csv", "a\n1\n1\n").unwrap();
        session.apply(CleaningOperation::RemoveDuplicates);
        session.reset();

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                ("ingested".to_string(), 2),
                ("applied".to_string(), 1),
                ("reset".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_ingest_as_json() {
        let session = Datawash::new()
            .ingest_as(r#"[{"a": 1, "b": true}]"#, SourceFormat::Json)
            .unwrap();
        assert_eq!(session.source().format, "json");
        assert_eq!(session.dataset().headers(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_max_rows_config() {
        let config = DatawashConfig {
            parser: ParserConfig {
                max_rows: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let session = Datawash::with_config(config)
            .ingest_str("data.csv", "a\n1\n2\n3\n")
            .unwrap();
        assert_eq!(session.dataset().row_count(), 1);
    }
}
