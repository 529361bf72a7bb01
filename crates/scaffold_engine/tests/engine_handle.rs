use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use scaffold_engine::{
    EngineEvent, EngineHandle, GenerateError, GeneratedFile, ProjectGenerator, ARCHIVE_FILENAME,
};
use tempfile::TempDir;

struct StubGenerator {
    reply: Result<Vec<GeneratedFile>, GenerateError>,
    goals: Mutex<Vec<String>>,
}

impl StubGenerator {
    fn new(reply: Result<Vec<GeneratedFile>, GenerateError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            goals: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl ProjectGenerator for StubGenerator {
    async fn generate(&self, goal: &str) -> Result<Vec<GeneratedFile>, GenerateError> {
        self.goals.lock().unwrap().push(goal.to_string());
        self.reply.clone()
    }
}

struct PanickingGenerator;

#[async_trait::async_trait]
impl ProjectGenerator for PanickingGenerator {
    async fn generate(&self, _goal: &str) -> Result<Vec<GeneratedFile>, GenerateError> {
        panic!("model client blew up");
    }
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            return event;
        }
    }
    panic!("engine produced no event in time");
}

#[test]
fn generation_result_is_tagged_with_run() {
    let temp = TempDir::new().unwrap();
    let stub = StubGenerator::new(Ok(vec![GeneratedFile::new("index.html", "<p>x</p>")]));
    let engine = EngineHandle::with_generator(stub.clone(), temp.path().to_path_buf()).unwrap();

    engine.generate(7, "a page");

    match next_event(&engine) {
        EngineEvent::GenerationCompleted { run, result } => {
            assert_eq!(run, 7);
            assert_eq!(result.unwrap()[0].filename, "index.html");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(stub.goals.lock().unwrap().as_slice(), ["a page".to_string()]);
}

#[test]
fn generation_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let stub = StubGenerator::new(Err(GenerateError::Service("down".into())));
    let engine = EngineHandle::with_generator(stub, temp.path().to_path_buf()).unwrap();

    engine.generate(1, "a page");

    match next_event(&engine) {
        EngineEvent::GenerationCompleted { result, .. } => {
            assert_eq!(result.unwrap_err(), GenerateError::Service("down".into()));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn panicking_generation_still_reports_back() {
    let temp = TempDir::new().unwrap();
    let engine =
        EngineHandle::with_generator(Arc::new(PanickingGenerator), temp.path().to_path_buf())
            .unwrap();

    engine.generate(4, "a page");

    match next_event(&engine) {
        EngineEvent::GenerationCompleted { run, result } => {
            assert_eq!(run, 4);
            match result {
                Err(GenerateError::Service(message)) => {
                    assert!(message.starts_with("generation task aborted"), "{message}");
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.generate(5, "again");
    assert!(matches!(
        next_event(&engine),
        EngineEvent::GenerationCompleted { run: 5, result: Err(_) }
    ));
}

#[test]
fn preview_runs_on_the_worker() {
    let temp = TempDir::new().unwrap();
    let engine =
        EngineHandle::with_generator(StubGenerator::new(Ok(Vec::new())), temp.path().to_path_buf())
            .unwrap();

    engine.build_preview(
        3,
        vec![
            GeneratedFile::new("index.html", r#"<script src="a.js"></script>"#),
            GeneratedFile::new("a.js", "go()"),
        ],
    );

    match next_event(&engine) {
        EngineEvent::PreviewCompleted { run, result } => {
            assert_eq!(run, 3);
            let preview = result.unwrap().unwrap();
            assert!(preview.html.contains("<script>go()</script>"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn export_writes_archive_into_output_dir() {
    let temp = TempDir::new().unwrap();
    let engine =
        EngineHandle::with_generator(StubGenerator::new(Ok(Vec::new())), temp.path().to_path_buf())
            .unwrap();

    engine.export(vec![GeneratedFile::new("a.txt", "x")]);

    match next_event(&engine) {
        EngineEvent::ExportCompleted { result } => {
            let summary = result.unwrap().unwrap();
            assert_eq!(summary.path, temp.path().join(ARCHIVE_FILENAME));
            assert!(summary.path.is_file());
        }
        other => panic!("unexpected event {other:?}"),
    }
}
