use super::*;
use crate::foundation::core::Canvas;
use crate::scene::state::{ImageRef, SceneState};

fn textless_request() -> ExportRequest {
    let state = SceneState {
        character_name: String::new(),
        dialogue: String::new(),
        secondary_dialogue: String::new(),
        ..SceneState::default()
    };
    ExportRequest::from_state(&state)
}

fn small_opts() -> ExportOpts {
    ExportOpts::default()
        .with_canvas(Canvas::new(64, 36).unwrap())
        .with_fonts_dir(std::env::temp_dir().join("vnscene-job-no-fonts"))
}

fn out_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vnscene-job-{}", std::process::id()));
    dir.join(name)
}

#[test]
fn job_writes_png_on_its_own_thread() {
    let out = out_path("ok.png");
    let job = ExportJob::spawn(textless_request(), small_opts(), out.clone()).unwrap();
    assert_eq!(job.out_path(), out.as_path());
    let written = job.wait().unwrap();
    assert_eq!(written, out);
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (128, 72));
    let _ = std::fs::remove_file(&out);
}

#[test]
fn job_failure_is_reported_as_export_error() {
    let mut req = textless_request();
    req.image = Some(ImageRef("data:text/plain;base64,aGk=".into()));
    let out = out_path("bad-image.png");
    let job = ExportJob::spawn(req, small_opts(), out.clone()).unwrap();
    let err = job.wait().unwrap_err();
    assert!(matches!(err, SceneError::Export(_)));
    assert!(!out.exists());
}

#[test]
fn poll_yields_the_outcome_exactly_once() {
    let out = out_path("poll.png");
    let mut job = ExportJob::spawn(textless_request(), small_opts(), out.clone()).unwrap();
    let outcome = loop {
        if let Some(r) = job.poll() {
            break r;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    };
    assert!(outcome.is_ok());
    assert!(job.poll().is_none());
    let _ = std::fs::remove_file(&out);
}

#[test]
fn dropping_a_job_does_not_block() {
    let job = ExportJob::spawn(textless_request(), small_opts(), out_path("dropped.png")).unwrap();
    drop(job);
}
