use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::export::{ExportOpts, ExportRequest, export_failed, render_frame, write_png};
use crate::foundation::error::{SceneError, SceneResult};

/// An export running on its own thread.
///
/// The job owns its snapshot and never sees the store. Dropping the handle abandons the
/// job: a render already in progress finishes, but nothing is written afterwards.
#[derive(Debug)]
pub struct ExportJob {
    out_path: PathBuf,
    abandoned: Arc<AtomicBool>,
    rx: mpsc::Receiver<SceneResult<PathBuf>>,
    done: bool,
}

impl ExportJob {
    #[tracing::instrument(skip(req, opts))]
    pub fn spawn(req: ExportRequest, opts: ExportOpts, out_path: PathBuf) -> SceneResult<Self> {
        let (tx, rx) = mpsc::channel();
        let abandoned = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&abandoned);
        let path = out_path.clone();
        std::thread::Builder::new()
            .name("vnscene-export".to_owned())
            .spawn(move || {
                let result = render_frame(&req, &opts).and_then(|frame| {
                    if flag.load(Ordering::Acquire) {
                        tracing::debug!(path = %path.display(), "export abandoned before write");
                        return Err(SceneError::export("export abandoned"));
                    }
                    write_png(&frame, &path)?;
                    Ok(path.clone())
                });
                // The receiver is gone when the job was dropped.
                let _ = tx.send(result.map_err(|e| export_failed(e, &path)));
            })?;

        Ok(Self {
            out_path,
            abandoned,
            rx,
            done: false,
        })
    }

    pub fn out_path(&self) -> &std::path::Path {
        &self.out_path
    }

    /// Non-blocking check. Returns the outcome once, then `None` forever.
    pub fn poll(&mut self) -> Option<SceneResult<PathBuf>> {
        if self.done {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.done = true;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.done = true;
                Some(Err(worker_lost()))
            }
        }
    }

    /// Block until the export finishes.
    pub fn wait(mut self) -> SceneResult<PathBuf> {
        if self.done {
            return Err(SceneError::export("export result already taken"));
        }
        self.done = true;
        self.rx.recv().unwrap_or_else(|_| Err(worker_lost()))
    }
}

impl Drop for ExportJob {
    fn drop(&mut self) {
        if !self.done {
            self.abandoned.store(true, Ordering::Release);
        }
    }
}

fn worker_lost() -> SceneError {
    SceneError::export("export worker exited without a result")
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
