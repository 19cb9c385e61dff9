//! One open sheet: its configuration, a background closure build, and the
//! instruction set currently shown.
//!
//! The build runs on its own thread and owns the store it fills; the result
//! only becomes visible here after the thread is joined, so readers never see
//! a half-built closure. Every reader waits for the build first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use nalgebra::Vector2;
use tracing::{debug, info};

use crate::closure::{Closure, LineMatch, PointMatch};
use crate::config::FinderConfig;
use crate::error::BuildError;
use crate::geom2::Line;
use crate::instructions::{self, RenderedStep, Segment, Step};
use crate::refs::RefId;

enum State {
    Idle,
    Running {
        stop: Arc<AtomicBool>,
        handle: JoinHandle<Result<Closure, BuildError>>,
    },
    Ready(Closure),
    Failed(BuildError),
}

pub struct Sheet {
    config: Option<FinderConfig>,
    state: State,
    overlay: Vec<Segment>,
    steps: Vec<Step>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    pub fn new() -> Self {
        Self {
            config: None,
            state: State::Idle,
            overlay: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Config of the current (or last) build.
    pub fn config(&self) -> Option<&FinderConfig> {
        self.config.as_ref()
    }

    /// Start building the closure for `config` in the background.
    ///
    /// A no-op if the same config is already built or building. Otherwise any
    /// running build is stopped and joined, all state from it is dropped, and
    /// a fresh build starts from rank 0. `config` must be validated.
    pub fn rebuild(&mut self, config: FinderConfig) {
        let current = matches!(self.state, State::Running { .. } | State::Ready(_));
        if current && self.config == Some(config) {
            debug!("configuration unchanged; keeping current closure");
            return;
        }
        self.cancel();
        self.steps.clear();
        self.config = Some(config);

        info!(
            width = config.paper.width,
            height = config.paper.effective_height(),
            max_rank = config.max_rank,
            "starting closure build"
        );
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || Closure::build(&config, &flag));
        self.state = State::Running { stop, handle };
    }

    /// Stop a running build and wait for its thread; its result is discarded.
    pub fn cancel(&mut self) {
        let State::Running { stop, .. } = &self.state else {
            return;
        };
        stop.store(true, Ordering::Relaxed);
        if let State::Running { handle, .. } =
            std::mem::replace(&mut self.state, State::Failed(BuildError::Cancelled))
        {
            // Whatever the thread produced belongs to a superseded request.
            let _ = handle.join();
            debug!("closure build cancelled");
        }
    }

    /// True while a build thread has not finished.
    pub fn is_running(&self) -> bool {
        matches!(&self.state, State::Running { handle, .. } if !handle.is_finished())
    }

    /// Block until the current build is done and return its closure.
    pub fn wait(&mut self) -> Result<&mut Closure, BuildError> {
        if !matches!(self.state, State::Running { .. }) {
            return self.finished();
        }
        if let State::Running { handle, .. } = std::mem::replace(&mut self.state, State::Idle) {
            self.state = match handle.join() {
                Ok(Ok(closure)) => {
                    let stats = closure.stats();
                    info!(
                        points = stats.total_points(),
                        lines = stats.total_lines(),
                        truncated = stats.truncated,
                        "closure ready"
                    );
                    State::Ready(closure)
                }
                Ok(Err(e)) => State::Failed(e),
                Err(_) => State::Failed(BuildError::WorkerPanicked),
            };
        }
        self.finished()
    }

    fn finished(&mut self) -> Result<&mut Closure, BuildError> {
        match &mut self.state {
            State::Ready(closure) => Ok(closure),
            State::Failed(e) => Err(*e),
            State::Idle | State::Running { .. } => Err(BuildError::NotStarted),
        }
    }

    /// The finished closure, if the build has been waited for.
    pub fn closure(&self) -> Option<&Closure> {
        match &self.state {
            State::Ready(closure) => Some(closure),
            _ => None,
        }
    }

    pub fn find_matching_points(&mut self, x: f64, y: f64) -> Result<Vec<PointMatch>, BuildError> {
        Ok(self.wait()?.match_points(Vector2::new(x, y)))
    }

    pub fn find_matching_lines(&mut self, line: &Line) -> Result<Vec<LineMatch>, BuildError> {
        Ok(self.wait()?.match_lines(line))
    }

    /// Replace the shown instructions with the coalesced fold sequence for `target`.
    pub fn build_instructions(&mut self, target: RefId) -> Result<&[Step], BuildError> {
        self.clear_instructions();
        let overlay = self.overlay.clone();
        let store = self.wait()?.store_mut();
        let mut steps = instructions::build_instructions(store, target, &overlay);
        instructions::coalesce(store, &mut steps);
        debug!(steps = steps.len(), "instructions built");
        self.steps = steps;
        Ok(&self.steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Shown steps resolved to plain geometry; empty before a build is ready.
    pub fn rendered_steps(&self) -> Vec<RenderedStep> {
        match self.closure() {
            Some(closure) => instructions::render_steps(closure.store(), &self.steps),
            None => Vec::new(),
        }
    }

    /// Drop the shown steps and every assigned label.
    pub fn clear_instructions(&mut self) {
        if let State::Ready(closure) = &mut self.state {
            closure.store_mut().clear_labels();
        }
        self.steps.clear();
    }

    /// Overlay segments included in every diagram built from now on.
    pub fn set_detected_segments(&mut self, segments: Vec<Segment>) {
        self.overlay = segments;
    }
}

impl Drop for Sheet {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxiomSet;
    use nalgebra::vector;

    fn config(axioms: &[u8], max_rank: usize) -> FinderConfig {
        FinderConfig {
            axioms: AxiomSet::from_numbers(axioms).unwrap(),
            max_rank,
            ..FinderConfig::default()
        }
    }

    #[test]
    fn readers_need_a_build() {
        let mut sheet = Sheet::new();
        assert_eq!(
            sheet.find_matching_points(0.5, 0.5).err(),
            Some(BuildError::NotStarted)
        );
        assert!(sheet.closure().is_none());
    }

    #[test]
    fn matches_and_instructions_after_rebuild() {
        let mut sheet = Sheet::new();
        sheet.rebuild(config(&[1, 2], 2));
        let matches = sheet.find_matching_points(0.5, 0.5).unwrap();
        assert!(matches[0].distance_error < 1e-6);

        let up = Line::through(vector![0.5, 0.0], vector![0.5, 1.0]).unwrap();
        let lines = sheet.find_matching_lines(&up).unwrap();
        assert_eq!(lines[0].rank, 1);

        sheet.set_detected_segments(vec![Segment::new(vector![0.0, 0.2], vector![1.0, 0.2])]);
        let steps = sheet.build_instructions(matches[0].id.into()).unwrap();
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|s| s.diagram.line_segments.len() == 1));
        assert_eq!(sheet.rendered_steps().len(), 2);

        // Same config again keeps the closure and the shown steps.
        sheet.rebuild(config(&[1, 2], 2));
        assert_eq!(sheet.steps().len(), 2);

        sheet.clear_instructions();
        assert!(sheet.steps().is_empty());
        let closure = sheet.wait().unwrap();
        let store = closure.store();
        assert!(store.point_ids().all(|id| !matches!(
            store.point(id).label,
            crate::refs::Label::Assigned(_)
        )));
    }

    #[test]
    fn config_change_replaces_every_reference() {
        let mut sheet = Sheet::new();
        sheet.rebuild(config(&[1, 2], 1));
        let small = sheet.wait().unwrap().stats().clone();
        assert_eq!(small.ranks.len(), 2);

        let mut wide = config(&[1, 2], 1);
        wide.paper.width = 2.0;
        sheet.rebuild(wide);
        let closure = sheet.wait().unwrap();
        assert_eq!(closure.paper().width(), 2.0);
        let store = closure.store();
        assert!(store.point_ids().all(|id| store.point(id).point.x <= 2.0 + 1e-9));
        assert!(store.find_point(vector![1.0, 0.0]).is_some());
    }

    #[test]
    fn readers_keep_the_closure_across_calls() {
        let mut sheet = Sheet::new();
        sheet.rebuild(config(&[1, 2], 2));
        assert!(sheet.wait().is_ok());
        assert!(sheet.wait().is_ok());

        let first = sheet.find_matching_points(0.5, 0.5).unwrap();
        let again = sheet.find_matching_points(0.5, 0.5).unwrap();
        assert_eq!(first, again);

        let up = Line::through(vector![0.5, 0.0], vector![0.5, 1.0]).unwrap();
        assert!(!sheet.find_matching_lines(&up).unwrap().is_empty());

        let steps = sheet.build_instructions(first[0].id.into()).unwrap().len();
        assert_eq!(steps, 2);
        sheet.clear_instructions();
        assert_eq!(sheet.find_matching_points(0.5, 0.5).unwrap(), first);

        // Cancelling a finished build leaves it in place.
        sheet.cancel();
        assert!(sheet.closure().is_some());
        assert_eq!(sheet.build_instructions(first[0].id.into()).unwrap().len(), 2);
    }

    #[test]
    fn rebuild_during_a_running_build_drops_the_old_sheet() {
        let mut sheet = Sheet::new();
        sheet.rebuild(config(&[1, 2, 3, 4, 5, 6, 7], 6));
        assert!(sheet.closure().is_none());

        let mut wide = config(&[1, 2], 1);
        wide.paper.width = 3.0;
        sheet.rebuild(wide);
        let closure = sheet.wait().unwrap();
        assert_eq!(closure.config().paper.width, 3.0);
        assert_eq!(closure.stats().ranks.len(), 2);
        let store = closure.store();
        assert!(store.find_point(vector![3.0, 1.0]).is_some());
        assert!(store.find_point(vector![1.5, 0.0]).is_some());
        // Rank-1 points of the unit square.
        assert!(store.find_point(vector![0.5, 0.0]).is_none());
        assert!(store.find_point(vector![0.5, 1.0]).is_none());
    }

    #[test]
    fn cancel_stops_a_running_build() {
        let mut sheet = Sheet::new();
        sheet.rebuild(config(&[1, 2, 3, 4, 5, 6, 7], 6));
        sheet.cancel();
        assert!(!sheet.is_running());
        assert_eq!(sheet.wait().err(), Some(BuildError::Cancelled));

        // A new request after cancelling runs again.
        sheet.rebuild(config(&[1, 2], 1));
        assert!(sheet.wait().is_ok());
    }
}
