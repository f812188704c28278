//! A scriptable `AudioBackend` for tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::backend::AudioBackend;
use super::resource::PlaybackResource;
use super::types::BackendStatus;

#[derive(Debug, Default)]
pub struct FakeOutput {
    pub loads: Vec<String>,
    pub playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub finished: bool,
    pub volume: Option<f32>,
    pub seeks: Vec<Duration>,
}

/// Clones share one `FakeOutput`, so a test keeps a handle after boxing one.
#[derive(Clone, Default)]
pub struct FakeBackend {
    pub output: Rc<RefCell<FakeOutput>>,
}

impl FakeBackend {
    /// A resource driven by a fresh fake, plus the handle to script it.
    pub fn resource() -> (PlaybackResource, FakeBackend) {
        let fake = FakeBackend::default();
        let resource = PlaybackResource::new(Box::new(fake.clone()), "http://backend");
        (resource, fake)
    }

    /// Simulate the stream running to completion.
    pub fn finish(&self) {
        let mut out = self.output.borrow_mut();
        out.finished = true;
        out.playing = false;
    }

    pub fn advance(&self, position: Duration, duration: Option<Duration>) {
        let mut out = self.output.borrow_mut();
        out.position = position;
        out.duration = duration;
    }

    pub fn load_count(&self) -> usize {
        self.output.borrow().loads.len()
    }

    pub fn last_load(&self) -> Option<String> {
        self.output.borrow().loads.last().cloned()
    }
}

impl AudioBackend for FakeBackend {
    fn load(&mut self, url: &str) {
        let mut out = self.output.borrow_mut();
        out.loads.push(url.to_string());
        out.playing = true;
        out.position = Duration::ZERO;
        out.duration = None;
        out.finished = false;
    }

    fn pause(&mut self) {
        self.output.borrow_mut().playing = false;
    }

    fn resume(&mut self) {
        self.output.borrow_mut().playing = true;
    }

    fn seek(&mut self, position: Duration) {
        let mut out = self.output.borrow_mut();
        out.seeks.push(position);
        out.position = position;
    }

    fn set_volume(&mut self, volume: f32) {
        self.output.borrow_mut().volume = Some(volume);
    }

    fn status(&mut self) -> BackendStatus {
        let out = self.output.borrow();
        BackendStatus {
            playing: out.playing,
            position: out.position,
            duration: out.duration,
            finished: out.finished,
        }
    }
}
