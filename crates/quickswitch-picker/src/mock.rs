use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{Error, Picker, Result};

/// Function deciding what the mock "user" picks from the given input.
type Chooser = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Scripted picker for tests (enabled with `test-utils` feature).
#[derive(Clone)]
pub struct MockPicker {
    chooser: Arc<Mutex<Chooser>>,
    inputs: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
}

impl Default for MockPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPicker {
    /// Picker that selects nothing.
    pub fn new() -> Self {
        Self {
            chooser: Arc::new(Mutex::new(Arc::new(|_: &str| String::new()))),
            inputs: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }
    /// Return the input lines at `indices` (in that order).
    pub fn select_lines(&self, indices: &[usize]) {
        let indices = indices.to_vec();
        self.select_with(move |input| {
            let lines: Vec<&str> = input.lines().collect();
            indices
                .iter()
                .filter_map(|i| lines.get(*i).copied())
                .collect::<Vec<_>>()
                .join("\n")
        });
    }
    /// Return exactly `output`, regardless of input.
    pub fn respond(&self, output: &str) {
        let output = output.to_string();
        self.select_with(move |_| output.clone());
    }
    pub fn select_with(&self, f: impl Fn(&str) -> String + Send + Sync + 'static) {
        *self.chooser.lock() = Arc::new(f);
    }
    pub fn set_fail(&self, v: bool) {
        self.fail.store(v, Ordering::SeqCst);
    }
    /// Inputs seen so far, one per invocation.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().clone()
    }
}

#[async_trait]
impl Picker for MockPicker {
    async fn pick(&self, input: &str) -> Result<String> {
        self.inputs.lock().push(input.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Exit {
                command: "mock".to_string(),
                code: Some(2),
            });
        }
        let chooser = self.chooser.lock().clone();
        Ok(chooser(input))
    }
}
