//! quickswitch-picker: hand a list to an external filter and map picks back.
//!
//! The filter sees one rendered label per line on stdin and prints the
//! chosen labels on stdout. Labels are matched back to items verbatim, so
//! anything the filter invents is ignored.

use async_trait::async_trait;

mod dmenu;
mod error;
mod menu;
#[cfg(any(test, feature = "test-utils"))]
mod mock;

pub use dmenu::DmenuPicker;
pub use error::{Error, Result};
pub use menu::{DECIMAL, Menu, digit_width, pad_index, pick_items};
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockPicker;

/// An interactive filter over newline-delimited labels.
#[async_trait]
pub trait Picker: Send + Sync {
    /// Present `input` and return the raw selected lines.
    ///
    /// A dismissed picker yields an empty string, not an error.
    async fn pick(&self, input: &str) -> Result<String>;
}
