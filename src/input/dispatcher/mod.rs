mod axis;
mod buttons;
mod pointer;
mod state;
#[cfg(test)]
mod tests;

pub use state::{DispatcherSettings, Ignored, InputDispatcher, Intent, Outcome};
