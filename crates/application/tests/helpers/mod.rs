mod mock_observer;

pub use mock_observer::{ObservedEvent, RecordingObserver};
