use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
///
/// The learner calls this once per logged step; the step number is the
/// learner's own update counter.
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, step: usize, record: Record);
}

/// A recorder that ignores any record.
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn write(&mut self, _step: usize, _record: Record) {}
}

/// Keeps records in memory, mainly for tests and evaluation runs.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<(usize, Record)>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::default() }
    }

    /// Returns an iterator over the recorded steps.
    pub fn iter(&self) -> std::slice::Iter<(usize, Record)> {
        self.buf.iter()
    }

    /// Number of records written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, step: usize, record: Record) {
        self.buf.push((step, record));
    }
}
