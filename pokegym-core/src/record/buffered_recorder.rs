use super::{Record, RecordValue, Recorder};
use log::info;
use std::collections::BTreeMap;

/// Buffered recorder.
///
/// Written records are kept in memory and can be inspected with
/// [`BufferedRecorder::iter`]. This is used for recording sequences of
/// observation and action during evaluation runs, and in tests.
///
/// Stored records are aggregated on [`Recorder::flush`]: the mean of each
/// scalar key is emitted through the `log` facade.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    stored: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self {
            buf: Vec::default(),
            stored: Vec::default(),
        }
    }

    /// Returns an iterator over the written records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    fn mean_scalars(&self) -> BTreeMap<String, (f32, usize)> {
        let mut acc: BTreeMap<String, (f32, usize)> = BTreeMap::new();
        for record in self.stored.iter() {
            for (k, v) in record.iter() {
                if let RecordValue::Scalar(x) = v {
                    let e = acc.entry(k.clone()).or_insert((0.0, 0));
                    e.0 += x;
                    e.1 += 1;
                }
            }
        }
        acc
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn store(&mut self, record: Record) {
        self.stored.push(record);
    }

    fn flush(&mut self, step: i64) {
        for (k, (sum, n)) in self.mean_scalars() {
            info!("step {}: {} = {}", step, k, sum / n as f32);
        }
        self.stored.clear();
    }
}
