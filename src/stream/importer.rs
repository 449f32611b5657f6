//! Incremental import from a live connection.
//!
//! Unlike the batch importer there is no end of stream to defer work to, so
//! each message is applied to the model as soon as it arrives. Messages carry
//! closed intervals and ready-made counter rows, so no begin/end matching or
//! async stitching happens here.
//!
//! Processing is synchronous and takes `&mut self`, so one message is fully
//! applied before the next starts. Hosts that receive on several threads
//! should funnel messages through one channel and call [`StreamImporter::run`].

use super::protocol::{
    CaptureState, Connection, CounterBatch, StreamEvent, StreamListener, StreamMessage,
    StreamPacket, ThreadBatch,
};
use crate::model::{Model, Process, Slice};
use crate::utils::color::string_color_id;
use crate::utils::config::STREAM_CATEGORY;
use crate::utils::error::StreamError;
use log::{debug, warn};
use serde_json::{json, Map};
use std::sync::mpsc::Receiver;

/// Result of applying one counter batch
#[derive(Debug, Clone, PartialEq)]
enum BatchOutcome {
    Applied,
    /// Dropped without an import error
    Dropped,
    /// Dropped and reported
    Rejected(String),
}

/// Applies stream messages to a model and negotiates pause/resume
pub struct StreamImporter<C: Connection> {
    model: Model,
    connection: Option<C>,
    state: CaptureState,
    listeners: Vec<Box<dyn StreamListener>>,
}

impl<C: Connection> StreamImporter<C> {
    /// Create an importer writing into `model`, initially capturing
    pub fn new(model: Model) -> Self {
        Self {
            model,
            connection: None,
            state: CaptureState::Capturing,
            listeners: Vec::new(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == CaptureState::Paused
    }

    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().map_or(false, C::is_open)
    }

    pub fn add_listener(&mut self, listener: impl StreamListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Attach the transport used for pause/resume
    pub fn connect(&mut self, connection: C) {
        self.connection = Some(connection);
    }

    pub fn on_open(&mut self) {
        self.notify(StreamEvent::Connect);
    }

    pub fn on_close(&mut self) {
        self.notify(StreamEvent::Disconnect);
        self.connection = None;
    }

    pub fn on_error(&mut self) {
        self.notify(StreamEvent::ConnectionError);
        self.connection = None;
    }

    /// Ask the remote end to stop sending
    ///
    /// # Errors
    /// * `StreamError::AlreadyPaused` - already paused
    /// * `StreamError::NotConnected` - no connection attached
    /// * `StreamError::Send` - the transport refused the message
    pub fn pause(&mut self) -> Result<(), StreamError> {
        if self.state == CaptureState::Paused {
            return Err(StreamError::AlreadyPaused);
        }
        self.send_command("pause")?;
        self.state = CaptureState::Paused;
        Ok(())
    }

    /// Ask the remote end to start sending again
    ///
    /// # Errors
    /// * `StreamError::AlreadyCapturing` - not paused
    /// * `StreamError::NotConnected` - no connection attached
    /// * `StreamError::Send` - the transport refused the message
    pub fn resume(&mut self) -> Result<(), StreamError> {
        if self.state == CaptureState::Capturing {
            return Err(StreamError::AlreadyCapturing);
        }
        self.send_command("resume")?;
        self.state = CaptureState::Capturing;
        Ok(())
    }

    /// **Private** - shared by pause and resume
    fn send_command(&mut self, cmd: &str) -> Result<(), StreamError> {
        let connection = self.connection.as_mut().ok_or(StreamError::NotConnected)?;
        connection.send(&json!({ "cmd": cmd }).to_string())
    }

    /// Apply one stream message
    ///
    /// **Public** - main entry point per message
    ///
    /// On a successful change the model's bounds are recomputed and listeners
    /// get [`StreamEvent::ModelChange`]. Batches that are dropped leave the
    /// model untouched and notify nobody.
    ///
    /// # Errors
    /// * `StreamError::Json` - the message is not a valid packet
    pub fn handle_message(&mut self, data: &str) -> Result<(), StreamError> {
        let model_dirty = match StreamPacket::parse(data)? {
            StreamPacket::ThreadData { pid, data } => {
                self.apply_thread_batch(&pid, data);
                true
            }
            StreamPacket::CounterData { pid, data } => {
                match apply_counter_batch(self.model.get_or_create_process(&pid), data) {
                    BatchOutcome::Applied => true,
                    BatchOutcome::Dropped => false,
                    BatchOutcome::Rejected(message) => {
                        self.model.import_errors.push(message);
                        false
                    }
                }
            }
            StreamPacket::Unknown => {
                debug!("Ignoring stream message with unknown command");
                false
            }
        };

        if model_dirty {
            self.model.update_bounds();
            self.notify(StreamEvent::ModelChange);
        }
        Ok(())
    }

    /// Route a transport-level message
    pub fn dispatch(&mut self, message: StreamMessage) -> Result<(), StreamError> {
        match message {
            StreamMessage::Open => self.on_open(),
            StreamMessage::Message(data) => self.handle_message(&data)?,
            StreamMessage::Close => self.on_close(),
            StreamMessage::Error => self.on_error(),
        }
        Ok(())
    }

    /// Drain a single-consumer queue until the stream closes or errors
    ///
    /// **Public** - serializes message handling for hosts with concurrent
    /// delivery. Malformed messages are logged and skipped.
    pub fn run(&mut self, receiver: &Receiver<StreamMessage>) {
        for message in receiver.iter() {
            let finished = matches!(message, StreamMessage::Close | StreamMessage::Error);
            if let Err(e) = self.dispatch(message) {
                warn!("Skipping stream message: {}", e);
            }
            if finished {
                break;
            }
        }
    }

    /// **Private** - append each slice as a closed interval
    fn apply_thread_batch(&mut self, pid: &str, batch: ThreadBatch) {
        let thread = self
            .model
            .get_or_create_process(pid)
            .get_or_create_thread(&batch.name);

        for slice in batch.slices {
            let color_id = string_color_id(&slice.label);
            thread.slices.push(Slice::new(
                STREAM_CATEGORY,
                slice.label,
                color_id,
                slice.start,
                Map::new(),
                slice.end - slice.start,
            ));
        }
    }

    fn notify(&mut self, event: StreamEvent) {
        for listener in &mut self.listeners {
            listener.on_stream_event(event, &self.model);
        }
    }
}

/// Append a counter batch, establishing series on first sight
///
/// **Private** - internal helper for handle_message
fn apply_counter_batch(process: &mut Process, batch: CounterBatch) -> BatchOutcome {
    if batch.series_names.len() != batch.series_colors.len() {
        return BatchOutcome::Rejected(format!(
            "Streamed counter {} name length does not match counter color length {} vs {}",
            batch.name,
            batch.series_names.len(),
            batch.series_colors.len()
        ));
    }

    let counter = process.get_or_create_counter(STREAM_CATEGORY, &batch.name);

    if counter.num_series() == 0 {
        if batch.series_names.is_empty() {
            process.remove_counter(STREAM_CATEGORY, &batch.name);
            return BatchOutcome::Rejected(format!(
                "Expected streamed counter {} to have at least one series.",
                batch.name
            ));
        }
        for (name, color_id) in batch.series_names.into_iter().zip(batch.series_colors) {
            counter.add_series(name, color_id);
        }
    } else if counter.num_series() != batch.series_names.len() {
        // TODO: report this as an import error like the name mismatch below; the
        // trace-viewer stream importer pushes "Streamed counter <name> changed number
        // of seriesNames" here
        warn!(
            "Streamed counter {} changed number of series ({} vs {}), dropping batch",
            batch.name,
            counter.num_series(),
            batch.series_names.len()
        );
        return BatchOutcome::Dropped;
    } else if let Some((old, new)) = counter
        .series_names
        .iter()
        .zip(&batch.series_names)
        .find(|(old, new)| old != new)
    {
        return BatchOutcome::Rejected(format!(
            "Streamed counter {} series name changed from {} to {}",
            batch.name, old, new
        ));
    }

    let stride = counter.num_series();
    for sample in batch.samples {
        if sample.values.len() != stride {
            warn!(
                "Streamed counter {} sample at {} has {} values for {} series",
                batch.name,
                sample.timestamp,
                sample.values.len(),
                stride
            );
        }
        counter.append_sample(sample.timestamp, sample.values);
    }

    BatchOutcome::Applied
}
