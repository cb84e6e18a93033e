//! Real-time output using cpal

use super::context::{AudioContext, ContextError, ContextState};
use super::graph::{Graph, SharedGraph};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use tracing::{debug, error};

/// Audio context backed by the default output device
///
/// The stream is built on the first [`resume`](AudioContext::resume), so
/// creating the context never makes a sound.
pub struct CpalContext {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    graph: SharedGraph,
    stream: Option<Stream>,
    state: ContextState,
}

impl CpalContext {
    /// Open the default output device at its default configuration
    pub fn new() -> Result<Self, ContextError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(ContextError::NoDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| ContextError::Device(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        debug!(
            "output device {:?}: {} Hz, {} channel(s), {:?}",
            device.name().ok(),
            config.sample_rate.0,
            config.channels,
            sample_format
        );

        Ok(Self {
            graph: Graph::shared(config.sample_rate.0),
            device,
            config,
            sample_format,
            stream: None,
            state: ContextState::Suspended,
        })
    }

    pub fn device_name(&self) -> Option<String> {
        self.device.name().ok()
    }

    fn build_stream(&self) -> Result<Stream, ContextError> {
        match self.sample_format {
            SampleFormat::F32 => self.build_typed_stream::<f32>(),
            SampleFormat::I16 => self.build_typed_stream::<i16>(),
            SampleFormat::U16 => self.build_typed_stream::<u16>(),
            other => Err(ContextError::Device(format!("unsupported sample format {:?}", other))),
        }
    }

    fn build_typed_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        &self,
    ) -> Result<Stream, ContextError> {
        let channels = self.config.channels as usize;
        let graph = self.graph.clone();

        self.device
            .build_output_stream(
                &self.config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut graph) = graph.try_lock() {
                        for frame in data.chunks_mut(channels) {
                            let sample = T::from_sample(graph.next_sample());
                            for channel_sample in frame.iter_mut() {
                                *channel_sample = sample;
                            }
                        }
                    } else {
                        // Controller holds the graph, fill with silence
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                    }
                },
                |err| {
                    error!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| ContextError::Device(e.to_string()))
    }
}

impl AudioContext for CpalContext {
    fn resume(&mut self) -> Result<(), ContextError> {
        if self.state == ContextState::Closed {
            return Err(ContextError::Closed);
        }
        if self.stream.is_none() {
            self.stream = Some(self.build_stream()?);
        }
        if let Some(stream) = &self.stream {
            stream.play().map_err(|e| ContextError::Device(e.to_string()))?;
        }
        self.state = ContextState::Running;
        Ok(())
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn graph(&self) -> SharedGraph {
        self.graph.clone()
    }

    fn close(&mut self) {
        // Dropping the stream stops the callback
        self.stream = None;
        self.state = ContextState::Closed;
    }
}

/// Name and default configuration of every output device
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}

/// Name of the default output device
pub fn default_device_name() -> Option<String> {
    cpal::default_host()
        .default_output_device()
        .and_then(|d| d.name().ok())
}
