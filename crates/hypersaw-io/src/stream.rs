//! Real-time mono output via cpal.

use crate::pcm::duplicate_to_channels;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, SupportedStreamConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Position in the host's output device list.
    pub index: usize,
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub channels: u16,
}

impl AudioDevice {
    fn from_device(index: usize, device: &Device) -> Option<Self> {
        let name = device_name(device).ok()?;
        let (default_sample_rate, channels) = device
            .default_output_config()
            .map(|c| (c.sample_rate(), c.channels()))
            .unwrap_or((48000, 2));
        Some(Self {
            index,
            name,
            default_sample_rate,
            channels,
        })
    }
}

/// Stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Preferred sample rate in Hz. The device default wins when they differ.
    pub sample_rate: u32,
    /// Render block size in frames.
    pub buffer_size: u32,
    /// Output device name or index (uses default if `None`).
    pub device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 256,
            device: None,
        }
    }
}

/// List all output devices on the default host.
pub fn list_output_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let outputs = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;
    Ok(outputs
        .enumerate()
        .filter_map(|(i, d)| AudioDevice::from_device(i, &d))
        .collect())
}

/// Info for the default output device, if any.
pub fn default_output_device() -> Option<AudioDevice> {
    let host = cpal::default_host();
    host.default_output_device()
        .and_then(|d| AudioDevice::from_device(0, &d))
}

/// Real-time output stream driving a mono render callback.
///
/// The callback fills mono blocks of at most `buffer_size` frames; each block
/// is copied to every device channel.
pub struct OutputStream {
    device: Device,
    supported: SupportedStreamConfig,
    config: StreamConfig,
    running: Arc<AtomicBool>,
    stream: Option<Stream>,
}

impl OutputStream {
    /// Open the configured (or default) output device.
    pub fn new(config: StreamConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = match &config.device {
            Some(name) => {
                let devices: Vec<_> = host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?
                    .collect();
                find_device_from_list(&devices, name)?
            }
            None => host.default_output_device().ok_or(Error::NoDevice)?,
        };
        let supported = device
            .default_output_config()
            .map_err(|e| Error::Stream(e.to_string()))?;

        if supported.sample_rate() != config.sample_rate {
            tracing::warn!(
                requested = config.sample_rate,
                device = supported.sample_rate(),
                "using device sample rate"
            );
        }

        Ok(Self {
            device,
            supported,
            config,
            running: Arc::new(AtomicBool::new(false)),
            stream: None,
        })
    }

    /// Sample rate the stream will actually run at.
    pub fn sample_rate(&self) -> u32 {
        self.supported.sample_rate()
    }

    /// Device channel count.
    pub fn channels(&self) -> u16 {
        self.supported.channels()
    }

    /// Name of the opened device.
    pub fn device_name(&self) -> String {
        device_name(&self.device).unwrap_or_else(|_| "<unknown>".to_string())
    }

    /// Start playback. Returns immediately; the stream runs until [`stop`](Self::stop)
    /// or until this value is dropped.
    pub fn start<F>(&mut self, mut render: F) -> Result<()>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        if self.supported.sample_format() != SampleFormat::F32 {
            return Err(Error::UnsupportedFormat(format!(
                "{:?}",
                self.supported.sample_format()
            )));
        }

        let channels = usize::from(self.channels().max(1));
        let block = self.config.buffer_size.max(1) as usize;
        let mut scratch = vec![0.0f32; block];

        let running = Arc::clone(&self.running);
        self.running.store(true, Ordering::SeqCst);

        let stream = self
            .device
            .build_output_stream(
                &self.supported.config(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::SeqCst) {
                        data.fill(0.0);
                        return;
                    }
                    for out in data.chunks_mut(block * channels) {
                        let frames = out.len() / channels;
                        let mono = &mut scratch[..frames];
                        render(mono);
                        duplicate_to_channels(mono, out, channels);
                    }
                },
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            device = %self.device_name(),
            sample_rate = self.sample_rate(),
            channels,
            block,
            "output stream started"
        );
        self.stream = Some(stream);
        Ok(())
    }

    /// Stop the stream. The device outputs silence until the stream is dropped.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the stream is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Shared flag for stopping from another thread (e.g. a Ctrl-C handler).
    pub fn running_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

/// Find a device by index, exact name, or case-insensitive partial name.
fn find_device_from_list(devices: &[Device], name_or_index: &str) -> Result<Device> {
    if let Ok(index) = name_or_index.parse::<usize>() {
        return devices.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "output device index {} (only {} devices available)",
                index,
                devices.len()
            ))
        });
    }

    if let Some(device) = devices
        .iter()
        .find(|d| device_name(d).is_ok_and(|n| n == name_or_index))
    {
        return Ok(device.clone());
    }

    let search = name_or_index.to_lowercase();
    let mut matches = devices.iter().filter_map(|d| {
        device_name(d)
            .ok()
            .filter(|name| name.to_lowercase().contains(&search))
            .map(|name| (d, name))
    });

    let (device, name) = matches.next().ok_or_else(|| {
        Error::DeviceNotFound(format!("no output device matching '{name_or_index}'"))
    })?;
    let others: Vec<String> = matches.map(|(_, n)| n).collect();
    if !others.is_empty() {
        tracing::warn!(
            search = name_or_index,
            using = %name,
            also = ?others,
            "multiple output devices match"
        );
    }
    Ok(device.clone())
}
