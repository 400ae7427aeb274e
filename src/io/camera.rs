// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Webcam access and background frame capture.
//!
//! A `CameraSession` owns the camera device on a worker thread. Opening the
//! device doubles as the access request: the session reports `Ready` once
//! frames can be read, or `Failed` when access is denied or no camera is
//! present. Frames then stream back over a one-slot channel until the
//! session is stopped or dropped; a frame is dropped while the previous one
//! is still waiting to be polled.

use anyhow::Result;
use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, TryRecvError, TrySendError};
use std::sync::Arc;
use std::time::Duration;

/// Pause between frame grabs (roughly 30 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// A source of still frames.
pub trait CameraDevice: Send {
    /// Capture the current frame as RGBA pixels.
    fn grab_frame(&mut self) -> Result<RgbaImage>;
}

/// Open the camera with the given index using the compiled-in backend.
#[cfg(feature = "camera-opencv")]
pub fn open_device(index: i32) -> Result<Box<dyn CameraDevice>> {
    Ok(Box::new(opencv_backend::OpenCvCamera::open(index)?))
}

/// Open the camera with the given index using the compiled-in backend.
#[cfg(not(feature = "camera-opencv"))]
pub fn open_device(index: i32) -> Result<Box<dyn CameraDevice>> {
    anyhow::bail!(
        "No camera backend compiled in (camera {}); rebuild with --features camera-opencv",
        index
    )
}

/// Messages from the capture thread.
enum CameraEvent {
    Ready,
    Frame(RgbaImage),
    Failed(String),
}

/// Status changes surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraStatus {
    /// The device opened and is streaming.
    Ready,
    /// Access was denied, no device exists, or capture broke down.
    Failed(String),
}

/// A running capture session.
pub struct CameraSession {
    receiver: Receiver<CameraEvent>,
    stop: Arc<AtomicBool>,
    latest: Option<RgbaImage>,
    frame_updated: bool,
    finished: bool,
}

impl CameraSession {
    /// Start capturing from the camera with the given index.
    pub fn start(index: i32) -> Self {
        Self::start_with(move || open_device(index))
    }

    /// Start capturing from whatever device `opener` returns.
    pub fn start_with<F>(opener: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn CameraDevice>> + Send + 'static,
    {
        // Status events block for the slot; frames never queue up
        let (sender, receiver) = sync_channel(1);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        std::thread::spawn(move || {
            let mut device = match opener() {
                Ok(device) => device,
                Err(e) => {
                    let _ = sender.send(CameraEvent::Failed(format!("{:#}", e)));
                    return;
                }
            };
            if sender.send(CameraEvent::Ready).is_err() {
                return;
            }
            log::info!("Camera opened");

            while !thread_stop.load(Ordering::Relaxed) {
                match device.grab_frame() {
                    Ok(frame) => match sender.try_send(CameraEvent::Frame(frame)) {
                        Ok(()) | Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Disconnected(_)) => break,
                    },
                    Err(e) => {
                        let _ = sender.send(CameraEvent::Failed(format!("{:#}", e)));
                        break;
                    }
                }
                std::thread::sleep(FRAME_INTERVAL);
            }
            log::info!("Camera capture stopped");
        });

        Self {
            receiver,
            stop,
            latest: None,
            frame_updated: false,
            finished: false,
        }
    }

    /// Drain pending events. Returns the most recent status change, if any.
    pub fn poll(&mut self) -> Option<CameraStatus> {
        let mut status = None;
        loop {
            match self.receiver.try_recv() {
                Ok(CameraEvent::Ready) => status = Some(CameraStatus::Ready),
                Ok(CameraEvent::Frame(frame)) => {
                    self.latest = Some(frame);
                    self.frame_updated = true;
                }
                Ok(CameraEvent::Failed(reason)) => {
                    self.finished = true;
                    status = Some(CameraStatus::Failed(reason));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    break;
                }
            }
        }
        status
    }

    /// The most recently captured frame.
    pub fn latest_frame(&self) -> Option<&RgbaImage> {
        self.latest.as_ref()
    }

    /// Take the current frame, leaving the session without one.
    pub fn take_frame(&mut self) -> Option<RgbaImage> {
        self.frame_updated = false;
        self.latest.take()
    }

    /// True once per newly received frame.
    pub fn take_frame_update(&mut self) -> bool {
        std::mem::take(&mut self.frame_updated)
    }

    /// True when the capture thread has exited.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ask the capture thread to release the device.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(feature = "camera-opencv")]
mod opencv_backend {
    use super::CameraDevice;
    use anyhow::{anyhow, bail, Context, Result};
    use image::RgbaImage;
    use opencv::{core::Mat, imgproc, prelude::*, videoio};

    /// Camera backed by OpenCV's `VideoCapture`.
    pub struct OpenCvCamera {
        capture: videoio::VideoCapture,
    }

    impl OpenCvCamera {
        pub fn open(index: i32) -> Result<Self> {
            let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
                .context("Failed to create video capture")?;
            if !capture.is_opened()? {
                bail!("Camera {} could not be opened", index);
            }
            Ok(Self { capture })
        }
    }

    impl CameraDevice for OpenCvCamera {
        fn grab_frame(&mut self) -> Result<RgbaImage> {
            let mut frame = Mat::default();
            if !self.capture.read(&mut frame)? || frame.empty() {
                bail!("Camera returned an empty frame");
            }

            let mut rgba = Mat::default();
            imgproc::cvt_color(&frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;

            let width = rgba.cols() as u32;
            let height = rgba.rows() as u32;
            let bytes = rgba.data_bytes()?.to_vec();
            RgbaImage::from_raw(width, height, bytes)
                .ok_or_else(|| anyhow!("Frame buffer does not match {}x{}", width, height))
        }
    }
}
