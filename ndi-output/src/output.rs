//! Output instance: lifecycle state machine and per-frame send paths
//!
//! Lifecycle calls (update/start/stop/destroy) are serialized by the host.
//! Frame callbacks arrive on the host's video and audio threads and may
//! overlap each other, but only between a successful start and the matching
//! stop. Everything negotiated at start lives in a session that frame paths
//! borrow shared; stop takes it exclusively, so it waits out any frame still
//! in flight before the sender and conversion buffer go away.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, trace, warn};
use ndi_audio::{repack_audio_data, AudioData, ScratchBuffer, MAX_AV_PLANES};
use ndi_video::VideoData;
use parking_lot::{Mutex, RwLock};

use crate::error::StartError;
use crate::frame::{
    build_audio_frame, build_video_frame, negotiate_video, NegotiatedAudio, NegotiatedVideo,
    VideoConversion,
};
use crate::host::{CaptureFlags, OutputHost};
use crate::sdk::{NdiSdk, SendCreate};
use crate::settings::{OutputConfig, Settings};

struct VideoSession {
    format: NegotiatedVideo,
    /// Present iff the host format needs converting (non-empty I444)
    conversion: Mutex<Option<VideoConversion>>,
}

/// State that exists only while the output runs
struct Session<T> {
    sender: T,
    video: Option<VideoSession>,
    audio: Option<NegotiatedAudio>,
}

/// One network output registered with the host
pub struct NdiOutput<H: OutputHost, S: NdiSdk> {
    host: H,
    sdk: S,
    config: RwLock<OutputConfig>,
    started: AtomicBool,
    session: RwLock<Option<Session<S::Sender>>>,
    /// Survives stop/start cycles; released with the instance
    audio_scratch: Mutex<ScratchBuffer>,
}

impl<H: OutputHost, S: NdiSdk> NdiOutput<H, S> {
    /// Create an idle output configured from `settings`
    pub fn new(host: H, sdk: S, settings: &dyn Settings) -> Self {
        let config = OutputConfig::from_settings(settings);
        info!("[obs-ndi] +ndi_output_create('{}'...)", config.ndi_name);

        let output = Self {
            host,
            sdk,
            config: RwLock::new(OutputConfig::default()),
            started: AtomicBool::new(false),
            session: RwLock::new(None),
            audio_scratch: Mutex::new(ScratchBuffer::new()),
        };
        output.update(settings);

        info!("[obs-ndi] -ndi_output_create(...)");
        output
    }

    /// Refresh name and media flags. A running sender keeps its name until
    /// the next start.
    pub fn update(&self, settings: &dyn Settings) {
        let config = OutputConfig::from_settings(settings);
        info!("[obs-ndi] ndi_output_update('{}'...)", config.ndi_name);
        *self.config.write() = config;
    }

    pub fn start(&self) -> Result<(), StartError> {
        let config = self.config.read().clone();
        info!("[obs-ndi] +ndi_output_start('{}'...)", config.ndi_name);

        let result = self.try_start(&config);
        match &result {
            Ok(()) => info!("[obs-ndi] '{}': ndi output started", config.ndi_name),
            Err(StartError::AlreadyStarted) => {
                info!("[obs-ndi] '{}': already started", config.ndi_name)
            }
            Err(err) if err.is_configuration() => {
                warn!("[obs-ndi] '{}': {}", config.ndi_name, err)
            }
            Err(err) => error!("[obs-ndi] '{}': {}", config.ndi_name, err),
        }

        info!("[obs-ndi] -ndi_output_start(...)");
        result
    }

    fn try_start(&self, config: &OutputConfig) -> Result<(), StartError> {
        let flags = {
            let mut session = self.session.write();
            if self.started.load(Ordering::Acquire) || session.is_some() {
                return Err(StartError::AlreadyStarted);
            }

            let video_info = if config.uses_video {
                self.host.video()
            } else {
                None
            };
            let audio_info = if config.uses_audio {
                self.host.audio()
            } else {
                None
            };
            if video_info.is_none() && audio_info.is_none() {
                return Err(StartError::NoMediaAvailable);
            }

            let mut flags = CaptureFlags::empty();

            let video = match video_info {
                Some(info) => {
                    let (format, conversion) = negotiate_video(&info)?;
                    flags |= CaptureFlags::VIDEO;
                    Some(VideoSession {
                        format,
                        conversion: Mutex::new(conversion),
                    })
                }
                None => None,
            };

            let audio = match audio_info {
                Some(info) if info.channels > MAX_AV_PLANES => {
                    return Err(StartError::TooManyChannels(info.channels));
                }
                Some(info) => {
                    flags |= CaptureFlags::AUDIO;
                    Some(NegotiatedAudio {
                        sample_rate: info.sample_rate,
                        channels: info.channels,
                    })
                }
                None => None,
            };

            let sender = self
                .sdk
                .send_create(&SendCreate {
                    ndi_name: &config.ndi_name,
                    groups: None,
                    clock_video: false,
                    clock_audio: false,
                })
                .ok_or(StartError::SenderCreateFailed)?;
            info!("[obs-ndi] '{}': ndi sender created", config.ndi_name);

            *session = Some(Session {
                sender,
                video,
                audio,
            });
            flags
        };

        // No lock held while the host wires up capture
        if self.host.begin_data_capture(flags) {
            self.started.store(true, Ordering::Release);
            Ok(())
        } else {
            // Do not keep a sender nobody will ever stop
            if let Some(session) = self.session.write().take() {
                self.destroy_sender(session.sender);
            }
            Err(StartError::CaptureBeginFailed)
        }
    }

    /// Stop a running output; a no-op while idle
    pub fn stop(&self) {
        let name = self.config.read().ndi_name.clone();
        info!("[obs-ndi] +ndi_output_stop('{}'...)", name);

        if self.started.swap(false, Ordering::AcqRel) {
            self.host.end_data_capture();

            // Waits for frame callbacks still holding the session
            let session = self.session.write().take();
            if let Some(session) = session {
                self.destroy_sender(session.sender);
                // Conversion buffer and negotiated formats drop with the session
            }
        }

        info!("[obs-ndi] -ndi_output_stop(...)");
    }

    /// Release the instance. Audio scratch goes with it.
    pub fn destroy(self) {
        let name = self.config.read().ndi_name.clone();
        info!("[obs-ndi] +ndi_output_destroy('{}'...)", name);
        drop(self);
        info!("[obs-ndi] -ndi_output_destroy(...)");
    }

    fn destroy_sender(&self, sender: S::Sender) {
        self.sdk.send_destroy(sender);
        info!("[obs-ndi] ndi sender destroyed");
    }

    /// Send one host video frame
    ///
    /// # Safety
    /// Plane pointers of `frame` must be valid for `linesize * height` bytes
    /// for the duration of the call, and pass-through planes must stay valid
    /// until the next video frame is sent.
    pub unsafe fn raw_video(&self, frame: &VideoData) {
        if !self.started.load(Ordering::Acquire) {
            return;
        }
        let session = self.session.read();
        let Some(session) = session.as_ref() else {
            return;
        };
        let Some(video) = session.video.as_ref() else {
            return;
        };
        if video.format.width == 0 || video.format.height == 0 {
            return;
        }

        let mut conversion = video.conversion.lock();
        let (data, line_stride) = match conversion.as_mut() {
            Some(conversion) => match conversion.convert(frame, video.format.height) {
                Some(converted) => converted,
                None => {
                    trace!("[obs-ndi] dropping video frame with missing planes");
                    return;
                }
            },
            None if frame.data[0].is_null() => return,
            None => (frame.data[0].cast_const(), frame.linesize[0]),
        };

        let ndi_frame = build_video_frame(&video.format, data, line_stride, frame.timestamp);
        self.sdk.send_video_async(&session.sender, &ndi_frame);
    }

    /// Send one host audio frame
    ///
    /// # Safety
    /// The first `channels` plane pointers of `frame` must be valid for
    /// `frames * 4` bytes for the duration of the call.
    pub unsafe fn raw_audio(&self, frame: &AudioData) {
        if !self.started.load(Ordering::Acquire) {
            return;
        }
        let session = self.session.read();
        let Some(session) = session.as_ref() else {
            return;
        };
        let Some(audio) = session.audio.as_ref() else {
            return;
        };
        if audio.sample_rate == 0 || audio.channels == 0 {
            return;
        }

        let mut scratch = self.audio_scratch.lock();
        let Some(packed) = repack_audio_data(frame, audio.channels, &mut scratch) else {
            trace!("[obs-ndi] dropping audio frame with missing planes");
            return;
        };

        let ndi_frame = build_audio_frame(audio, frame.frames, packed);
        self.sdk.send_audio(&session.sender, &ndi_frame);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn config(&self) -> OutputConfig {
        self.config.read().clone()
    }

    pub fn has_sender(&self) -> bool {
        self.session.read().is_some()
    }

    pub fn negotiated_video(&self) -> Option<NegotiatedVideo> {
        self.session
            .read()
            .as_ref()
            .and_then(|s| s.video.as_ref().map(|v| v.format))
    }

    pub fn negotiated_audio(&self) -> Option<NegotiatedAudio> {
        self.session.read().as_ref().and_then(|s| s.audio)
    }

    pub fn has_conversion_buffer(&self) -> bool {
        self.session
            .read()
            .as_ref()
            .and_then(|s| s.video.as_ref())
            .is_some_and(|v| v.conversion.lock().is_some())
    }

    pub fn audio_scratch_capacity(&self) -> usize {
        self.audio_scratch.lock().capacity()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }
}

impl<H: OutputHost, S: NdiSdk> Drop for NdiOutput<H, S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            warn!("[obs-ndi] output released while running, destroying sender");
            self.sdk.send_destroy(session.sender);
        }
    }
}
