//! Recording host and SDK doubles for unit tests

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use ndi_audio::AudioOutputInfo;
use ndi_video::VideoOutputInfo;
use parking_lot::Mutex;

use crate::host::{CaptureFlags, OutputHost};
use crate::sdk::{NdiAudioFrame, NdiSdk, NdiVideoFrame, SendCreate};

pub struct MockHost {
    video: Option<VideoOutputInfo>,
    audio: Option<AudioOutputInfo>,
    fail_begin: AtomicBool,
    begun: Mutex<Vec<CaptureFlags>>,
    ended: AtomicUsize,
}

impl MockHost {
    pub fn new(video: Option<VideoOutputInfo>, audio: Option<AudioOutputInfo>) -> Self {
        Self {
            video,
            audio,
            fail_begin: AtomicBool::new(false),
            begun: Mutex::new(Vec::new()),
            ended: AtomicUsize::new(0),
        }
    }

    pub fn av(video: VideoOutputInfo, audio: AudioOutputInfo) -> Self {
        Self::new(Some(video), Some(audio))
    }

    pub fn video_only(video: VideoOutputInfo) -> Self {
        Self::new(Some(video), None)
    }

    pub fn audio_only(audio: AudioOutputInfo) -> Self {
        Self::new(None, Some(audio))
    }

    pub fn none() -> Self {
        Self::new(None, None)
    }

    pub fn fail_begin(&self, fail: bool) {
        self.fail_begin.store(fail, Ordering::SeqCst);
    }

    /// Flags of every successful begin_data_capture
    pub fn begun_flags(&self) -> Vec<CaptureFlags> {
        self.begun.lock().clone()
    }

    pub fn end_count(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }
}

impl OutputHost for MockHost {
    fn video(&self) -> Option<VideoOutputInfo> {
        self.video
    }

    fn audio(&self) -> Option<AudioOutputInfo> {
        self.audio
    }

    fn begin_data_capture(&self, flags: CaptureFlags) -> bool {
        if self.fail_begin.load(Ordering::SeqCst) {
            return false;
        }
        self.begun.lock().push(flags);
        true
    }

    fn end_data_capture(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecord {
    pub ndi_name: String,
    pub groups: Option<String>,
    pub clock_video: bool,
    pub clock_audio: bool,
}

/// A sent video frame and a copy of the bytes it pointed at
#[derive(Debug, Clone)]
pub struct SentVideo {
    pub sender: u64,
    pub frame: NdiVideoFrame,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SentAudio {
    pub sender: u64,
    pub frame: NdiAudioFrame,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct SdkState {
    fail_create: AtomicBool,
    next_id: AtomicU64,
    created: Mutex<Vec<CreateRecord>>,
    destroyed: Mutex<Vec<u64>>,
    videos: Mutex<Vec<SentVideo>>,
    audios: Mutex<Vec<SentAudio>>,
}

/// Clones share one recording, so a test can keep a handle after the
/// output takes ownership
#[derive(Clone, Default)]
pub struct MockSdk {
    state: Arc<SdkState>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockSender(u64);

impl MockSdk {
    pub fn stats(&self) -> MockSdk {
        self.clone()
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn created_names(&self) -> Vec<String> {
        self.state
            .created
            .lock()
            .iter()
            .map(|c| c.ndi_name.clone())
            .collect()
    }

    pub fn last_create(&self) -> Option<CreateRecord> {
        self.state.created.lock().last().cloned()
    }

    pub fn destroyed(&self) -> usize {
        self.state.destroyed.lock().len()
    }

    pub fn videos(&self) -> Vec<SentVideo> {
        self.state.videos.lock().clone()
    }

    pub fn audios(&self) -> Vec<SentAudio> {
        self.state.audios.lock().clone()
    }
}

impl NdiSdk for MockSdk {
    type Sender = MockSender;

    fn send_create(&self, desc: &SendCreate<'_>) -> Option<MockSender> {
        if self.state.fail_create.load(Ordering::SeqCst) {
            return None;
        }
        self.state.created.lock().push(CreateRecord {
            ndi_name: desc.ndi_name.to_string(),
            groups: desc.groups.map(str::to_string),
            clock_video: desc.clock_video,
            clock_audio: desc.clock_audio,
        });
        Some(MockSender(self.state.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn send_destroy(&self, sender: MockSender) {
        self.state.destroyed.lock().push(sender.0);
    }

    fn send_video_async(&self, sender: &MockSender, frame: &NdiVideoFrame) {
        let len = frame.line_stride_in_bytes as usize * frame.yres as usize;
        // SAFETY: the output hands over a frame valid for stride * height.
        let bytes = unsafe { std::slice::from_raw_parts(frame.data, len) }.to_vec();
        self.state.videos.lock().push(SentVideo {
            sender: sender.0,
            frame: *frame,
            bytes,
        });
    }

    fn send_audio(&self, sender: &MockSender, frame: &NdiAudioFrame) {
        let len = frame.channel_stride_in_bytes as usize * frame.no_channels as usize;
        // SAFETY: the output hands over channels * stride packed bytes.
        let bytes = unsafe { std::slice::from_raw_parts(frame.data, len) }.to_vec();
        self.state.audios.lock().push(SentAudio {
            sender: sender.0,
            frame: *frame,
            bytes,
        });
    }
}
