use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::config::AudioConfig;

// Command to control the audio thread
enum AudioCommand {
    PlayMusic,
    StopMusic,
    SetVolume(f32), // 0.0 to 1.0
    Quit,
}

// Settings forwarded from the audio thread to the stream callback
#[derive(Clone, Copy)]
enum StreamCommand {
    Play,
    Stop,
    Volume(f32),
}

/// Handle to the background music thread.
pub struct AudioState {
    sender: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
    music_enabled: bool,
    volume: f32,
}

impl AudioState {
    pub fn new(config: &AudioConfig) -> Self {
        let (sender, receiver) = bounded(64);
        let available = Arc::new(AtomicBool::new(true));
        let volume = config.volume.clamp(0.0, 1.0);

        // Start the audio thread
        let thread_available = Arc::clone(&available);
        thread::spawn(move || {
            if let Err(e) = run_audio_thread(receiver, volume) {
                error!("Audio thread error: {e}");
                thread_available.store(false, Ordering::Relaxed);
            }
        });

        let audio = Self {
            sender: Some(sender),
            available,
            music_enabled: config.music_enabled,
            volume,
        };
        if audio.music_enabled {
            audio.send(AudioCommand::PlayMusic);
        }
        audio
    }

    fn send(&self, command: AudioCommand) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(command);
        }
    }

    pub fn is_audio_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    pub fn is_music_enabled(&self) -> bool {
        self.music_enabled
    }

    /// Starts the track from the beginning.
    pub fn play_music(&mut self) {
        self.music_enabled = true;
        self.send(AudioCommand::PlayMusic);
    }

    pub fn stop_music(&mut self) {
        self.music_enabled = false;
        self.send(AudioCommand::StopMusic);
    }

    pub fn toggle_music(&mut self) {
        if self.music_enabled {
            self.stop_music();
        } else {
            self.play_music();
        }
    }

    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.send(AudioCommand::SetVolume(self.volume));
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self::new(&AudioConfig::default())
    }
}

impl Drop for AudioState {
    fn drop(&mut self) {
        self.send(AudioCommand::Quit);
    }
}

fn run_audio_thread(receiver: Receiver<AudioCommand>, volume: f32) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let config = device.default_output_config()?;

    let (stream_sender, stream_receiver) = bounded::<StreamCommand>(16);

    let _stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            run_audio_stream::<f32>(&device, &config.into(), stream_receiver, volume)?
        }
        cpal::SampleFormat::I16 => {
            run_audio_stream::<i16>(&device, &config.into(), stream_receiver, volume)?
        }
        cpal::SampleFormat::U16 => {
            run_audio_stream::<u16>(&device, &config.into(), stream_receiver, volume)?
        }
        _ => return Err(anyhow::anyhow!("Unsupported audio format")),
    };
    debug!("Audio stream started");

    // Keep the stream alive until told to quit or the handle goes away
    while let Ok(command) = receiver.recv() {
        let forwarded = match command {
            AudioCommand::PlayMusic => StreamCommand::Play,
            AudioCommand::StopMusic => StreamCommand::Stop,
            AudioCommand::SetVolume(v) => StreamCommand::Volume(v),
            AudioCommand::Quit => break,
        };
        let _ = stream_sender.try_send(forwarded);
    }

    debug!("Audio thread exiting");
    Ok(())
}

fn run_audio_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    commands: Receiver<StreamCommand>,
    initial_volume: f32,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = f64::from(config.sample_rate.0);
    let channels = config.channels as usize;

    let mut music = create_background_music();
    music.set_sample_rate(sample_rate);

    let mut playing = false;
    let mut volume = initial_volume;

    let mut next_value = move || {
        while let Ok(command) = commands.try_recv() {
            match command {
                StreamCommand::Play => {
                    music.reset();
                    playing = true;
                }
                StreamCommand::Stop => playing = false,
                StreamCommand::Volume(v) => volume = v,
            }
        }

        if !playing {
            return (0.0, 0.0);
        }

        let (left, right) = music.get_stereo();
        (
            (left * volume).clamp(-1.0, 1.0),
            (right * volume).clamp(-1.0, 1.0),
        )
    };

    let err_fn = |err| error!("Error in audio stream: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let (left, right) = next_value();
                let left = T::from_sample(left);
                let right = T::from_sample(right);

                for (channel, sample) in frame.iter_mut().enumerate() {
                    *sample = if channel & 1 == 0 { left } else { right };
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

// Seconds per beat of the theme
const BEAT: f32 = 0.25;

// Lead line as (frequency in Hz, length in beats). Zero frequency is a rest.
const MELODY: [(f32, f32); 24] = [
    (659.25, 2.0),
    (493.88, 1.0),
    (523.25, 1.0),
    (587.33, 2.0),
    (523.25, 1.0),
    (493.88, 1.0),
    (440.00, 2.0),
    (440.00, 1.0),
    (523.25, 1.0),
    (659.25, 2.0),
    (587.33, 1.0),
    (523.25, 1.0),
    (493.88, 3.0),
    (523.25, 1.0),
    (587.33, 2.0),
    (659.25, 2.0),
    (523.25, 2.0),
    (440.00, 2.0),
    (440.00, 2.0),
    (0.0, 2.0),
    (587.33, 3.0),
    (698.46, 1.0),
    (880.00, 2.0),
    (0.0, 2.0),
];

// Root of the bass line for each bar of four beats
const BASS: [f32; 8] = [82.41, 110.0, 103.83, 110.0, 73.42, 65.41, 82.41, 110.0];

fn melody_length() -> f32 {
    MELODY.iter().map(|&(_, beats)| beats).sum::<f32>() * BEAT
}

/// Lead note sounding at `t` seconds into the loop, and its gate (1 while
/// the note is held, 0 in the short gap before the next one).
#[must_use]
pub fn melody_note(t: f32) -> (f32, f32) {
    let mut t = t.rem_euclid(melody_length());
    for &(freq, beats) in &MELODY {
        let length = beats * BEAT;
        if t < length {
            let gate = if freq > 0.0 && t < length - 0.03 {
                1.0
            } else {
                0.0
            };
            return (freq, gate);
        }
        t -= length;
    }
    (0.0, 0.0)
}

#[must_use]
pub fn bass_note(t: f32) -> f32 {
    let bar = BEAT * 4.0;
    let idx = (t.rem_euclid(bar * BASS.len() as f32) / bar) as usize;
    BASS[Ord::min(idx, BASS.len() - 1)]
}

// The fixed background track, looping forever
fn create_background_music() -> Box<dyn AudioUnit> {
    let lead = (lfo(|t| melody_note(t).0) >> sine()) * lfo(|t| melody_note(t).1) * 0.12;

    let bass = (lfo(bass_note) >> sine()) * 0.06;

    // Off-beat pulse for rhythm
    let rhythm = lfo(|t| if (t / BEAT) % 1.0 < 0.1 { 0.03_f32 } else { 0.0 }) * sine_hz(440.0);

    let music = (lead + bass + rhythm) * 0.6;

    Box::new(music >> pan(0.0))
}
